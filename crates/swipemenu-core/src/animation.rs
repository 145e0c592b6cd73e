use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Easing {
    Linear,
    EaseOut,
    /// Friction curve: fast start, long viscous tail. Default for settling.
    ViscousFluid,
}

const VISCOUS_FLUID_SCALE: f32 = 8.0;

fn viscous_fluid(x: f32) -> f32 {
    let mut x = x * VISCOUS_FLUID_SCALE;
    if x < 1.0 {
        x -= 1.0 - (-x).exp();
    } else {
        let start = 0.367_879_44; // 1/e == value at 1
        x = 1.0 - (1.0 - x).exp();
        x = start + x * (1.0 - start);
    }
    x
}

impl Easing {
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::ViscousFluid => {
                let normalize = 1.0 / viscous_fluid(1.0);
                let offset = 1.0 - normalize * viscous_fluid(1.0);
                let v = normalize * viscous_fluid(t);
                if v > 0.0 { v + offset } else { v }
            }
        }
    }
}

// Animation clock
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive deterministically. Clones share the same time.
#[derive(Clone)]
pub struct TestClock {
    t: Rc<Cell<Instant>>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            t: Rc::new(Cell::new(Instant::now())),
        }
    }
    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
    pub fn set(&self, t: Instant) {
        self.t.set(t);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}

/// Time-based horizontal position interpolator.
///
/// `start_scroll` records where we are and where we are going; every
/// `compute_scroll_offset` call samples the curve at the given instant. Once the
/// duration elapses the position lands exactly on the final value, so callers
/// always converge.
#[derive(Clone, Debug)]
pub struct Scroller {
    start_x: f32,
    final_x: f32,
    curr_x: f32,
    start_time: Option<Instant>,
    duration: Duration,
    easing: Easing,
    finished: bool,
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new()
    }
}

impl Scroller {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_easing(Easing::ViscousFluid)
    }

    pub fn with_easing(easing: Easing) -> Self {
        Self {
            start_x: 0.0,
            final_x: 0.0,
            curr_x: 0.0,
            start_time: None,
            duration: Self::DEFAULT_DURATION,
            easing,
            finished: true,
        }
    }

    /// Begin moving from `start_x` by `dx`. Any running scroll is discarded.
    pub fn start_scroll(&mut self, start_x: f32, dx: f32, duration: Duration, now: Instant) {
        self.start_scroll_to(start_x, start_x + dx, duration, now);
    }

    /// Like `start_scroll`, but lands on `final_x` exactly.
    pub fn start_scroll_to(&mut self, start_x: f32, final_x: f32, duration: Duration, now: Instant) {
        self.start_x = start_x;
        self.curr_x = start_x;
        self.final_x = final_x;
        self.duration = duration;
        self.start_time = Some(now);
        self.finished = false;
    }

    /// Advance to `now`. Returns `false` only when the scroll had already finished
    /// before this call; the call that reaches the end still returns `true`.
    pub fn compute_scroll_offset(&mut self, now: Instant) -> bool {
        if self.finished {
            return false;
        }
        let Some(start) = self.start_time else {
            self.finished = true;
            return false;
        };

        let elapsed = now.saturating_duration_since(start);
        if elapsed >= self.duration {
            self.curr_x = self.final_x;
            self.finished = true;
        } else {
            let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
            let eased = self.easing.interpolate(t);
            self.curr_x = self.start_x + (self.final_x - self.start_x) * eased;
        }
        true
    }

    /// Stop where we are.
    pub fn force_finished(&mut self) {
        self.finished = true;
        self.start_time = None;
    }

    /// Stop and jump to the final position.
    pub fn abort_animation(&mut self) {
        self.curr_x = self.final_x;
        self.force_finished();
    }

    pub fn curr_x(&self) -> f32 {
        self.curr_x
    }

    pub fn final_x(&self) -> f32 {
        self.final_x
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
