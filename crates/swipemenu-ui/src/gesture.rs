use bitflags::bitflags;
use swipemenu_core::{PointerId, Vec2};

bitflags! {
    /// What the host should do with the event stream after a dispatch.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Dispatch: u8 {
        /// Ancestors (e.g. a vertical list) must not steal this gesture.
        const DISALLOW_PARENT_INTERCEPT = 1;
        /// The gesture is a swipe; children must not receive it as a click.
        const INTERCEPT_CHILDREN = 1 << 1;
    }
}

/// Classification of one move sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveStep {
    /// Mostly vertical beyond slop: leave it to the ancestor.
    Vertical,
    /// Scroll by `dx` (scroll direction: positive when the finger moved left).
    Horizontal { dx: f32 },
}

/// One down → up/cancel cycle of the tracked pointer.
#[derive(Clone, Debug)]
pub struct GestureSession {
    pointer: PointerId,
    first: Vec2,
    last: Vec2,
}

impl GestureSession {
    pub fn begin(pointer: PointerId, at: Vec2) -> Self {
        Self {
            pointer,
            first: at,
            last: at,
        }
    }

    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    pub fn first(&self) -> Vec2 {
        self.first
    }

    pub fn last(&self) -> Vec2 {
        self.last
    }

    /// Delta from the last applied point. Vertical samples are not applied, so the
    /// delta keeps accumulating until the gesture turns horizontal again.
    pub fn classify(&self, at: Vec2, slop: f32) -> MoveStep {
        let dx = self.last.x - at.x;
        let dy = self.last.y - at.y;
        if dy.abs() > slop && dy.abs() > dx.abs() {
            MoveStep::Vertical
        } else {
            MoveStep::Horizontal { dx }
        }
    }

    pub fn advance(&mut self, at: Vec2) {
        self.last = at;
    }

    /// Net displacement since down, in scroll direction.
    pub fn net_dx(&self, at: Vec2) -> f32 {
        self.first.x - at.x
    }

    /// Whether ending at `at` makes this a swipe rather than a tap.
    pub fn is_swipe(&self, at: Vec2, slop: f32) -> bool {
        self.net_dx(at).abs() > slop
    }
}
