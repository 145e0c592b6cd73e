//! A scripted, headless list of swipe menu rows.
//!
//! Run with `RUST_LOG=debug` to watch the rows settle and the coordinator hand
//! the open slot from one row to the next.

use std::rc::Rc;

use swipemenu_core::animation::TestClock;
use swipemenu_core::{FrameScheduler, PointerEvent, SwipeMenuAttrs};
use swipemenu_ui::{Child, FixedChild, MeasureSpec, SwipeCoordinator, SwipeMenuLayout};
use web_time::Duration;

const ROW_ATTRS: &str = r#"{
    "contentView": 1,
    "leftMenuView": 2,
    "rightMenuView": 3,
    "fraction": 0.3
}"#;

const ROW_WIDTH: f32 = 360.0;
const ROW_HEIGHT: f32 = 56.0;
const FRAME: Duration = Duration::from_millis(16);

struct List {
    clock: TestClock,
    frames: Rc<FrameScheduler>,
    rows: Vec<SwipeMenuLayout>,
}

impl List {
    fn new(len: usize, attrs: &SwipeMenuAttrs) -> anyhow::Result<Self> {
        let clock = TestClock::new();
        let frames = Rc::new(FrameScheduler::new(Rc::new(clock.clone())));
        let coordinator = SwipeCoordinator::new(frames.clone());

        let mut rows = Vec::with_capacity(len);
        for _ in 0..len {
            let children: Vec<(u64, Box<dyn Child>)> = vec![
                (1, Box::new(FixedChild::new(ROW_WIDTH, ROW_HEIGHT))),
                (2, Box::new(FixedChild::new(72.0, ROW_HEIGHT))),
                (3, Box::new(FixedChild::new(144.0, ROW_HEIGHT))),
            ];
            let row = SwipeMenuLayout::inflate(attrs, children, &coordinator)?;
            row.measure(MeasureSpec::Exactly(ROW_WIDTH), MeasureSpec::AtMost(800.0));
            row.layout();
            rows.push(row);
        }

        Ok(Self {
            clock,
            frames,
            rows,
        })
    }

    fn swipe(&self, index: usize, from: f32, to: f32) {
        let row = &self.rows[index];
        let y = ROW_HEIGHT / 2.0;
        row.dispatch_pointer(&PointerEvent::down(from, y));
        let steps = 8;
        for i in 1..=steps {
            let x = from + (to - from) * i as f32 / steps as f32;
            row.dispatch_pointer(&PointerEvent::moved(x, y));
            self.frame();
        }
        let flags = row.dispatch_pointer(&PointerEvent::up(to, y));
        log::info!("row {index}: released with {flags:?} -> {:?}", row.state());
    }

    fn tap(&self, index: usize, x: f32) {
        let row = &self.rows[index];
        let y = ROW_HEIGHT / 2.0;
        let down = row.dispatch_pointer(&PointerEvent::down(x, y));
        let up = row.dispatch_pointer(&PointerEvent::up(x, y));
        log::info!("row {index}: tap ({:?})", down | up);
    }

    fn frame(&self) {
        self.clock.advance(FRAME);
        self.frames.tick();
    }

    fn run_frames(&self) {
        let mut n = 0;
        while !self.frames.is_idle() {
            self.frame();
            n += 1;
        }
        log::debug!("settled after {n} frames");
    }

    fn dump(&self, label: &str) {
        log::info!("-- {label}");
        for (i, row) in self.rows.iter().enumerate() {
            log::info!(
                "   row {i}: {:?} offset={:.1} attached={}",
                row.state(),
                row.offset(),
                row.is_attached()
            );
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let attrs = SwipeMenuAttrs::parse(ROW_ATTRS)?;
    let list = List::new(5, &attrs)?;
    list.dump("initial");

    list.swipe(0, 300.0, 180.0);
    list.run_frames();
    list.dump("row 0 swiped left");

    list.tap(2, 100.0);
    list.run_frames();
    list.dump("tap on row 2");

    list.swipe(3, 40.0, 120.0);
    list.run_frames();
    list.dump("row 3 swiped right");

    // scroll row 3 off screen and back
    list.rows[3].on_detached();
    list.dump("row 3 recycled");
    list.rows[3].on_attached();
    list.run_frames();
    list.dump("row 3 back");

    list.rows[1].open_right()?;
    list.run_frames();
    list.dump("row 1 opened from code");

    list.rows[4].reset_status();
    list.dump("reset");

    Ok(())
}
