//! Per-frame task scheduling.
//!
//! The host redraw loop owns one `FrameScheduler` and calls [`FrameScheduler::tick`]
//! once per frame. Widgets post tasks that run on every tick until they report
//! completion or are cancelled through their [`FrameHandle`].
//!
//! ```rust
//! use swipemenu_core::frame::FrameScheduler;
//! use swipemenu_core::animation::TestClock;
//! use std::rc::Rc;
//!
//! let clock = TestClock::new();
//! let frames = FrameScheduler::new(Rc::new(clock));
//! let mut left = 3;
//! let handle = frames.post(move |_now| {
//!     left -= 1;
//!     left > 0
//! });
//! assert!(frames.is_scheduled(handle));
//! while frames.tick() {}
//! assert!(!frames.is_scheduled(handle));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use web_time::Instant;

use crate::animation::Clock;

new_key_type! {
    /// Cancellation handle for a posted frame task.
    pub struct FrameHandle;
}

type FrameTask = Box<dyn FnMut(Instant) -> bool>;

pub struct FrameScheduler {
    clock: Rc<dyn Clock>,
    // A slot is `None` while its task is running inside `tick`.
    tasks: RefCell<SlotMap<FrameHandle, Option<FrameTask>>>,
}

impl FrameScheduler {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            tasks: RefCell::new(SlotMap::with_key()),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Run `task` on every tick while it returns `true`.
    pub fn post(&self, task: impl FnMut(Instant) -> bool + 'static) -> FrameHandle {
        self.tasks.borrow_mut().insert(Some(Box::new(task)))
    }

    /// Returns whether the task was still scheduled. Safe to call from inside a task.
    pub fn cancel(&self, handle: FrameHandle) -> bool {
        self.tasks.borrow_mut().remove(handle).is_some()
    }

    pub fn is_scheduled(&self, handle: FrameHandle) -> bool {
        self.tasks.borrow().contains_key(handle)
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Run one frame. Returns `true` if another frame should be requested.
    pub fn tick(&self) -> bool {
        let now = self.clock.now();
        let keys: SmallVec<[FrameHandle; 8]> = self.tasks.borrow().keys().collect();

        for key in keys {
            let task = self
                .tasks
                .borrow_mut()
                .get_mut(key)
                .and_then(|slot| slot.take());
            let Some(mut task) = task else {
                continue;
            };

            let keep = task(now);

            let mut tasks = self.tasks.borrow_mut();
            if keep {
                // Cancelled while running: the slot is gone and the task is dropped.
                if let Some(slot) = tasks.get_mut(key) {
                    *slot = Some(task);
                }
            } else {
                tasks.remove(key);
            }
        }

        !self.is_idle()
    }
}
