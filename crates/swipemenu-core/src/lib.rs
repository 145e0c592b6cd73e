//! # Swipe menu core
//!
//! Host-agnostic building blocks shared by swipe menu widgets:
//!
//! - `geometry`: `Vec2`, `Size`, `Rect`, `Insets`, `Transform`.
//! - `input`: raw pointer samples fed in by the host's dispatch pipeline.
//! - `animation`: injectable `Clock` and the friction `Scroller`.
//! - `frame`: `FrameScheduler`, the per-frame task queue the host ticks from
//!   its redraw loop.
//! - `config`: the declarative attribute set and swipe permission flags.
//! - `error`: `SwipeError`.
//!
//! Everything here lives on the UI thread: state is shared with `Rc`/`RefCell`
//! and nothing is `Send`.
//!
//! ## Driving an animation
//!
//! ```rust
//! use swipemenu_core::animation::{Scroller, TestClock, Clock};
//! use web_time::Duration;
//!
//! let clock = TestClock::new();
//! let mut s = Scroller::new();
//! s.start_scroll(0.0, 100.0, Scroller::DEFAULT_DURATION, clock.now());
//!
//! clock.advance(Duration::from_millis(100));
//! assert!(s.compute_scroll_offset(clock.now()));
//! assert!(s.curr_x() > 0.0 && s.curr_x() < 100.0);
//!
//! clock.advance(Duration::from_millis(200));
//! s.compute_scroll_offset(clock.now());
//! assert_eq!(s.curr_x(), 100.0);
//! assert!(s.is_finished());
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;

pub use config::{ChildId, ChildRole, SwipeDirections, SwipeMenuAttrs};
pub use error::SwipeError;
pub use frame::{FrameHandle, FrameScheduler};
pub use geometry::*;
pub use input::*;
