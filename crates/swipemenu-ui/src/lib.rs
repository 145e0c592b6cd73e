//! # Swipe menu rows
//!
//! `SwipeMenuLayout` is a list row whose content can be dragged sideways to
//! reveal a left and/or a right menu.
//!
//! The widget is split along four concerns:
//!
//! - `layout`: measures the three children and puts the menus just outside the
//!   content on either side. Revealing is a translation, never a relayout.
//! - `gesture`: tells horizontal drags from vertical scrolls and taps, using the
//!   platform touch slop.
//! - `state`: clamps the live offset while dragging and decides, on release,
//!   whether the row settles closed, left-open or right-open.
//! - `coordinator`: `SwipeCoordinator`, shared by sibling rows, keeps at most
//!   one of them open.
//!
//! ## Host integration
//!
//! The host owns a `FrameScheduler` and ticks it once per redraw while it
//! reports pending work. For every row it:
//!
//! 1. calls `measure` and `layout` from its own layout pass,
//! 2. forwards pointer samples to `dispatch_pointer` and honours the returned
//!    `Dispatch` flags (`DISALLOW_PARENT_INTERCEPT` keeps a vertical list from
//!    stealing the drag, `INTERCEPT_CHILDREN` swallows the click a swipe would
//!    otherwise produce),
//! 3. draws and hit-tests the row's children through `translation()`,
//! 4. calls `on_attached` / `on_detached` as rows are recycled.
//!
//! ```rust
//! use std::rc::Rc;
//! use swipemenu_core::{FrameScheduler, animation::SystemClock};
//! use swipemenu_ui::{FixedChild, SwipeCoordinator, SwipeMenuLayout};
//!
//! let frames = Rc::new(FrameScheduler::new(Rc::new(SystemClock)));
//! let coordinator = SwipeCoordinator::new(frames);
//!
//! let rows: Vec<SwipeMenuLayout> = (0..3)
//!     .map(|_| {
//!         SwipeMenuLayout::builder()
//!             .content(FixedChild::new(320.0, 56.0))
//!             .left_menu(FixedChild::new(72.0, 56.0))
//!             .right_menu(FixedChild::new(144.0, 56.0))
//!             .build(&coordinator)
//!             .unwrap()
//!     })
//!     .collect();
//! assert!(rows.iter().all(|r| !r.is_open()));
//! ```

pub mod coordinator;
pub mod gesture;
pub mod layout;
mod menu;
pub mod state;

pub use coordinator::SwipeCoordinator;
pub use gesture::{Dispatch, GestureSession, MoveStep};
pub use layout::{Child, ChildParams, FixedChild, MeasureSpec, Placement, SizeMode};
pub use menu::{MenuId, SwipeMenuBuilder, SwipeMenuLayout};
pub use state::{MenuState, ScrollBounds, resolve};
