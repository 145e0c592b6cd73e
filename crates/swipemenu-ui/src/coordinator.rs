//! Single-open coordination across sibling rows.
//!
//! One `SwipeCoordinator` is owned by the list or screen that hosts the rows and
//! is handed to every row at construction. It remembers which row is open and
//! closes it when another row is touched or opened.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use swipemenu_core::FrameScheduler;

use crate::menu::{MenuId, MenuInner, SwipeMenuLayout};
use crate::state::MenuState;

#[derive(Clone)]
struct OpenEntry {
    id: MenuId,
    state: MenuState,
    menu: Weak<RefCell<MenuInner>>,
}

pub struct SwipeCoordinator {
    frames: Rc<FrameScheduler>,
    next_id: Cell<MenuId>,
    open: RefCell<Option<OpenEntry>>,
    // Row that was open when it left the tree, restored if it comes back first.
    detached: RefCell<Option<(MenuId, MenuState)>>,
}

impl SwipeCoordinator {
    pub fn new(frames: Rc<FrameScheduler>) -> Rc<Self> {
        Rc::new(Self {
            frames,
            next_id: Cell::new(1),
            open: RefCell::new(None),
            detached: RefCell::new(None),
        })
    }

    pub fn frames(&self) -> &Rc<FrameScheduler> {
        &self.frames
    }

    pub(crate) fn next_id(&self) -> MenuId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub fn current_open_instance(&self) -> Option<MenuId> {
        self.open_state().map(|(id, _)| id)
    }

    /// The registered row and the state it is settling to. Rows that were dropped
    /// without detaching read as closed.
    pub fn open_state(&self) -> Option<(MenuId, MenuState)> {
        let open = self.open.borrow();
        open.as_ref()
            .filter(|e| e.menu.strong_count() > 0)
            .map(|e| (e.id, e.state))
    }

    /// Record `menu` as the open row. A different row still on record is told to
    /// close first.
    pub fn register_open(self: &Rc<Self>, menu: &SwipeMenuLayout, state: MenuState) {
        let id = menu.id();
        self.close_others(id);

        log::debug!("swipe menu {id} registered as {state:?}");
        *self.open.borrow_mut() = Some(OpenEntry {
            id,
            state,
            menu: menu.downgrade(),
        });

        let mut detached = self.detached.borrow_mut();
        if matches!(*detached, Some((d, _)) if d != id) {
            *detached = None;
        }
    }

    /// Forget the open row without touching it.
    pub fn clear(&self) {
        self.open.borrow_mut().take();
    }

    pub(crate) fn release(&self, id: MenuId) {
        let mut open = self.open.borrow_mut();
        if open.as_ref().is_some_and(|e| e.id == id) {
            *open = None;
        }
    }

    /// Animate the registered row closed unless it is `except`. Returns whether a
    /// row was commanded.
    pub fn close_others(self: &Rc<Self>, except: MenuId) -> bool {
        // Clone out: closing re-enters `release`.
        let entry = self.open.borrow().clone();
        let Some(entry) = entry else {
            return false;
        };
        if entry.id == except {
            return false;
        }

        match entry.menu.upgrade() {
            Some(inner) => {
                log::debug!("closing swipe menu {} for {except}", entry.id);
                SwipeMenuLayout::from_parts(inner, self.clone()).settle(MenuState::Closed);
            }
            None => self.release(entry.id),
        }
        true
    }

    /// Close the registered row immediately, without animating, and clear the
    /// registry.
    pub fn reset_status(self: &Rc<Self>) {
        self.detached.borrow_mut().take();
        let entry = self.open.borrow_mut().take();
        let Some(entry) = entry else {
            return;
        };
        if !entry.state.is_open() {
            return;
        }
        if let Some(inner) = entry.menu.upgrade() {
            log::debug!("reset swipe menu {}", entry.id);
            SwipeMenuLayout::from_parts(inner, self.clone()).snap_closed();
        }
    }

    pub(crate) fn stash_detached(&self, id: MenuId, state: MenuState) {
        self.release(id);
        *self.detached.borrow_mut() = state.is_open().then_some((id, state));
    }

    pub(crate) fn take_detached(&self, id: MenuId) -> Option<MenuState> {
        let mut detached = self.detached.borrow_mut();
        match *detached {
            Some((d, state)) if d == id => {
                *detached = None;
                Some(state)
            }
            _ => None,
        }
    }
}
