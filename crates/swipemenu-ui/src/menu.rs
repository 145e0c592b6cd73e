use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use swipemenu_core::animation::Scroller;
use swipemenu_core::config::DEFAULT_TOUCH_SLOP;
use swipemenu_core::error::Result;
use swipemenu_core::{
    ChildId, ChildRole, FrameHandle, Insets, PointerEvent, PointerEventKind, Rect, Size,
    SwipeDirections, SwipeError, SwipeMenuAttrs, Transform,
};
use web_time::{Duration, Instant};

use crate::coordinator::SwipeCoordinator;
use crate::gesture::{Dispatch, GestureSession, MoveStep};
use crate::layout::{Child, ChildSlot, MeasureSpec, Placement, measure_children, place_children};
use crate::state::{MenuState, ScrollBounds, Stops, resolve};

pub type MenuId = u64;

pub(crate) struct MenuInner {
    id: MenuId,
    directions: SwipeDirections,
    fraction: f32,
    touch_slop: f32,
    settle_duration: Duration,
    padding: Insets,
    min_size: Size,

    content: Option<ChildSlot>,
    left: Option<ChildSlot>,
    right: Option<ChildSlot>,
    size: Size,
    placement: Placement,

    offset: f32,
    committed: MenuState,
    session: Option<GestureSession>,
    scroller: Scroller,
    settle: Option<FrameHandle>,
    attached: bool,
}

impl MenuInner {
    fn stops(&self) -> Stops {
        let content_margin_right = self.content.as_ref().map_or(0.0, |c| c.margin().right);
        Stops::from_placement(&self.placement, content_margin_right)
    }

    fn bounds(&self) -> ScrollBounds {
        self.stops().bounds(self.directions)
    }
}

/// Advance a settle animation by one frame.
fn step_settle(menu: &Weak<RefCell<MenuInner>>, now: Instant) -> bool {
    let Some(menu) = menu.upgrade() else {
        return false;
    };
    let Ok(mut inner) = menu.try_borrow_mut() else {
        return true;
    };
    inner.scroller.compute_scroll_offset(now);
    inner.offset = inner.scroller.curr_x();
    if inner.scroller.is_finished() {
        inner.settle = None;
        false
    } else {
        true
    }
}

/// A row that reveals a left and/or right menu when its content is dragged
/// sideways.
///
/// The handle is cheap to clone; clones refer to the same row. All rows sharing
/// a [`SwipeCoordinator`] keep at most one menu open between them.
///
/// ```rust
/// use std::rc::Rc;
/// use swipemenu_core::{FrameScheduler, PointerEvent, animation::TestClock};
/// use swipemenu_ui::{FixedChild, MeasureSpec, MenuState, SwipeCoordinator, SwipeMenuLayout};
///
/// let clock = TestClock::new();
/// let frames = Rc::new(FrameScheduler::new(Rc::new(clock.clone())));
/// let coordinator = SwipeCoordinator::new(frames.clone());
///
/// let row = SwipeMenuLayout::builder()
///     .content(FixedChild::new(300.0, 48.0))
///     .right_menu(FixedChild::new(100.0, 48.0))
///     .build(&coordinator)
///     .unwrap();
/// row.measure(MeasureSpec::Exactly(300.0), MeasureSpec::AtMost(800.0));
/// row.layout();
///
/// row.dispatch_pointer(&PointerEvent::down(200.0, 10.0));
/// row.dispatch_pointer(&PointerEvent::moved(150.0, 10.0));
/// row.dispatch_pointer(&PointerEvent::up(150.0, 10.0));
/// assert_eq!(row.state(), MenuState::RightOpen);
///
/// clock.advance(web_time::Duration::from_millis(300));
/// while frames.tick() {}
/// assert_eq!(row.offset(), 100.0);
/// ```
#[derive(Clone)]
pub struct SwipeMenuLayout {
    inner: Rc<RefCell<MenuInner>>,
    coordinator: Rc<SwipeCoordinator>,
}

impl fmt::Debug for SwipeMenuLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SwipeMenuLayout")
            .field("id", &inner.id)
            .field("state", &inner.committed)
            .field("offset", &inner.offset)
            .field("placement", &inner.placement)
            .finish()
    }
}

impl SwipeMenuLayout {
    pub fn builder() -> SwipeMenuBuilder {
        SwipeMenuBuilder::default()
    }

    /// Bind children by the ids named in `attrs`. Each role binds the first child
    /// carrying its id; anything else is dropped with a warning.
    pub fn inflate(
        attrs: &SwipeMenuAttrs,
        children: Vec<(ChildId, Box<dyn Child>)>,
        coordinator: &Rc<SwipeCoordinator>,
    ) -> Result<Self> {
        attrs.validate()?;
        let mut builder = SwipeMenuBuilder::default().attrs(attrs);

        for (id, child) in children {
            let slot = match attrs.role_of(id) {
                Some(ChildRole::Content) => &mut builder.content,
                Some(ChildRole::LeftMenu) => &mut builder.left,
                Some(ChildRole::RightMenu) => &mut builder.right,
                None => {
                    log::warn!("swipe menu child {id} matches no configured role; ignored");
                    continue;
                }
            };
            if slot.is_some() {
                log::warn!("swipe menu child {id} is a second candidate for its role; ignored");
                continue;
            }
            *slot = Some(child);
        }

        builder.build(coordinator)
    }

    /// Inflate from a raw attribute set. Malformed attributes are logged and the row
    /// falls back to defaults, which binds no children.
    pub fn inflate_from_json(
        json: &str,
        children: Vec<(ChildId, Box<dyn Child>)>,
        coordinator: &Rc<SwipeCoordinator>,
    ) -> Self {
        let attrs = SwipeMenuAttrs::parse_or_default(json);
        match Self::inflate(&attrs, children, coordinator) {
            Ok(menu) => menu,
            Err(e) => {
                // parse_or_default only hands out validated attributes
                log::error!("swipe menu inflation failed, using an empty row: {e}");
                SwipeMenuBuilder::default().build_unchecked(coordinator)
            }
        }
    }

    pub(crate) fn from_parts(
        inner: Rc<RefCell<MenuInner>>,
        coordinator: Rc<SwipeCoordinator>,
    ) -> Self {
        Self { inner, coordinator }
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<MenuInner>> {
        Rc::downgrade(&self.inner)
    }

    pub fn id(&self) -> MenuId {
        self.inner.borrow().id
    }

    pub fn coordinator(&self) -> &Rc<SwipeCoordinator> {
        &self.coordinator
    }

    /// Last committed state. Updated when a settle starts, not when it lands.
    pub fn state(&self) -> MenuState {
        self.inner.borrow().committed
    }

    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    /// Live horizontal scroll offset. Positive reveals the right menu.
    pub fn offset(&self) -> f32 {
        self.inner.borrow().offset
    }

    pub fn is_settling(&self) -> bool {
        self.inner.borrow().settle.is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().attached
    }

    pub fn directions(&self) -> SwipeDirections {
        self.inner.borrow().directions
    }

    /// Range a drag may move the offset in, from the latest layout.
    pub fn bounds(&self) -> ScrollBounds {
        self.inner.borrow().bounds()
    }

    pub fn size(&self) -> Size {
        self.inner.borrow().size
    }

    pub fn placement(&self) -> Placement {
        self.inner.borrow().placement
    }

    /// Translation the host applies to the whole row when drawing and hit testing.
    pub fn translation(&self) -> Transform {
        Transform::translate(-self.offset(), 0.0)
    }

    /// Where a child currently shows, after the scroll translation.
    pub fn visible_rect(&self, role: ChildRole) -> Option<Rect> {
        let placement = self.placement();
        let rect = match role {
            ChildRole::Content => placement.content,
            ChildRole::LeftMenu => placement.left_menu,
            ChildRole::RightMenu => placement.right_menu,
        }?;
        Some(self.translation().apply_to_rect(rect))
    }

    pub fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> Size {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let mut slots: Vec<&mut ChildSlot> = [
            inner.content.as_mut(),
            inner.left.as_mut(),
            inner.right.as_mut(),
        ]
        .into_iter()
        .flatten()
        .collect();
        let size = measure_children(&mut slots, width, height, inner.min_size);
        inner.size = size;
        size
    }

    /// Place children from the last measure pass. A row resting open is re-pinned to
    /// its menu's new extent.
    pub fn layout(&self) -> Placement {
        let (placement, lost_panel) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            inner.placement = place_children(
                inner.padding,
                inner.content.as_mut(),
                inner.left.as_mut(),
                inner.right.as_mut(),
            );

            let mut lost_panel = false;
            if inner.session.is_none() && inner.settle.is_none() && inner.committed.is_open() {
                match inner.stops().target(inner.committed) {
                    Some(target) => inner.offset = target,
                    None => {
                        inner.offset = 0.0;
                        inner.committed = MenuState::Closed;
                        lost_panel = true;
                    }
                }
            }
            (inner.placement, lost_panel)
        };

        if lost_panel {
            self.coordinator.release(self.id());
        }
        placement
    }

    /// Feed one pointer sample from the host's dispatch pipeline.
    pub fn dispatch_pointer(&self, event: &PointerEvent) -> Dispatch {
        match event.event {
            PointerEventKind::Down(_) => self.on_down(event),
            PointerEventKind::Move => self.on_move(event),
            PointerEventKind::Up(_) | PointerEventKind::Cancel => self.on_release(event),
        }
    }

    fn on_down(&self, event: &PointerEvent) -> Dispatch {
        let id = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if inner.session.is_some() {
                log::debug!("swipe menu {}: new touch replaces an unfinished gesture", inner.id);
            }

            // The finger takes over from any settle in flight.
            if let Some(handle) = inner.settle.take() {
                self.coordinator.frames().cancel(handle);
                inner.scroller.force_finished();
            }
            inner.session = Some(GestureSession::begin(event.id, event.position));
            inner.id
        };

        let mut out = Dispatch::empty();
        if self.coordinator.current_open_instance().is_some() {
            self.coordinator.close_others(id);
            out |= Dispatch::DISALLOW_PARENT_INTERCEPT;
        }
        out
    }

    fn on_move(&self, event: &PointerEvent) -> Dispatch {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let slop = inner.touch_slop;
        let bounds = inner.bounds();

        let Some(session) = inner.session.as_mut() else {
            return Dispatch::empty();
        };
        if session.pointer() != event.id {
            return Dispatch::empty();
        }

        let at = event.position;
        let dx = match session.classify(at, slop) {
            MoveStep::Vertical => return Dispatch::empty(),
            MoveStep::Horizontal { dx } => dx,
        };
        session.advance(at);
        let net = session.net_dx(at);

        inner.offset = bounds.clamp(inner.offset + dx);

        let mut out = Dispatch::empty();
        if dx.abs() > slop {
            out |= Dispatch::DISALLOW_PARENT_INTERCEPT;
        }
        if net.abs() > slop {
            out |= Dispatch::INTERCEPT_CHILDREN;
        }
        out
    }

    fn on_release(&self, event: &PointerEvent) -> Dispatch {
        let (state, swiping) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let Some(session) = inner.session.take() else {
                return Dispatch::empty();
            };
            if session.pointer() != event.id {
                inner.session = Some(session);
                return Dispatch::empty();
            }

            let at = event.position;
            let slop = inner.touch_slop;
            let swiping = session.is_swipe(at, slop);
            let state = resolve(
                inner.committed,
                session.net_dx(at),
                inner.offset,
                &inner.stops(),
                inner.fraction,
                slop,
            );
            (state, swiping)
        };

        self.settle(state);

        if swiping {
            Dispatch::INTERCEPT_CHILDREN
        } else {
            Dispatch::empty()
        }
    }

    /// Animate to `state` and update the coordinator. An open state whose menu is
    /// missing settles closed instead.
    pub(crate) fn settle(&self, state: MenuState) {
        let frames = self.coordinator.frames().clone();
        let (id, state) = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;

            let (state, target) = match inner.stops().target(state) {
                Some(target) => (state, target),
                None => {
                    log::warn!("swipe menu {} cannot open {state:?}: menu not laid out", inner.id);
                    (MenuState::Closed, 0.0)
                }
            };

            if let Some(handle) = inner.settle.take() {
                frames.cancel(handle);
            }
            // Settling owns the offset from here; a drag still in progress ends.
            inner.session = None;
            inner.committed = state;

            let start = inner.offset;
            if target != start {
                inner
                    .scroller
                    .start_scroll_to(start, target, inner.settle_duration, frames.now());
                let menu = Rc::downgrade(&self.inner);
                inner.settle = Some(frames.post(move |now| step_settle(&menu, now)));
            } else {
                inner.scroller.force_finished();
            }
            log::debug!("swipe menu {} settling to {state:?} ({start} -> {target})", inner.id);
            (inner.id, state)
        };

        if state.is_open() {
            self.coordinator.register_open(self, state);
        } else {
            self.coordinator.release(id);
        }
    }

    /// Jump to closed without animating.
    pub(crate) fn snap_closed(&self) {
        let id = {
            let mut inner = self.inner.borrow_mut();
            if let Some(handle) = inner.settle.take() {
                self.coordinator.frames().cancel(handle);
            }
            inner.scroller.force_finished();
            inner.offset = 0.0;
            inner.committed = MenuState::Closed;
            inner.id
        };
        self.coordinator.release(id);
    }

    pub fn open_left(&self) -> Result<()> {
        self.open(MenuState::LeftOpen, ChildRole::LeftMenu)
    }

    pub fn open_right(&self) -> Result<()> {
        self.open(MenuState::RightOpen, ChildRole::RightMenu)
    }

    fn open(&self, state: MenuState, role: ChildRole) -> Result<()> {
        if self.inner.borrow().stops().target(state).is_none() {
            return Err(SwipeError::MissingChild(role));
        }
        self.settle(state);
        Ok(())
    }

    pub fn close(&self) {
        self.settle(MenuState::Closed);
    }

    /// Force-close whichever row is open, immediately, and clear the registry.
    pub fn reset_status(&self) {
        self.coordinator.reset_status();
    }

    /// The row entered the view tree. A row that was open when it left comes back
    /// open, unless another row opened in between.
    pub fn on_attached(&self) {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.attached = true;
            inner.id
        };
        log::info!("swipe menu {id} attached");

        match self.coordinator.take_detached(id) {
            Some(state) => self.settle(state),
            None => {
                let mut inner = self.inner.borrow_mut();
                if inner.offset == 0.0 && inner.settle.is_none() {
                    inner.committed = MenuState::Closed;
                }
            }
        }
    }

    /// The row left the view tree: drop any gesture, stop settling and close on the
    /// spot.
    pub fn on_detached(&self) {
        let (id, committed) = {
            let mut inner = self.inner.borrow_mut();
            inner.attached = false;
            inner.session = None;
            if let Some(handle) = inner.settle.take() {
                self.coordinator.frames().cancel(handle);
            }
            inner.scroller.force_finished();
            inner.offset = 0.0;
            let committed = std::mem::take(&mut inner.committed);
            (inner.id, committed)
        };

        if self.coordinator.current_open_instance() == Some(id) {
            self.coordinator.stash_detached(id, committed);
        }
        log::info!("swipe menu {id} detached");
    }
}

/// Explicit construction: each role gets its child directly.
pub struct SwipeMenuBuilder {
    attrs: SwipeMenuAttrs,
    touch_slop: f32,
    settle_duration: Duration,
    padding: Insets,
    min_size: Size,
    content: Option<Box<dyn Child>>,
    left: Option<Box<dyn Child>>,
    right: Option<Box<dyn Child>>,
}

impl Default for SwipeMenuBuilder {
    fn default() -> Self {
        Self {
            attrs: SwipeMenuAttrs::default(),
            touch_slop: DEFAULT_TOUCH_SLOP,
            settle_duration: Scroller::DEFAULT_DURATION,
            padding: Insets::ZERO,
            min_size: Size::ZERO,
            content: None,
            left: None,
            right: None,
        }
    }
}

impl SwipeMenuBuilder {
    /// Take permissions and threshold from an attribute set. Child ids are ignored.
    pub fn attrs(mut self, attrs: &SwipeMenuAttrs) -> Self {
        self.attrs.can_left_swipe = attrs.can_left_swipe;
        self.attrs.can_right_swipe = attrs.can_right_swipe;
        self.attrs.fraction = attrs.fraction;
        self
    }

    pub fn content(mut self, child: impl Child + 'static) -> Self {
        self.content = Some(Box::new(child));
        self
    }

    pub fn left_menu(mut self, child: impl Child + 'static) -> Self {
        self.left = Some(Box::new(child));
        self
    }

    pub fn right_menu(mut self, child: impl Child + 'static) -> Self {
        self.right = Some(Box::new(child));
        self
    }

    pub fn can_left_swipe(mut self, enabled: bool) -> Self {
        self.attrs.can_left_swipe = enabled;
        self
    }

    pub fn can_right_swipe(mut self, enabled: bool) -> Self {
        self.attrs.can_right_swipe = enabled;
        self
    }

    pub fn fraction(mut self, fraction: f32) -> Self {
        self.attrs.fraction = fraction;
        self
    }

    pub fn touch_slop(mut self, px: f32) -> Self {
        self.touch_slop = px.max(0.0);
        self
    }

    pub fn settle_duration(mut self, duration: Duration) -> Self {
        self.settle_duration = duration;
        self
    }

    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn min_size(mut self, min: Size) -> Self {
        self.min_size = min;
        self
    }

    pub fn build(self, coordinator: &Rc<SwipeCoordinator>) -> Result<SwipeMenuLayout> {
        self.attrs.validate()?;
        Ok(self.build_unchecked(coordinator))
    }

    fn build_unchecked(self, coordinator: &Rc<SwipeCoordinator>) -> SwipeMenuLayout {
        let inner = MenuInner {
            id: coordinator.next_id(),
            directions: self.attrs.directions(),
            fraction: self.attrs.fraction,
            touch_slop: self.touch_slop,
            settle_duration: self.settle_duration,
            padding: self.padding,
            min_size: self.min_size,
            content: self.content.map(ChildSlot::new),
            left: self.left.map(ChildSlot::new),
            right: self.right.map(ChildSlot::new),
            size: Size::ZERO,
            placement: Placement::default(),
            offset: 0.0,
            committed: MenuState::Closed,
            session: None,
            scroller: Scroller::new(),
            settle: None,
            attached: true,
        };
        SwipeMenuLayout::from_parts(Rc::new(RefCell::new(inner)), coordinator.clone())
    }
}
