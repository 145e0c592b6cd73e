use std::cell::Cell;
use std::rc::Rc;

use swipemenu_core::animation::TestClock;
use swipemenu_core::{
    ChildRole, FrameScheduler, PointerButton, PointerEvent, PointerEventKind, Size,
    SwipeDirections, SwipeError, SwipeMenuAttrs,
};
use swipemenu_ui::{
    Child, ChildParams, Dispatch, FixedChild, MeasureSpec, MenuState, Placement, SwipeCoordinator,
    SwipeMenuLayout,
};
use web_time::Duration;

const Y: f32 = 24.0;

struct Harness {
    clock: TestClock,
    frames: Rc<FrameScheduler>,
    coordinator: Rc<SwipeCoordinator>,
}

impl Harness {
    fn new() -> Self {
        let clock = TestClock::new();
        let frames = Rc::new(FrameScheduler::new(Rc::new(clock.clone())));
        let coordinator = SwipeCoordinator::new(frames.clone());
        Self {
            clock,
            frames,
            coordinator,
        }
    }

    fn row(&self, left: Option<f32>, right: Option<f32>) -> SwipeMenuLayout {
        let mut builder = SwipeMenuLayout::builder().content(FixedChild::new(300.0, 48.0));
        if let Some(w) = left {
            builder = builder.left_menu(FixedChild::new(w, 48.0));
        }
        if let Some(w) = right {
            builder = builder.right_menu(FixedChild::new(w, 48.0));
        }
        let row = builder.build(&self.coordinator).unwrap();
        lay_out(&row);
        row
    }

    fn advance(&self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        self.frames.tick();
    }

    /// Let every running settle land.
    fn settle(&self) {
        self.clock.advance(Duration::from_millis(400));
        while self.frames.tick() {}
    }
}

fn lay_out(row: &SwipeMenuLayout) -> Placement {
    row.measure(MeasureSpec::Exactly(300.0), MeasureSpec::AtMost(800.0));
    row.layout()
}

/// Down at `from`, move in 5px steps to `to`, lift. Returns every flag seen.
fn drag(row: &SwipeMenuLayout, from: f32, to: f32) -> Dispatch {
    let mut flags = row.dispatch_pointer(&PointerEvent::down(from, Y));
    let step = if to < from { -5.0 } else { 5.0 };
    let mut x = from;
    while x != to {
        x += step;
        flags |= row.dispatch_pointer(&PointerEvent::moved(x, Y));
    }
    flags | row.dispatch_pointer(&PointerEvent::up(to, Y))
}

fn describe(p: &Placement) -> String {
    let part = |name: &str, r: Option<swipemenu_core::Rect>| match r {
        Some(r) => format!("{name}={},{} {}x{}", r.x, r.y, r.w, r.h),
        None => format!("{name}=-"),
    };
    [
        part("content", p.content),
        part("left", p.left_menu),
        part("right", p.right_menu),
    ]
    .join(" | ")
}

#[test]
fn drag_past_threshold_opens_right_menu() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    let flags = drag(&row, 300.0, 260.0);
    assert!(flags.contains(Dispatch::INTERCEPT_CHILDREN));
    assert_eq!(row.state(), MenuState::RightOpen);
    assert_eq!(row.offset(), 40.0);
    assert!(row.is_settling());
    assert_eq!(h.coordinator.current_open_instance(), Some(row.id()));

    h.advance(100);
    assert!(row.offset() > 40.0 && row.offset() < 100.0);

    h.settle();
    assert_eq!(row.offset(), 100.0);
    assert!(!row.is_settling());
    assert!(h.frames.is_idle());
}

#[test]
fn short_drag_falls_back_closed() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    drag(&row, 300.0, 280.0);
    assert_eq!(row.state(), MenuState::Closed);
    assert_eq!(h.coordinator.current_open_instance(), None);

    h.settle();
    assert_eq!(row.offset(), 0.0);
}

#[test]
fn open_then_close_returns_to_exact_zero() {
    let h = Harness::new();
    let row = h.row(None, Some(100.0));

    drag(&row, 300.0, 260.0);
    h.settle();
    assert_eq!(row.offset(), 100.0);

    let flags = drag(&row, 100.0, 200.0);
    assert!(flags.contains(Dispatch::DISALLOW_PARENT_INTERCEPT));
    assert_eq!(row.state(), MenuState::Closed);
    h.settle();
    assert_eq!(row.offset(), 0.0);
    assert_eq!(h.coordinator.open_state(), None);
}

#[test]
fn missing_left_menu_blocks_rightward_drag() {
    let h = Harness::new();
    let row = h.row(None, Some(100.0));

    row.dispatch_pointer(&PointerEvent::down(100.0, Y));
    row.dispatch_pointer(&PointerEvent::moved(150.0, Y));
    assert_eq!(row.offset(), 0.0);
    row.dispatch_pointer(&PointerEvent::up(200.0, Y));
    assert_eq!(row.state(), MenuState::Closed);
    assert_eq!(row.offset(), 0.0);
}

#[test]
fn offset_is_clamped_during_large_moves() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));
    assert_eq!(row.bounds().min, -80.0);
    assert_eq!(row.bounds().max, 100.0);

    row.dispatch_pointer(&PointerEvent::down(300.0, Y));
    let flags = row.dispatch_pointer(&PointerEvent::moved(250.0, Y));
    assert_eq!(
        flags,
        Dispatch::DISALLOW_PARENT_INTERCEPT | Dispatch::INTERCEPT_CHILDREN
    );
    row.dispatch_pointer(&PointerEvent::moved(100.0, Y));
    assert_eq!(row.offset(), 100.0);
    row.dispatch_pointer(&PointerEvent::moved(0.0, Y));
    assert_eq!(row.offset(), 100.0);

    // all the way back past closed, into the left menu's range
    row.dispatch_pointer(&PointerEvent::moved(600.0, Y));
    assert_eq!(row.offset(), -80.0);
}

#[test]
fn disabled_direction_stays_shut() {
    let h = Harness::new();
    let row = SwipeMenuLayout::builder()
        .content(FixedChild::new(300.0, 48.0))
        .left_menu(FixedChild::new(80.0, 48.0))
        .right_menu(FixedChild::new(100.0, 48.0))
        .can_left_swipe(false)
        .build(&h.coordinator)
        .unwrap();
    lay_out(&row);
    assert_eq!(row.directions(), SwipeDirections::RIGHT_SWIPE);

    drag(&row, 300.0, 200.0);
    assert_eq!(row.offset(), 0.0);
    assert_eq!(row.state(), MenuState::Closed);

    drag(&row, 100.0, 200.0);
    assert_eq!(row.offset(), -80.0);
    assert_eq!(row.state(), MenuState::LeftOpen);
    // already at the stop: nothing to animate
    assert!(!row.is_settling());
}

#[test]
fn tap_is_not_intercepted() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    assert_eq!(row.dispatch_pointer(&PointerEvent::down(150.0, Y)), Dispatch::empty());
    assert_eq!(row.dispatch_pointer(&PointerEvent::moved(145.0, Y)), Dispatch::empty());
    assert_eq!(row.dispatch_pointer(&PointerEvent::up(145.0, Y)), Dispatch::empty());
    assert_eq!(row.state(), MenuState::Closed);
}

#[test]
fn vertical_scroll_leaves_row_alone() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    row.dispatch_pointer(&PointerEvent::down(150.0, 10.0));
    assert_eq!(
        row.dispatch_pointer(&PointerEvent::moved(148.0, 60.0)),
        Dispatch::empty()
    );
    assert_eq!(row.offset(), 0.0);
    assert_eq!(
        row.dispatch_pointer(&PointerEvent::up(148.0, 60.0)),
        Dispatch::empty()
    );
    assert_eq!(row.state(), MenuState::Closed);
}

#[test]
fn touching_another_row_closes_the_open_one() {
    let h = Harness::new();
    let a = h.row(Some(80.0), Some(100.0));
    let b = h.row(Some(80.0), Some(100.0));

    drag(&a, 300.0, 260.0);
    h.settle();
    assert_eq!(h.coordinator.current_open_instance(), Some(a.id()));

    let flags = b.dispatch_pointer(&PointerEvent::down(150.0, Y));
    assert_eq!(flags, Dispatch::DISALLOW_PARENT_INTERCEPT);
    assert_eq!(a.state(), MenuState::Closed);
    assert!(a.is_settling());
    assert_eq!(h.coordinator.current_open_instance(), None);
    b.dispatch_pointer(&PointerEvent::up(150.0, Y));

    h.settle();
    assert_eq!(a.offset(), 0.0);

    drag(&b, 300.0, 250.0);
    assert_eq!(h.coordinator.current_open_instance(), Some(b.id()));
    assert_eq!(a.state(), MenuState::Closed);
}

#[test]
fn programmatic_open_closes_previous() {
    let h = Harness::new();
    let a = h.row(Some(80.0), Some(100.0));
    let b = h.row(Some(80.0), Some(100.0));

    a.open_right().unwrap();
    h.settle();
    assert_eq!(a.offset(), 100.0);

    b.open_left().unwrap();
    assert_eq!(a.state(), MenuState::Closed);
    assert_eq!(
        h.coordinator.open_state(),
        Some((b.id(), MenuState::LeftOpen))
    );
    h.settle();
    assert_eq!(a.offset(), 0.0);
    assert_eq!(b.offset(), -80.0);

    b.close();
    h.settle();
    assert_eq!(b.offset(), 0.0);
    assert_eq!(h.coordinator.open_state(), None);
}

#[test]
fn tap_on_open_row_keeps_it_open() {
    let h = Harness::new();
    let row = h.row(None, Some(100.0));
    row.open_right().unwrap();
    h.settle();

    assert_eq!(
        row.dispatch_pointer(&PointerEvent::down(50.0, Y)),
        Dispatch::DISALLOW_PARENT_INTERCEPT
    );
    assert_eq!(row.dispatch_pointer(&PointerEvent::up(52.0, Y)), Dispatch::empty());
    assert_eq!(row.state(), MenuState::RightOpen);
    assert_eq!(row.offset(), 100.0);
    assert!(!row.is_settling());
    assert_eq!(h.coordinator.current_open_instance(), Some(row.id()));
}

#[test]
fn reset_status_snaps_closed() {
    let h = Harness::new();
    let a = h.row(Some(80.0), Some(100.0));
    let b = h.row(Some(80.0), Some(100.0));

    drag(&a, 300.0, 260.0);
    h.advance(50);
    assert!(a.is_settling());

    b.reset_status();
    assert_eq!(a.offset(), 0.0);
    assert_eq!(a.state(), MenuState::Closed);
    assert!(!a.is_settling());
    assert!(h.frames.is_idle());
    assert_eq!(h.coordinator.current_open_instance(), None);
}

#[test]
fn recycled_row_comes_back_open() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));
    row.open_right().unwrap();
    h.settle();

    row.on_detached();
    assert!(!row.is_attached());
    assert_eq!(row.offset(), 0.0);
    assert_eq!(row.state(), MenuState::Closed);
    assert_eq!(h.coordinator.current_open_instance(), None);

    row.on_attached();
    assert!(row.is_attached());
    assert_eq!(row.state(), MenuState::RightOpen);
    assert!(row.is_settling());
    h.settle();
    assert_eq!(row.offset(), 100.0);
    assert_eq!(h.coordinator.current_open_instance(), Some(row.id()));
}

#[test]
fn recycled_row_stays_closed_after_another_opens() {
    let h = Harness::new();
    let a = h.row(Some(80.0), Some(100.0));
    let b = h.row(Some(80.0), Some(100.0));
    a.open_right().unwrap();
    h.settle();

    a.on_detached();
    b.open_right().unwrap();
    h.settle();

    a.on_attached();
    assert_eq!(a.state(), MenuState::Closed);
    assert_eq!(a.offset(), 0.0);
    assert!(!a.is_settling());
    assert_eq!(h.coordinator.current_open_instance(), Some(b.id()));
}

#[test]
fn detach_mid_drag_drops_the_gesture() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    row.dispatch_pointer(&PointerEvent::down(300.0, Y));
    row.dispatch_pointer(&PointerEvent::moved(240.0, Y));
    row.on_detached();
    assert_eq!(row.offset(), 0.0);

    assert_eq!(row.dispatch_pointer(&PointerEvent::up(240.0, Y)), Dispatch::empty());
    assert_eq!(row.state(), MenuState::Closed);
}

#[test]
fn touch_down_interrupts_settle() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    drag(&row, 300.0, 260.0);
    h.advance(100);
    let frozen = row.offset();
    assert!(frozen > 40.0 && frozen < 100.0);

    row.dispatch_pointer(&PointerEvent::down(200.0, Y));
    assert!(!row.is_settling());
    h.advance(100);
    assert_eq!(row.offset(), frozen);

    row.dispatch_pointer(&PointerEvent::up(200.0, Y));
    assert_eq!(row.state(), MenuState::RightOpen);
    h.settle();
    assert_eq!(row.offset(), 100.0);
}

#[test]
fn cancel_resolves_like_release() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    row.dispatch_pointer(&PointerEvent::down(300.0, Y));
    for x in [290.0, 280.0, 270.0, 260.0, 250.0] {
        row.dispatch_pointer(&PointerEvent::moved(x, Y));
    }
    let flags = row.dispatch_pointer(&PointerEvent::cancel(250.0, Y));
    assert_eq!(flags, Dispatch::INTERCEPT_CHILDREN);
    assert_eq!(row.state(), MenuState::RightOpen);
}

#[test]
fn other_pointers_cannot_move_the_row() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));

    row.dispatch_pointer(&PointerEvent::down(300.0, Y));
    assert_eq!(
        row.dispatch_pointer(&PointerEvent::touch(1, PointerEventKind::Move, 50.0, Y)),
        Dispatch::empty()
    );
    assert_eq!(row.offset(), 0.0);
    let up = PointerEventKind::Up(PointerButton::Primary);
    assert_eq!(
        row.dispatch_pointer(&PointerEvent::touch(1, up, 50.0, Y)),
        Dispatch::empty()
    );
    assert_eq!(row.state(), MenuState::Closed);

    // the first finger is still tracked
    row.dispatch_pointer(&PointerEvent::moved(250.0, Y));
    assert_eq!(row.offset(), 50.0);
}

#[test]
fn new_touch_replaces_gesture_that_never_ended() {
    let h = Harness::new();
    let row = h.row(None, Some(100.0));
    let down = PointerEventKind::Down(PointerButton::Primary);
    let up = PointerEventKind::Up(PointerButton::Primary);

    // no up or cancel ever arrives for pointer 7
    row.dispatch_pointer(&PointerEvent::touch(7, down, 300.0, Y));

    row.dispatch_pointer(&PointerEvent::touch(8, down, 300.0, Y));
    row.dispatch_pointer(&PointerEvent::touch(8, PointerEventKind::Move, 150.0, Y));
    assert_eq!(row.offset(), 100.0);
    row.dispatch_pointer(&PointerEvent::touch(7, PointerEventKind::Move, 300.0, Y));
    assert_eq!(row.offset(), 100.0);

    let flags = row.dispatch_pointer(&PointerEvent::touch(8, up, 150.0, Y));
    assert_eq!(flags, Dispatch::INTERCEPT_CHILDREN);
    assert_eq!(row.state(), MenuState::RightOpen);
}

#[test]
fn closing_from_outside_ends_the_drag() {
    let h = Harness::new();
    let a = h.row(Some(80.0), Some(100.0));
    let b = h.row(Some(80.0), Some(100.0));
    a.open_right().unwrap();
    h.settle();

    a.dispatch_pointer(&PointerEvent::down(100.0, Y));
    a.dispatch_pointer(&PointerEvent::moved(110.0, Y));
    assert_eq!(a.offset(), 90.0);

    b.open_right().unwrap();
    assert_eq!(a.state(), MenuState::Closed);
    assert!(a.is_settling());

    // the settle owns the offset now
    assert_eq!(a.dispatch_pointer(&PointerEvent::moved(130.0, Y)), Dispatch::empty());
    assert_eq!(a.offset(), 90.0);
    h.settle();
    assert_eq!(a.offset(), 0.0);

    assert_eq!(a.dispatch_pointer(&PointerEvent::up(130.0, Y)), Dispatch::empty());
    assert_eq!(a.state(), MenuState::Closed);
    assert_eq!(h.coordinator.current_open_instance(), Some(b.id()));
}

#[test]
fn fraction_above_one_only_opens_from_code() {
    let h = Harness::new();
    let row = SwipeMenuLayout::builder()
        .content(FixedChild::new(300.0, 48.0))
        .right_menu(FixedChild::new(100.0, 48.0))
        .fraction(1.5)
        .build(&h.coordinator)
        .unwrap();
    lay_out(&row);

    drag(&row, 300.0, 150.0);
    assert_eq!(row.state(), MenuState::Closed);
    h.settle();
    assert_eq!(row.offset(), 0.0);

    row.open_right().unwrap();
    h.settle();
    assert_eq!(row.offset(), 100.0);
}

#[test]
fn missing_content_leaves_right_menu_unplaced() {
    let h = Harness::new();
    let row = SwipeMenuLayout::builder()
        .left_menu(FixedChild::new(80.0, 48.0))
        .right_menu(FixedChild::new(100.0, 48.0))
        .build(&h.coordinator)
        .unwrap();
    let placement = lay_out(&row);
    insta::assert_snapshot!(describe(&placement), @"content=- | left=-80,0 80x48 | right=-");

    assert!(matches!(
        row.open_right(),
        Err(SwipeError::MissingChild(ChildRole::RightMenu))
    ));
    assert!(row.open_left().is_ok());
}

#[test]
fn inflate_binds_children_by_id() {
    let h = Harness::new();
    let attrs = SwipeMenuAttrs {
        content_view: Some(1),
        left_menu_view: Some(2),
        right_menu_view: Some(3),
        ..SwipeMenuAttrs::default()
    };
    let children: Vec<(u64, Box<dyn Child>)> = vec![
        (3, Box::new(FixedChild::new(100.0, 48.0))),
        (1, Box::new(FixedChild::new(300.0, 48.0))),
        (9, Box::new(FixedChild::new(500.0, 48.0))),
        (2, Box::new(FixedChild::new(80.0, 48.0))),
        (1, Box::new(FixedChild::new(10.0, 10.0))),
    ];
    let row = SwipeMenuLayout::inflate(&attrs, children, &h.coordinator).unwrap();
    let placement = lay_out(&row);
    insta::assert_snapshot!(
        describe(&placement),
        @"content=0,0 300x48 | left=-80,0 80x48 | right=300,0 100x48"
    );
    assert_eq!(row.size(), Size::new(300.0, 48.0));
}

#[test]
fn inflate_rejects_shared_ids() {
    let h = Harness::new();
    let attrs = SwipeMenuAttrs {
        content_view: Some(1),
        right_menu_view: Some(1),
        ..SwipeMenuAttrs::default()
    };
    let err = SwipeMenuLayout::inflate(&attrs, Vec::new(), &h.coordinator).unwrap_err();
    assert!(matches!(err, SwipeError::DuplicateChildId { id: 1, .. }));
}

#[test]
fn inflate_from_json_reads_permissions() {
    let h = Harness::new();
    let children: Vec<(u64, Box<dyn Child>)> = vec![
        (1, Box::new(FixedChild::new(300.0, 48.0))),
        (3, Box::new(FixedChild::new(100.0, 48.0))),
    ];
    let row = SwipeMenuLayout::inflate_from_json(
        r#"{ "contentView": 1, "rightMenuView": 3, "canRightSwipe": false, "fraction": 0.5 }"#,
        children,
        &h.coordinator,
    );
    lay_out(&row);
    assert_eq!(row.directions(), SwipeDirections::LEFT_SWIPE);

    // 40 of 100 is under half
    drag(&row, 300.0, 260.0);
    assert_eq!(row.state(), MenuState::Closed);
    drag(&row, 300.0, 240.0);
    assert_eq!(row.state(), MenuState::RightOpen);
}

#[test]
fn malformed_json_falls_back_to_empty_row() {
    let h = Harness::new();
    let children: Vec<(u64, Box<dyn Child>)> =
        vec![(1, Box::new(FixedChild::new(300.0, 48.0)))];
    let row = SwipeMenuLayout::inflate_from_json("{ contentView: 1", children, &h.coordinator);
    let placement = lay_out(&row);
    assert_eq!(placement, Placement::default());
    assert_eq!(row.directions(), SwipeDirections::all());
    assert!(row.open_right().is_err());
}

#[test]
fn dropped_row_reads_as_closed() {
    let h = Harness::new();
    let a = h.row(Some(80.0), Some(100.0));
    a.open_right().unwrap();
    assert!(h.coordinator.current_open_instance().is_some());

    drop(a);
    assert_eq!(h.coordinator.current_open_instance(), None);
    // the orphaned settle task winds itself down
    while h.frames.tick() {}
    assert!(h.frames.is_idle());

    let b = h.row(Some(80.0), Some(100.0));
    b.open_left().unwrap();
    assert_eq!(h.coordinator.current_open_instance(), Some(b.id()));
}

struct Resizable {
    width: Rc<Cell<f32>>,
}

impl Child for Resizable {
    fn params(&self) -> ChildParams {
        ChildParams::default()
    }

    fn measure(&mut self, width: MeasureSpec, _height: MeasureSpec) -> Size {
        Size::new(width.resolve(self.width.get()), 48.0)
    }
}

#[test]
fn relayout_repins_open_row() {
    let h = Harness::new();
    let width = Rc::new(Cell::new(100.0));
    let row = SwipeMenuLayout::builder()
        .content(FixedChild::new(300.0, 48.0))
        .right_menu(Resizable {
            width: width.clone(),
        })
        .build(&h.coordinator)
        .unwrap();
    lay_out(&row);
    row.open_right().unwrap();
    h.settle();
    assert_eq!(row.offset(), 100.0);

    width.set(140.0);
    lay_out(&row);
    assert_eq!(row.offset(), 140.0);
    assert_eq!(row.bounds().max, 140.0);
}

#[test]
fn open_row_shows_menu_inside_bounds() {
    let h = Harness::new();
    let row = h.row(Some(80.0), Some(100.0));
    row.open_right().unwrap();
    h.settle();

    let right = row.visible_rect(ChildRole::RightMenu).unwrap();
    assert_eq!((right.x, right.right()), (200.0, 300.0));
    let content = row.visible_rect(ChildRole::Content).unwrap();
    assert_eq!(content.x, -100.0);
    assert_eq!(row.translation().translate_x, -100.0);
}
