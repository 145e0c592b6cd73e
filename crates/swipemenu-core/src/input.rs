use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Tertiary,  // Middle mouse
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down(PointerButton),
    Up(PointerButton),
    Move,
    /// The host took the stream away (e.g. an ancestor started scrolling).
    Cancel,
}

/// A pointer sample in raw screen coordinates.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub event: PointerEventKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn touch(id: u64, event: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            id: PointerId(id),
            kind: PointerKind::Touch,
            event,
            position: Vec2 { x, y },
        }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::touch(0, PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::touch(0, PointerEventKind::Move, x, y)
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::touch(0, PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    pub fn cancel(x: f32, y: f32) -> Self {
        Self::touch(0, PointerEventKind::Cancel, x, y)
    }
}
