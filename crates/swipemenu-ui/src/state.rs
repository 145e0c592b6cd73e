use swipemenu_core::SwipeDirections;

use crate::layout::Placement;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuState {
    #[default]
    Closed,
    LeftOpen,
    RightOpen,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        !matches!(self, MenuState::Closed)
    }
}

/// Inclusive range the live scroll offset may take during a drag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollBounds {
    /// `<= 0`; the left menu's left edge when it may be revealed.
    pub min: f32,
    /// `>= 0`; the right menu's extent past the content when it may be revealed.
    pub max: f32,
}

impl ScrollBounds {
    pub fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(self.min, self.max)
    }
}

/// Where each state rests, derived from a layout pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stops {
    pub left_open: Option<f32>,
    pub right_open: Option<f32>,
    pub left_width: Option<f32>,
    pub right_width: Option<f32>,
}

impl Stops {
    /// `content_margin_right` is the content's trailing margin, which sits between
    /// the content and the right menu's own margin.
    pub fn from_placement(placement: &Placement, content_margin_right: f32) -> Self {
        let left_open = placement.left_menu.map(|r| r.x);
        let right_open = match (placement.content, placement.right_menu) {
            (Some(c), Some(r)) => Some(r.right() - c.right() - content_margin_right),
            _ => None,
        };
        Self {
            left_open,
            right_open,
            left_width: placement.left_menu.map(|r| r.w),
            right_width: placement.right_menu.map(|r| r.w),
        }
    }

    pub fn bounds(&self, directions: SwipeDirections) -> ScrollBounds {
        let min = match self.left_open {
            Some(x) if directions.contains(SwipeDirections::RIGHT_SWIPE) => x.min(0.0),
            _ => 0.0,
        };
        let max = match self.right_open {
            Some(x) if directions.contains(SwipeDirections::LEFT_SWIPE) => x.max(0.0),
            _ => 0.0,
        };
        ScrollBounds { min, max }
    }

    /// Resting offset for `state`, or `None` if the panel it needs is missing.
    pub fn target(&self, state: MenuState) -> Option<f32> {
        match state {
            MenuState::Closed => Some(0.0),
            MenuState::LeftOpen => self.left_open,
            MenuState::RightOpen => self.right_open,
        }
    }
}

/// Decide where a released gesture should settle.
///
/// `net_dx` is the release displacement in scroll direction (positive when the
/// finger moved left), `offset` the live scroll offset. The drag direction and the
/// offset sign must both point at a panel, and the offset must be past `fraction`
/// of that panel's width; anything else closes.
pub fn resolve(
    previous: MenuState,
    net_dx: f32,
    offset: f32,
    stops: &Stops,
    fraction: f32,
    slop: f32,
) -> MenuState {
    if net_dx.abs() < slop {
        return previous;
    }

    let candidate = if net_dx < 0.0 && offset < 0.0 {
        stops.left_width.map(|w| (w, MenuState::LeftOpen))
    } else if net_dx > 0.0 && offset > 0.0 {
        stops.right_width.map(|w| (w, MenuState::RightOpen))
    } else {
        None
    };

    match candidate {
        Some((width, state)) if offset.abs() > (width * fraction).abs() => state,
        _ => MenuState::Closed,
    }
}
