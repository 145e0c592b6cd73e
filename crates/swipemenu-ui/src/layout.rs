//! # Measurement and placement
//!
//! A swipe menu measures its children the way a frame container does, then places
//! them on one horizontal strip:
//!
//! ```text
//!   [ left menu ] | [ content .............. ] [ right menu ]
//!                 ^ x = 0
//! ```
//!
//! Only the content is inside the container's bounds at rest. Panels become
//! visible when the whole viewport is translated by the scroll offset; placement
//! itself never depends on the offset.
//!
//! Children plug in through the [`Child`] trait. Hosts wrap their own nodes;
//! [`FixedChild`] is a plain intrinsic-size child used by tests and demos.

use swipemenu_core::{Insets, Rect, Size};
use taffy::style::AvailableSpace;

/// Incoming size constraint along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureSpec {
    Exactly(f32),
    AtMost(f32),
    Unspecified,
}

impl MeasureSpec {
    pub fn is_exact(&self) -> bool {
        matches!(self, MeasureSpec::Exactly(_))
    }

    /// Final size for a container that would like to be `desired`.
    pub fn resolve(&self, desired: f32) -> f32 {
        match *self {
            MeasureSpec::Exactly(px) => px,
            MeasureSpec::AtMost(px) => desired.min(px),
            MeasureSpec::Unspecified => desired,
        }
    }

    /// Spec handed to a child that asks for `mode` after `used` px of margins.
    pub fn for_child(&self, used: f32, mode: SizeMode) -> MeasureSpec {
        if let SizeMode::Fixed(px) = mode {
            return MeasureSpec::Exactly(px.max(0.0));
        }
        match *self {
            MeasureSpec::Exactly(px) => {
                let room = (px - used).max(0.0);
                match mode {
                    SizeMode::Fill => MeasureSpec::Exactly(room),
                    _ => MeasureSpec::AtMost(room),
                }
            }
            MeasureSpec::AtMost(px) => MeasureSpec::AtMost((px - used).max(0.0)),
            MeasureSpec::Unspecified => MeasureSpec::Unspecified,
        }
    }
}

impl From<AvailableSpace> for MeasureSpec {
    fn from(space: AvailableSpace) -> Self {
        match space {
            AvailableSpace::Definite(px) => MeasureSpec::AtMost(px),
            AvailableSpace::MinContent | AvailableSpace::MaxContent => MeasureSpec::Unspecified,
        }
    }
}

/// How a child wants to be sized along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeMode {
    Fixed(f32),
    Wrap,
    Fill,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChildParams {
    pub width: SizeMode,
    pub height: SizeMode,
    pub margin: Insets,
}

impl Default for ChildParams {
    fn default() -> Self {
        Self {
            width: SizeMode::Wrap,
            height: SizeMode::Wrap,
            margin: Insets::ZERO,
        }
    }
}

/// A node the menu can measure. Implemented by hosts for their own views.
pub trait Child {
    fn params(&self) -> ChildParams;

    fn measure(&mut self, width: MeasureSpec, height: MeasureSpec) -> Size;

    fn is_gone(&self) -> bool {
        false
    }
}

/// Child with a fixed intrinsic size.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedChild {
    pub intrinsic: Size,
    pub params: ChildParams,
    pub gone: bool,
}

impl FixedChild {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            intrinsic: Size::new(width, height),
            params: ChildParams::default(),
            gone: false,
        }
    }

    pub fn width_mode(mut self, mode: SizeMode) -> Self {
        self.params.width = mode;
        self
    }

    pub fn height_mode(mut self, mode: SizeMode) -> Self {
        self.params.height = mode;
        self
    }

    pub fn margin(mut self, margin: Insets) -> Self {
        self.params.margin = margin;
        self
    }

    pub fn gone(mut self, gone: bool) -> Self {
        self.gone = gone;
        self
    }
}

fn wrap(intrinsic: f32, spec: MeasureSpec) -> f32 {
    match spec {
        MeasureSpec::Exactly(px) => px,
        MeasureSpec::AtMost(px) => intrinsic.min(px),
        MeasureSpec::Unspecified => intrinsic,
    }
}

impl Child for FixedChild {
    fn params(&self) -> ChildParams {
        self.params
    }

    fn measure(&mut self, width: MeasureSpec, height: MeasureSpec) -> Size {
        Size::new(
            wrap(self.intrinsic.width, width),
            wrap(self.intrinsic.height, height),
        )
    }

    fn is_gone(&self) -> bool {
        self.gone
    }
}

/// A bound child plus the results of the last measure/layout pass.
pub struct ChildSlot {
    child: Box<dyn Child>,
    pub(crate) measured: Size,
    pub(crate) rect: Option<Rect>,
}

impl ChildSlot {
    pub fn new(child: Box<dyn Child>) -> Self {
        Self {
            child,
            measured: Size::ZERO,
            rect: None,
        }
    }

    pub fn measured(&self) -> Size {
        self.measured
    }

    /// `None` until laid out, or while the child is gone.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn margin(&self) -> Insets {
        self.child.params().margin
    }

    pub fn is_gone(&self) -> bool {
        self.child.is_gone()
    }

    fn measure_with_margins(&mut self, width: MeasureSpec, height: MeasureSpec) -> ChildParams {
        let params = self.child.params();
        let w = width.for_child(params.margin.horizontal(), params.width);
        let h = height.for_child(params.margin.vertical(), params.height);
        self.measured = self.child.measure(w, h);
        params
    }
}

/// Resolved rectangles of the three roles, in container coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub content: Option<Rect>,
    pub left_menu: Option<Rect>,
    pub right_menu: Option<Rect>,
}

/// Measure every visible child, then size the container.
///
/// When either incoming spec is not exact, children that fill an axis cannot be
/// sized until the container is; they are measured once for the max pass and
/// again against the resolved container size.
pub fn measure_children(
    slots: &mut [&mut ChildSlot],
    width: MeasureSpec,
    height: MeasureSpec,
    min_size: Size,
) -> Size {
    let defer_fill = !width.is_exact() || !height.is_exact();
    let mut max_w = 0.0f32;
    let mut max_h = 0.0f32;
    let mut deferred = Vec::new();

    for (i, slot) in slots.iter_mut().enumerate() {
        if slot.is_gone() {
            continue;
        }
        let params = slot.measure_with_margins(width, height);
        max_w = max_w.max(params.margin.left + slot.measured.width + params.margin.right);
        max_h = max_h.max(params.margin.top + slot.measured.height + params.margin.bottom);

        if defer_fill && (params.width == SizeMode::Fill || params.height == SizeMode::Fill) {
            deferred.push(i);
        }
    }

    let size = Size::new(
        width.resolve(max_w.max(min_size.width)),
        height.resolve(max_h.max(min_size.height)),
    );

    for i in deferred {
        let slot = &mut slots[i];
        let params = slot.child.params();
        let m = params.margin;

        let w = if params.width == SizeMode::Fill {
            MeasureSpec::Exactly((size.width - m.horizontal()).max(0.0))
        } else {
            width.for_child(m.horizontal(), params.width)
        };
        let h = if params.height == SizeMode::Fill {
            MeasureSpec::Exactly((size.height - m.vertical()).max(0.0))
        } else {
            height.for_child(m.vertical(), params.height)
        };
        slot.measured = slot.child.measure(w, h);
    }

    size
}

/// Place content at the padding origin and the panels on either side of it.
pub fn place_children(
    padding: Insets,
    content: Option<&mut ChildSlot>,
    left: Option<&mut ChildSlot>,
    right: Option<&mut ChildSlot>,
) -> Placement {
    let mut placement = Placement::default();

    // (right edge + right margin) of the content, where the right panel starts.
    let mut content_end = None;
    if let Some(slot) = content {
        slot.rect = None;
        if !slot.is_gone() {
            let m = slot.margin();
            let rect = Rect::new(
                padding.left + m.left,
                padding.top + m.top,
                slot.measured.width,
                slot.measured.height,
            );
            slot.rect = Some(rect);
            content_end = Some(rect.right() + m.right);
            placement.content = Some(rect);
        }
    }

    if let Some(slot) = left {
        slot.rect = None;
        if !slot.is_gone() {
            let m = slot.margin();
            let rect = Rect::new(
                -slot.measured.width - m.right,
                padding.top + m.top,
                slot.measured.width,
                slot.measured.height,
            );
            slot.rect = Some(rect);
            placement.left_menu = Some(rect);
        }
    }

    if let Some(slot) = right {
        slot.rect = None;
        if !slot.is_gone() {
            match content_end {
                Some(end) => {
                    let m = slot.margin();
                    let rect = Rect::new(
                        end + m.left,
                        padding.top + m.top,
                        slot.measured.width,
                        slot.measured.height,
                    );
                    slot.rect = Some(rect);
                    placement.right_menu = Some(rect);
                }
                None => {
                    log::warn!("swipe menu has a right menu but no content view; right menu not placed");
                }
            }
        }
    }

    placement
}
