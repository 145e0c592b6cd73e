//! Declarative attributes for a swipe menu row.
//!
//! Hosts that inflate rows from markup hand over a JSON attribute set:
//!
//! ```rust
//! use swipemenu_core::config::{SwipeDirections, SwipeMenuAttrs};
//!
//! let attrs = SwipeMenuAttrs::parse(
//!     r#"{ "contentView": 1, "rightMenuView": 3, "canRightSwipe": false, "fraction": 0.25 }"#,
//! )
//! .unwrap();
//! assert_eq!(attrs.right_menu_view, Some(3));
//! assert_eq!(attrs.directions(), SwipeDirections::LEFT_SWIPE);
//! ```

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SwipeError};

pub type ChildId = u64;

pub const DEFAULT_FRACTION: f32 = 0.3;

/// Platform touch slop in px (8dp at 2x density).
pub const DEFAULT_TOUCH_SLOP: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildRole {
    Content,
    LeftMenu,
    RightMenu,
}

impl fmt::Display for ChildRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChildRole::Content => "content view",
            ChildRole::LeftMenu => "left menu view",
            ChildRole::RightMenu => "right menu view",
        })
    }
}

bitflags! {
    /// Which drag directions may open a panel.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SwipeDirections: u8 {
        /// Leftward drag, reveals the right menu.
        const LEFT_SWIPE = 1;
        /// Rightward drag, reveals the left menu.
        const RIGHT_SWIPE = 1 << 1;
    }
}

impl Default for SwipeDirections {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwipeMenuAttrs {
    pub left_menu_view: Option<ChildId>,
    pub right_menu_view: Option<ChildId>,
    pub content_view: Option<ChildId>,
    pub can_left_swipe: bool,
    pub can_right_swipe: bool,
    pub fraction: f32,
}

impl Default for SwipeMenuAttrs {
    fn default() -> Self {
        Self {
            left_menu_view: None,
            right_menu_view: None,
            content_view: None,
            can_left_swipe: true,
            can_right_swipe: true,
            fraction: DEFAULT_FRACTION,
        }
    }
}

const KNOWN_KEYS: [&str; 6] = [
    "leftMenuView",
    "rightMenuView",
    "contentView",
    "canLeftSwipe",
    "canRightSwipe",
    "fraction",
];

impl SwipeMenuAttrs {
    /// Keys that are not swipe menu attributes belong to the host and are skipped.
    pub fn parse(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(map) = value.as_object() {
            for key in map.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
                log::debug!("swipe menu attributes: ignoring `{key}`");
            }
        }
        let attrs: SwipeMenuAttrs = serde_json::from_value(value)?;
        attrs.validate()?;
        Ok(attrs)
    }

    /// Like [`SwipeMenuAttrs::parse`], but a bad attribute set degrades the row to
    /// defaults instead of failing construction.
    pub fn parse_or_default(json: &str) -> Self {
        match Self::parse(json) {
            Ok(attrs) => attrs,
            Err(e) => {
                log::error!("swipe menu attributes rejected, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        // Above 1.0 a drag can never pass the threshold; that is allowed.
        if !self.fraction.is_finite() || self.fraction < 0.0 {
            return Err(SwipeError::InvalidFraction(self.fraction));
        }

        let roles = [
            (ChildRole::LeftMenu, self.left_menu_view),
            (ChildRole::RightMenu, self.right_menu_view),
            (ChildRole::Content, self.content_view),
        ];
        for (i, (first, a)) in roles.iter().enumerate() {
            for (second, b) in &roles[i + 1..] {
                if let (Some(a), Some(b)) = (a, b)
                    && a == b
                {
                    return Err(SwipeError::DuplicateChildId {
                        id: *a,
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn directions(&self) -> SwipeDirections {
        let mut d = SwipeDirections::empty();
        d.set(SwipeDirections::LEFT_SWIPE, self.can_left_swipe);
        d.set(SwipeDirections::RIGHT_SWIPE, self.can_right_swipe);
        d
    }

    /// Role a child plays, by its id.
    pub fn role_of(&self, id: ChildId) -> Option<ChildRole> {
        if self.left_menu_view == Some(id) {
            Some(ChildRole::LeftMenu)
        } else if self.right_menu_view == Some(id) {
            Some(ChildRole::RightMenu)
        } else if self.content_view == Some(id) {
            Some(ChildRole::Content)
        } else {
            None
        }
    }
}
