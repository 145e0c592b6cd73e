use thiserror::Error;

use crate::config::ChildRole;

#[derive(Debug, Error)]
pub enum SwipeError {
    #[error("malformed swipe menu attributes: {0}")]
    Attributes(#[from] serde_json::Error),

    #[error("fraction must be finite and not negative, got {0}")]
    InvalidFraction(f32),

    #[error("child id {id} is configured for both the {first} and the {second}")]
    DuplicateChildId {
        id: u64,
        first: ChildRole,
        second: ChildRole,
    },

    #[error("no {0} is bound to this menu")]
    MissingChild(ChildRole),
}

pub type Result<T, E = SwipeError> = std::result::Result<T, E>;
