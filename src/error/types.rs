use thiserror::Error;

use crate::tree::ElementId;

/// Unified result type for the mirror resize crate.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// Errors surfaced to the host's error channel.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("malformed drag event: {0}")]
    InvalidEventKind(String),
    #[error("unknown drag event `{0}`")]
    UnknownEvent(String),
    #[error("element {0} not found")]
    ElementNotFound(ElementId),
    #[error("cannot append {child} into {parent}: {reason}")]
    HierarchyRequest {
        parent: ElementId,
        child: ElementId,
        reason: &'static str,
    },
    #[error("unsupported selector `{selector}`: {reason}")]
    UnsupportedSelector { selector: String, reason: String },
    #[error("invalid resize options: {0}")]
    Options(#[from] serde_json::Error),
}
