use std::fmt;
use std::str::FromStr;

use crate::error::{ResizeError, Result};
use crate::tree::ElementId;

/// Drag-over channels a plugin can listen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DragEventKind {
    /// The pointer is over a draggable item.
    Over,
    /// The pointer is over a container but not over a specific item.
    OverContainer,
}

impl DragEventKind {
    pub const ALL: [DragEventKind; 2] = [DragEventKind::Over, DragEventKind::OverContainer];

    pub const fn as_str(self) -> &'static str {
        match self {
            DragEventKind::Over => "drag:over",
            DragEventKind::OverContainer => "drag:over:container",
        }
    }
}

impl fmt::Display for DragEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DragEventKind {
    type Err = ResizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drag:over" => Ok(DragEventKind::Over),
            "drag:over:container" => Ok(DragEventKind::OverContainer),
            other => Err(ResizeError::UnknownEvent(other.to_string())),
        }
    }
}

/// One hover tick delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOverEvent {
    pub kind: DragEventKind,
    /// The specific item under the pointer, if any.
    pub over: Option<ElementId>,
    pub over_container: Option<ElementId>,
    pub mirror: Option<ElementId>,
}

impl DragOverEvent {
    pub fn over(over: ElementId, container: ElementId, mirror: ElementId) -> Self {
        Self {
            kind: DragEventKind::Over,
            over: Some(over),
            over_container: Some(container),
            mirror: Some(mirror),
        }
    }

    pub fn over_container(container: ElementId, mirror: ElementId) -> Self {
        Self {
            kind: DragEventKind::OverContainer,
            over: None,
            over_container: Some(container),
            mirror: Some(mirror),
        }
    }

    pub fn container(&self) -> Result<ElementId> {
        self.over_container.ok_or_else(|| {
            ResizeError::InvalidEventKind(format!("{} event without a container", self.kind))
        })
    }

    pub fn mirror(&self) -> Result<ElementId> {
        self.mirror.ok_or_else(|| {
            ResizeError::InvalidEventKind(format!("{} event without a mirror", self.kind))
        })
    }
}
