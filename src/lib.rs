//! Mirror resizing for drag-and-drop hosts.
//!
//! While an element is dragged, the host shows a floating "mirror" that
//! follows the pointer. [`MirrorResizer`] listens to the host's drag-over
//! channels and keeps that mirror the same size as the draggable item under
//! the pointer, measuring only after the renderer has settled.
//!
//! The crate ships an in-memory host ([`DragController`]) built on a small
//! element tree ([`RenderTree`]) and a deterministic frame queue
//! ([`FrameQueue`]), so plugins run the same way under tests as under a
//! real renderer that implements [`DragHost`] and [`FrameScheduler`].

pub mod error;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod plugins;
pub mod tree;

pub use error::{ResizeError, Result};
pub use frame::{
    FrameCallback, FrameContext, FrameQueue, FrameReport, FrameScheduler, FrameStrategy,
    after_render_settles,
};
pub use geometry::{Rect, Size, parse_px, px};
pub use host::{
    ClassRole, ControllerConfig, DragContext, DragController, DragEventKind, DragHost,
    DragListener, DragOverEvent, DragPlugin, DraggableOptions,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, ResizeMetrics};
pub use plugins::{
    DragLoggerPlugin, MirrorResizer, ResizeOptions, TargetResolution, resolve_target,
};
pub use tree::{Element, ElementId, RenderTree, Selector, StyleDeclaration};
