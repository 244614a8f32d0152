//! Plugins attachable to a drag host.

pub mod diagnostics;
pub mod resize_mirror;

pub use diagnostics::DragLoggerPlugin;
pub use resize_mirror::{
    MirrorResizer, RESIZE_MIRROR_PLUGIN, ResizeOptions, TargetResolution, measure_and_apply,
    resolve_target,
};
