//! The narrow surface a drag plugin sees of its host.
//!
//! Plugins never depend on a concrete controller. They get [`DragHost`] to
//! subscribe and resolve configuration, and a [`DragContext`] per delivered
//! event to touch the tree and schedule frame work.

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::Result;
use crate::frame::FrameScheduler;
use crate::logging::{LogLevel, Logger, event_with_fields};
use crate::metrics::ResizeMetrics;
use crate::tree::RenderTree;

pub mod controller;
pub mod events;
pub mod options;

pub use controller::{ControllerConfig, DragController};
pub use events::{DragEventKind, DragOverEvent};
pub use options::{ClassRole, DEFAULT_DRAGGABLE_SELECTOR, DraggableOptions};

/// A drag-over handler. The same value is handed to [`DragHost::on`] and
/// [`DragHost::off`]; hosts compare listeners by allocation.
pub type DragListener = Rc<dyn Fn(&mut DragContext<'_>, &DragOverEvent) -> Result<()>>;

pub fn same_listener(a: &DragListener, b: &DragListener) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Capabilities a plugin may use while attaching and detaching.
pub trait DragHost {
    /// Register `listener` on `kind`. Registering the same listener twice
    /// for one kind has no further effect.
    fn on(&mut self, kind: DragEventKind, listener: DragListener);

    /// Unregister `listener`. Unknown listeners are ignored.
    fn off(&mut self, kind: DragEventKind, listener: &DragListener);

    fn class_name_for(&self, role: ClassRole) -> &str;

    fn options(&self) -> &DraggableOptions;
}

/// Behaviour attached to a drag host.
pub trait DragPlugin {
    fn name(&self) -> &str {
        "drag_plugin"
    }

    fn attach(&mut self, host: &mut dyn DragHost);

    fn detach(&mut self, host: &mut dyn DragHost);
}

/// Handed to listeners for the duration of one event.
pub struct DragContext<'a> {
    tree: &'a mut RenderTree,
    frames: &'a mut dyn FrameScheduler,
    options: &'a DraggableOptions,
    logger: Option<&'a Logger>,
    metrics: Option<&'a Arc<Mutex<ResizeMetrics>>>,
}

impl<'a> DragContext<'a> {
    pub fn new(
        tree: &'a mut RenderTree,
        frames: &'a mut dyn FrameScheduler,
        options: &'a DraggableOptions,
    ) -> Self {
        Self {
            tree,
            frames,
            options,
            logger: None,
            metrics: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<&'a Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_metrics(mut self, metrics: Option<&'a Arc<Mutex<ResizeMetrics>>>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn tree(&self) -> &RenderTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut RenderTree {
        &mut *self.tree
    }

    pub fn frames(&mut self) -> &mut dyn FrameScheduler {
        &mut *self.frames
    }

    pub fn options(&self) -> &DraggableOptions {
        self.options
    }

    pub fn class_name_for(&self, role: ClassRole) -> &str {
        self.options.class_name_for(role)
    }

    pub fn logger(&self) -> Option<&Logger> {
        self.logger
    }

    pub fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.logger.filter(|l| l.enabled(level)) {
            let _ = logger.log_event(event_with_fields(level, target, message, fields));
        }
    }

    pub fn record_metric(&self, record: impl FnOnce(&mut ResizeMetrics)) {
        if let Some(metrics) = self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut *guard);
            }
        }
    }

    /// Shared metrics handle, for work that outlives this event.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ResizeMetrics>>> {
        self.metrics.map(Arc::clone)
    }
}
