use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::error::ResizeError;
use crate::frame::{FrameQueue, FrameScheduler};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, ResizeMetrics};
use crate::tree::RenderTree;

use super::{
    ClassRole, DragContext, DragEventKind, DragHost, DragListener, DragOverEvent, DragPlugin,
    DraggableOptions, same_listener,
};

const HOST_TARGET: &str = "mirror_resize::host";

/// Configuration knobs for the controller.
#[derive(Clone)]
pub struct ControllerConfig {
    /// Optional structured logger shared with listeners.
    pub logger: Option<Logger>,
    /// Counters shared with listeners and frame work.
    pub metrics: Option<Arc<Mutex<ResizeMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_target: "mirror_resize::metrics".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(ResizeMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<ResizeMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// In-memory drag host: owns the element tree, a frame queue, the
/// listener table and attached plugins.
///
/// Listener and frame failures land on the controller's error channel
/// ([`DragController::take_errors`]) and in the log; they never stop the
/// remaining listeners or callbacks.
pub struct DragController {
    tree: RenderTree,
    frames: FrameQueue,
    options: DraggableOptions,
    listeners: BTreeMap<DragEventKind, Vec<DragListener>>,
    plugins: Vec<Box<dyn DragPlugin>>,
    config: ControllerConfig,
    errors: Vec<ResizeError>,
}

impl DragController {
    pub fn new(tree: RenderTree, options: DraggableOptions) -> Self {
        Self {
            tree,
            frames: FrameQueue::new(),
            options,
            listeners: BTreeMap::new(),
            plugins: Vec::new(),
            config: ControllerConfig::default(),
            errors: Vec::new(),
        }
    }

    pub fn config_mut(&mut self) -> &mut ControllerConfig {
        &mut self.config
    }

    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut RenderTree {
        &mut self.tree
    }

    pub fn options_mut(&mut self) -> &mut DraggableOptions {
        &mut self.options
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.pending()
    }

    pub fn listener_count(&self, kind: DragEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_string()).collect()
    }

    /// Attach `plugin` and keep it until [`DragController::remove_plugin`].
    pub fn add_plugin<P>(&mut self, plugin: P)
    where
        P: DragPlugin + 'static,
    {
        let mut plugin: Box<dyn DragPlugin> = Box::new(plugin);
        plugin.attach(self);
        self.log_host_event(
            LogLevel::Debug,
            "plugin_attached",
            [json_kv("plugin", json!(plugin.name()))],
        );
        self.plugins.push(plugin);
    }

    /// Detach and drop every plugin named `name`. Returns whether any matched.
    pub fn remove_plugin(&mut self, name: &str) -> bool {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.plugins)
            .into_iter()
            .partition(|p| p.name() == name);
        self.plugins = kept;

        let found = !removed.is_empty();
        for mut plugin in removed {
            plugin.detach(self);
            self.log_host_event(
                LogLevel::Debug,
                "plugin_detached",
                [json_kv("plugin", json!(plugin.name()))],
            );
        }
        found
    }

    /// Deliver one hover tick to every listener on its channel.
    pub fn emit(&mut self, event: &DragOverEvent) {
        let listeners = self.listeners.get(&event.kind).cloned().unwrap_or_default();
        let mut failures = Vec::new();

        for listener in &listeners {
            let mut ctx = DragContext::new(&mut self.tree, &mut self.frames, &self.options)
                .with_logger(self.config.logger.as_ref())
                .with_metrics(self.config.metrics.as_ref());
            if let Err(err) = listener(&mut ctx, event) {
                failures.push(err);
            }
        }

        self.log_host_event(
            LogLevel::Trace,
            "event_dispatched",
            [
                json_kv("event", json!(event.kind.as_str())),
                json_kv("listeners", json!(listeners.len())),
                json_kv("failures", json!(failures.len())),
            ],
        );
        self.report_errors("listener_failed", failures);
    }

    /// Run one render frame. Returns how many callbacks ran.
    pub fn run_frame(&mut self) -> usize {
        let report = self.frames.run_frame(&mut self.tree);
        let dirty = self.tree.take_dirty();

        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_frame();
            }
        }
        if !dirty.is_empty() {
            self.log_host_event(
                LogLevel::Debug,
                "frame_committed",
                [
                    json_kv("frame", json!(self.frames.frame_count())),
                    json_kv("callbacks", json!(report.ran)),
                    json_kv("dirty_elements", json!(dirty.len())),
                ],
            );
        }
        self.report_errors("frame_callback_failed", report.errors);
        report.ran
    }

    /// Run frames until nothing is pending or `max_frames` ran.
    pub fn run_until_idle(&mut self, max_frames: usize) -> usize {
        let mut ran = 0;
        while ran < max_frames && self.frames.pending() > 0 {
            self.run_frame();
            ran += 1;
        }
        ran
    }

    pub fn errors(&self) -> &[ResizeError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ResizeError> {
        std::mem::take(&mut self.errors)
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        metrics.lock().ok().map(|guard| guard.snapshot())
    }

    /// Log the current metrics snapshot, if metrics and a logger are set.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) =
            (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }

    fn report_errors(&mut self, message: &str, errors: Vec<ResizeError>) {
        if errors.is_empty() {
            return;
        }
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_errors(errors.len());
            }
        }
        for err in errors {
            self.log_host_event(
                LogLevel::Warn,
                message,
                [json_kv("error", json!(err.to_string()))],
            );
            self.errors.push(err);
        }
    }

    fn log_host_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref().filter(|l| l.enabled(level)) {
            let event = event_with_fields(level, HOST_TARGET, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

impl DragHost for DragController {
    fn on(&mut self, kind: DragEventKind, listener: DragListener) {
        let entry = self.listeners.entry(kind).or_default();
        if !entry.iter().any(|l| same_listener(l, &listener)) {
            entry.push(listener);
        }
    }

    fn off(&mut self, kind: DragEventKind, listener: &DragListener) {
        if let Some(entry) = self.listeners.get_mut(&kind) {
            entry.retain(|l| !same_listener(l, listener));
        }
    }

    fn class_name_for(&self, role: ClassRole) -> &str {
        self.options.class_name_for(role)
    }

    fn options(&self) -> &DraggableOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_listener(count: &Rc<Cell<u32>>) -> DragListener {
        let count = Rc::clone(count);
        Rc::new(move |_ctx, _event| {
            count.set(count.get() + 1);
            Ok(())
        })
    }

    fn fixture() -> (DragController, DragOverEvent) {
        let mut tree = RenderTree::new();
        let container = tree.create_element("ul");
        let mirror = tree.create_element("div");
        let root = tree.root();
        tree.append_child(root, container).unwrap();
        let controller = DragController::new(tree, DraggableOptions::default());
        (controller, DragOverEvent::over_container(container, mirror))
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let (mut controller, event) = fixture();
        let count = Rc::new(Cell::new(0));
        let listener = counting_listener(&count);

        controller.on(DragEventKind::OverContainer, Rc::clone(&listener));
        controller.on(DragEventKind::OverContainer, Rc::clone(&listener));
        controller.emit(&event);

        assert_eq!(controller.listener_count(DragEventKind::OverContainer), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn off_removes_only_that_listener() {
        let (mut controller, event) = fixture();
        let count = Rc::new(Cell::new(0));
        let first = counting_listener(&count);
        let second = counting_listener(&count);

        controller.on(DragEventKind::OverContainer, Rc::clone(&first));
        controller.on(DragEventKind::OverContainer, Rc::clone(&second));
        controller.off(DragEventKind::OverContainer, &first);
        controller.off(DragEventKind::Over, &second);
        controller.emit(&event);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_errors_reach_error_channel() {
        let (mut controller, event) = fixture();
        let sink = MemorySink::new();
        controller.config_mut().logger = Some(Logger::new(sink.clone()));
        controller.config_mut().enable_metrics();

        let count = Rc::new(Cell::new(0));
        let failing: DragListener = Rc::new(|_ctx, event| {
            Err(ResizeError::InvalidEventKind(format!("{} rejected", event.kind)))
        });
        controller.on(DragEventKind::OverContainer, failing);
        controller.on(DragEventKind::OverContainer, counting_listener(&count));
        controller.emit(&event);

        assert_eq!(count.get(), 1);
        let errors = controller.take_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ResizeError::InvalidEventKind(_)));
        assert!(sink.messages().contains(&"listener_failed".to_string()));
        assert_eq!(controller.metrics_snapshot().unwrap().host_errors, 1);
    }

    #[test]
    fn run_until_idle_stops_when_queue_drains() {
        let (mut controller, _event) = fixture();
        assert_eq!(controller.run_until_idle(10), 0);

        controller.frames.request_frame(Box::new(|ctx| {
            ctx.frames.request_frame(Box::new(|_ctx| Ok(())));
            Ok(())
        }));
        assert_eq!(controller.run_until_idle(10), 2);
        assert_eq!(controller.pending_frames(), 0);
    }
}
