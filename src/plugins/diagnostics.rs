use std::rc::Rc;

use serde_json::json;

use crate::host::{DragEventKind, DragHost, DragListener, DragPlugin};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::tree::ElementId;

const DIAGNOSTICS_TARGET: &str = "mirror_resize::diagnostics";

/// Logs drag-over ticks for observability/debugging.
pub struct DragLoggerPlugin {
    logger: Logger,
    level: LogLevel,
    log_container_ticks: bool,
    listener: Option<DragListener>,
}

impl DragLoggerPlugin {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            log_container_ticks: false,
            listener: None,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Also log ticks that hover a container without a specific item.
    pub fn log_container_ticks(mut self, enabled: bool) -> Self {
        self.log_container_ticks = enabled;
        self
    }

    fn build_listener(&self) -> DragListener {
        let logger = self.logger.clone();
        let level = self.level;
        let log_container_ticks = self.log_container_ticks;
        Rc::new(move |_ctx, event| {
            if event.over.is_none() && !log_container_ticks {
                return Ok(());
            }
            let record = event_with_fields(
                level,
                DIAGNOSTICS_TARGET,
                "event.drag_over",
                [
                    json_kv("event", json!(event.kind.as_str())),
                    json_kv("over", json!(describe(event.over))),
                    json_kv("container", json!(describe(event.over_container))),
                    json_kv("mirror", json!(describe(event.mirror))),
                ],
            );
            let _ = logger.log_event(record);
            Ok(())
        })
    }
}

fn describe(id: Option<ElementId>) -> Option<String> {
    id.map(|id| id.to_string())
}

impl DragPlugin for DragLoggerPlugin {
    fn name(&self) -> &str {
        "diagnostics.drag_logger"
    }

    fn attach(&mut self, host: &mut dyn DragHost) {
        if self.listener.is_none() {
            self.listener = Some(self.build_listener());
        }
        if let Some(listener) = self.listener.as_ref() {
            for kind in DragEventKind::ALL {
                host.on(kind, Rc::clone(listener));
            }
        }
    }

    fn detach(&mut self, host: &mut dyn DragHost) {
        if let Some(listener) = self.listener.as_ref() {
            for kind in DragEventKind::ALL {
                host.off(kind, listener);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DragController, DragOverEvent, DraggableOptions};
    use crate::logging::MemorySink;
    use crate::tree::RenderTree;

    #[test]
    fn logs_item_ticks_and_skips_container_ticks_by_default() {
        let mut tree = RenderTree::new();
        let container = tree.create_element("ul");
        let item = tree.create_element("li");
        let mirror = tree.create_element("div");
        tree.append_child(container, item).unwrap();
        let mut controller = DragController::new(tree, DraggableOptions::default());

        let sink = MemorySink::new();
        controller.add_plugin(DragLoggerPlugin::new(Logger::new(sink.clone())));

        controller.emit(&DragOverEvent::over_container(container, mirror));
        assert!(sink.events().is_empty());

        controller.emit(&DragOverEvent::over(item, container, mirror));
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, DIAGNOSTICS_TARGET);
        assert_eq!(events[0].field("event"), Some(&json!("drag:over")));
        assert_eq!(events[0].field("over"), Some(&json!(item.to_string())));
    }

    #[test]
    fn container_ticks_can_be_enabled() {
        let mut tree = RenderTree::new();
        let container = tree.create_element("ul");
        let mirror = tree.create_element("div");
        let mut controller = DragController::new(tree, DraggableOptions::default());

        let sink = MemorySink::new();
        controller.add_plugin(
            DragLoggerPlugin::new(Logger::new(sink.clone()))
                .with_level(LogLevel::Info)
                .log_container_ticks(true),
        );
        controller.emit(&DragOverEvent::over_container(container, mirror));
        assert_eq!(sink.events().len(), 1);

        assert!(controller.remove_plugin("diagnostics.drag_logger"));
        controller.emit(&DragOverEvent::over_container(container, mirror));
        assert_eq!(sink.events().len(), 1);
    }
}
