//! Keeps the drag mirror the same size as whatever it hovers.
//!
//! On every drag-over tick the plugin picks a target element (the hovered
//! item, or the first real draggable item in the hovered container), moves
//! the mirror into that container, and once rendering has settled copies
//! the target's border box onto the mirror's inline `width`/`height`.
//!
//! The placeholder left at the drag origin is never a target, even when it
//! is the element reported as hovered.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::Result;
use crate::frame::{FrameStrategy, after_render_settles};
use crate::geometry::Size;
use crate::host::{
    ClassRole, DragContext, DragEventKind, DragHost, DragListener, DragOverEvent, DragPlugin,
};
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::ResizeMetrics;
use crate::tree::{ElementId, RenderTree, Selector};

pub const RESIZE_MIRROR_PLUGIN: &str = "resize_mirror";
const PLUGIN_TARGET: &str = "mirror_resize::plugin";

/// Options read from the host's `resizeMirror` table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    /// Frames to wait between reparenting and measuring.
    pub frames: FrameStrategy,
    /// Keys this plugin does not interpret, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResizeOptions {
    /// Plugin defaults overlaid with host `overrides`; host values win.
    pub fn merged(overrides: Option<&Map<String, Value>>) -> Result<Self> {
        let mut table = match serde_json::to_value(Self::default())? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Some(overrides) = overrides {
            for (key, value) in overrides {
                table.insert(key.clone(), value.clone());
            }
        }
        Ok(serde_json::from_value(Value::Object(table))?)
    }
}

/// Which element, if any, the mirror should take its size from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetResolution {
    /// The hovered item itself.
    Over(ElementId),
    /// First draggable item in the hovered container.
    Fallback(ElementId),
    /// Nothing to measure; the mirror keeps its current size.
    None,
}

impl TargetResolution {
    pub fn element(self) -> Option<ElementId> {
        match self {
            TargetResolution::Over(id) | TargetResolution::Fallback(id) => Some(id),
            TargetResolution::None => None,
        }
    }
}

/// Resolve the element whose box the mirror should adopt.
///
/// `marker` is the class carried by the drag-origin placeholder.
pub fn resolve_target(
    tree: &RenderTree,
    event: &DragOverEvent,
    draggable: &Selector,
    marker: &str,
) -> Result<TargetResolution> {
    let container = event.container()?;

    if let Some(over) = event.over {
        if !tree.has_class(over, marker)? {
            return Ok(TargetResolution::Over(over));
        }
    }

    Ok(tree
        .query_selector_excluding(container, draggable, marker)?
        .map_or(TargetResolution::None, TargetResolution::Fallback))
}

/// Copy `target`'s border box onto the mirror's inline size. Returns `None`
/// without writing when the target has left the document, so the mirror
/// never collapses to an empty box.
pub fn measure_and_apply(
    tree: &mut RenderTree,
    mirror: ElementId,
    target: ElementId,
) -> Result<Option<Size>> {
    if !tree.is_connected(target) {
        return Ok(None);
    }
    let size = tree.bounding_client_rect(target)?.size();
    tree.set_style_px(mirror, "width", size.width)?;
    tree.set_style_px(mirror, "height", size.height)?;
    Ok(Some(size))
}

/// Plugin that resizes the mirror to the draggable it hovers.
pub struct MirrorResizer {
    options: Rc<ResizeOptions>,
    on_drag_over: DragListener,
    attached: bool,
}

impl MirrorResizer {
    pub fn new(host: &dyn DragHost) -> Result<Self> {
        let options = Rc::new(ResizeOptions::merged(host.options().resize_mirror.as_ref())?);
        let handler_options = Rc::clone(&options);
        let listener: DragListener =
            Rc::new(move |ctx, event| on_drag_over(&handler_options, ctx, event));

        Ok(Self {
            options,
            on_drag_over: listener,
            attached: false,
        })
    }

    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl DragPlugin for MirrorResizer {
    fn name(&self) -> &str {
        RESIZE_MIRROR_PLUGIN
    }

    fn attach(&mut self, host: &mut dyn DragHost) {
        if self.attached {
            return;
        }
        for kind in DragEventKind::ALL {
            host.on(kind, Rc::clone(&self.on_drag_over));
        }
        self.attached = true;
    }

    fn detach(&mut self, host: &mut dyn DragHost) {
        for kind in DragEventKind::ALL {
            host.off(kind, &self.on_drag_over);
        }
        self.attached = false;
    }
}

fn on_drag_over(
    options: &ResizeOptions,
    ctx: &mut DragContext<'_>,
    event: &DragOverEvent,
) -> Result<()> {
    ctx.record_metric(ResizeMetrics::record_hover);

    let marker = ctx.class_name_for(ClassRole::SourceOriginal).to_string();
    let draggable = Selector::parse(&ctx.options().draggable)?;
    let resolution = resolve_target(ctx.tree(), event, &draggable, &marker)?;

    let Some(target) = resolution.element() else {
        ctx.record_metric(ResizeMetrics::record_miss);
        ctx.log(
            LogLevel::Trace,
            PLUGIN_TARGET,
            "no_target",
            [json_kv("event", json!(event.kind.as_str()))],
        );
        return Ok(());
    };

    let container = event.container()?;
    let mirror = event.mirror()?;
    ctx.tree_mut().append_child(container, mirror)?;

    let fallback = matches!(resolution, TargetResolution::Fallback(_));
    ctx.record_metric(ResizeMetrics::record_scheduled);
    ctx.log(
        LogLevel::Debug,
        PLUGIN_TARGET,
        "resize_scheduled",
        [
            json_kv("target", json!(target.to_string())),
            json_kv("container", json!(container.to_string())),
            json_kv("fallback", json!(fallback)),
        ],
    );

    let metrics = ctx.metrics_handle();
    let logger = ctx.logger().cloned();
    after_render_settles(
        ctx.frames(),
        options.frames,
        Box::new(move |frame| {
            let Some(size) = measure_and_apply(frame.tree, mirror, target)? else {
                return Ok(());
            };
            if let Some(metrics) = metrics.as_ref() {
                if let Ok(mut guard) = metrics.lock() {
                    guard.record_applied();
                }
            }
            if let Some(logger) = logger.as_ref().filter(|l| l.enabled(LogLevel::Debug)) {
                let _ = logger.log_event(event_with_fields(
                    LogLevel::Debug,
                    PLUGIN_TARGET,
                    "mirror_resized",
                    [
                        json_kv("mirror", json!(mirror.to_string())),
                        json_kv("width", json!(size.width)),
                        json_kv("height", json!(size.height)),
                    ],
                ));
            }
            Ok(())
        }),
    );
    Ok(())
}
