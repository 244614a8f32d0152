use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;

pub const DEFAULT_DRAGGABLE_SELECTOR: &str = ".draggable-source";

/// Semantic roles the host marks elements with during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassRole {
    /// The placeholder left where the drag started.
    SourceOriginal,
    SourceDragging,
    SourcePlaced,
    Mirror,
    ContainerDragging,
    ContainerOver,
    ContainerPlaced,
    DraggableOver,
    BodyDragging,
}

impl ClassRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            ClassRole::SourceOriginal => "source:original",
            ClassRole::SourceDragging => "source:dragging",
            ClassRole::SourcePlaced => "source:placed",
            ClassRole::Mirror => "mirror",
            ClassRole::ContainerDragging => "container:dragging",
            ClassRole::ContainerOver => "container:over",
            ClassRole::ContainerPlaced => "container:placed",
            ClassRole::DraggableOver => "draggable:over",
            ClassRole::BodyDragging => "body:dragging",
        }
    }

    pub const fn default_class(self) -> &'static str {
        match self {
            ClassRole::SourceOriginal => "draggable--original",
            ClassRole::SourceDragging => "draggable-source--is-dragging",
            ClassRole::SourcePlaced => "draggable-source--placed",
            ClassRole::Mirror => "draggable-mirror",
            ClassRole::ContainerDragging => "draggable-container--is-dragging",
            ClassRole::ContainerOver => "draggable-container--over",
            ClassRole::ContainerPlaced => "draggable-container--placed",
            ClassRole::DraggableOver => "draggable--over",
            ClassRole::BodyDragging => "draggable--is-dragging",
        }
    }
}

impl fmt::Display for ClassRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host configuration visible to plugins.
///
/// Field names follow the host's JSON configuration, so
/// `{"draggable": "li", "resizeMirror": {...}}` deserializes directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraggableOptions {
    /// Selector for what counts as a draggable item inside a container.
    pub draggable: String,
    /// Overrides for the role → class-name table.
    pub classes: BTreeMap<String, String>,
    /// Overrides for the mirror resize plugin.
    pub resize_mirror: Option<Map<String, Value>>,
}

impl Default for DraggableOptions {
    fn default() -> Self {
        Self {
            draggable: DEFAULT_DRAGGABLE_SELECTOR.to_string(),
            classes: BTreeMap::new(),
            resize_mirror: None,
        }
    }
}

impl DraggableOptions {
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_draggable(mut self, selector: impl Into<String>) -> Self {
        self.draggable = selector.into();
        self
    }

    pub fn with_class(mut self, role: ClassRole, class: impl Into<String>) -> Self {
        self.classes.insert(role.as_str().to_string(), class.into());
        self
    }

    pub fn with_resize_mirror(mut self, overrides: Map<String, Value>) -> Self {
        self.resize_mirror = Some(overrides);
        self
    }

    pub fn class_name_for(&self, role: ClassRole) -> &str {
        self.classes
            .get(role.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| role.default_class())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn class_overrides_win_over_defaults() {
        let options = DraggableOptions::default().with_class(ClassRole::SourceOriginal, "ghost");
        assert_eq!(options.class_name_for(ClassRole::SourceOriginal), "ghost");
        assert_eq!(options.class_name_for(ClassRole::Mirror), "draggable-mirror");
    }

    #[test]
    fn parses_host_json() {
        let options = DraggableOptions::from_json_str(
            r#"{
                "draggable": "li.card",
                "classes": {"source:original": "is-origin"},
                "resizeMirror": {"frames": "single", "future": true}
            }"#,
        )
        .unwrap();

        assert_eq!(options.draggable, "li.card");
        assert_eq!(options.class_name_for(ClassRole::SourceOriginal), "is-origin");
        let overrides = options.resize_mirror.unwrap();
        assert_eq!(overrides.get("future"), Some(&json!(true)));
    }

    #[test]
    fn empty_json_uses_defaults() {
        let options = DraggableOptions::from_json_str("{}").unwrap();
        assert_eq!(options, DraggableOptions::default());
    }
}
