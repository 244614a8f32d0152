use crate::geometry::{Size, parse_px};

/// Inline style of an element, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclaration {
    entries: Vec<(String, String)>,
}

impl StyleDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` when the stored value changed.
    pub fn set(&mut self, property: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == property) {
            Some((_, existing)) if *existing == value => false,
            Some((_, existing)) => {
                *existing = value;
                true
            }
            None => {
                self.entries.push((property.to_string(), value));
                true
            }
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn width_px(&self) -> Option<f64> {
        self.get("width").and_then(parse_px)
    }

    pub fn height_px(&self) -> Option<f64> {
        self.get("height").and_then(parse_px)
    }

    /// Explicit pixel size, when both dimensions are set in pixels.
    pub fn size_px(&self) -> Option<Size> {
        Some(Size::new(self.width_px()?, self.height_px()?))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialized as an inline `style` attribute would be.
    pub fn css_text(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
