/// Rendered size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Border box of an element as reported by a bounding client rect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Format a length as a CSS pixel value.
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Read back a value written by [`px`]. Other units yield `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_drops_trailing_zero_fraction() {
        assert_eq!(px(200.0), "200px");
        assert_eq!(px(50.5), "50.5px");
    }

    #[test]
    fn parse_px_rejects_other_units() {
        assert_eq!(parse_px("120px"), Some(120.0));
        assert_eq!(parse_px(" 7.25px "), Some(7.25));
        assert_eq!(parse_px("3em"), None);
        assert_eq!(parse_px("auto"), None);
    }

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(rect.right(), 210.0);
        assert_eq!(rect.bottom(), 120.0);
        assert_eq!(rect.size(), Size::new(200.0, 100.0));
        assert!(!rect.is_empty());
        assert!(Rect::default().is_empty());
    }
}
