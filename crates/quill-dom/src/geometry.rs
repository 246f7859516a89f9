//! Geometry APIs
//!
//! DOMRect and the visibility test used for layout-dependent lookups.

/// DOMRect - rectangle geometry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    /// Create empty rect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with dimensions
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Non-zero rendered width and height
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_area() {
        assert!(!DOMRect::new().has_area());
        assert!(!DOMRect::from_xywh(10.0, 10.0, 300.0, 0.0).has_area());
        assert!(DOMRect::from_xywh(0.0, 0.0, 1.0, 1.0).has_area());
    }
}
