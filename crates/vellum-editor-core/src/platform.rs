//! Platform abstraction traits.
//!
//! These traits define the interface between the editor logic and the
//! host-specific measurement primitives (browser DOM, native UI, tests).

/// Pixel position of a caret inside the edit surface, before scrolling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretPoint {
    pub top: f64,
    pub left: f64,
}

/// Pixel-position lookup for a char offset in the edit surface.
pub trait CaretMetrics {
    /// Position of the caret at `offset` within `content`, relative to the
    /// top-left of the unscrolled edit surface.
    fn caret_position(&self, content: &str, offset: usize) -> CaretPoint;
}

impl<T: CaretMetrics> CaretMetrics for &T {
    fn caret_position(&self, content: &str, offset: usize) -> CaretPoint {
        (*self).caret_position(content, offset)
    }
}

/// Fixed-pitch caret metrics.
///
/// Approximates a monospace edit surface: rows are `line_height` tall,
/// columns `char_width` wide. Good enough for tests and terminal hosts;
/// browser hosts measure the real caret instead.
#[derive(Debug, Clone, Copy)]
pub struct LineHeightMetrics {
    pub line_height: f64,
    pub char_width: f64,
}

impl CaretMetrics for LineHeightMetrics {
    fn caret_position(&self, content: &str, offset: usize) -> CaretPoint {
        let mut row = 0usize;
        let mut col = 0usize;
        for c in content.chars().take(offset) {
            if c == '\n' {
                row += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        CaretPoint {
            top: row as f64 * self.line_height,
            left: col as f64 * self.char_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_height_metrics() {
        let metrics = LineHeightMetrics {
            line_height: 20.0,
            char_width: 8.0,
        };

        let p = metrics.caret_position("hello\nworld", 0);
        assert_eq!(p.top, 0.0);
        assert_eq!(p.left, 0.0);

        let p = metrics.caret_position("hello\nworld", 8);
        assert_eq!(p.top, 20.0);
        assert_eq!(p.left, 16.0);
    }
}
