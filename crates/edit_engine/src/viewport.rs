//! Scroll requests for the host view

use serde::{Deserialize, Serialize};

/// Screen coordinates of a document position, in host pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub top: f64,
    pub left: f64,
}

/// A view able to map positions to coordinates and scroll
pub trait ViewportHost {
    /// Coordinates of the given document position
    fn coords_at_pos(&self, pos: usize) -> Option<Coords>;

    /// Height of the visible area
    fn viewport_height(&self) -> f64;

    /// Scroll so that `top` is the first visible offset
    fn scroll_to(&mut self, top: f64);
}

/// Ask the host to bring a position into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRequest {
    pub pos: usize,
}

impl ScrollRequest {
    pub fn new(pos: usize) -> Self {
        Self { pos }
    }

    /// Scroll `host` so the position sits in the middle of the viewport.
    ///
    /// Returns the offset scrolled to, or None when the host cannot place
    /// the position.
    pub fn apply_to<H: ViewportHost + ?Sized>(&self, host: &mut H) -> Option<f64> {
        let coords = host.coords_at_pos(self.pos)?;
        let top = coords.top - host.viewport_height() / 2.0;
        host.scroll_to(top);
        Some(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lays out every position on its own 20px line
    struct FixedLines {
        height: f64,
        scrolled: Option<f64>,
    }

    impl ViewportHost for FixedLines {
        fn coords_at_pos(&self, pos: usize) -> Option<Coords> {
            (pos < 1000).then(|| Coords {
                top: pos as f64 * 20.0,
                left: 0.0,
            })
        }

        fn viewport_height(&self) -> f64 {
            self.height
        }

        fn scroll_to(&mut self, top: f64) {
            self.scrolled = Some(top);
        }
    }

    #[test]
    fn test_centers_position() {
        let mut host = FixedLines {
            height: 400.0,
            scrolled: None,
        };
        assert_eq!(ScrollRequest::new(30).apply_to(&mut host), Some(400.0));
        assert_eq!(host.scrolled, Some(400.0));
    }

    #[test]
    fn test_unknown_position_does_not_scroll() {
        let mut host = FixedLines {
            height: 400.0,
            scrolled: None,
        };
        assert_eq!(ScrollRequest::new(5000).apply_to(&mut host), None);
        assert_eq!(host.scrolled, None);
    }
}
