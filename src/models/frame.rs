use serde::{Deserialize, Serialize};

/// Bounding rectangle of a recognized text element, in image pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    /// Create a new frame from its top-left corner and size
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge (top + height)
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical center line
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Vertical gap between this frame's bottom edge and the top of `below`.
    /// Negative when the two frames overlap vertically.
    pub fn gap_above(&self, below: &Frame) -> f64 {
        below.top - self.bottom()
    }
}
