//! Axis-aligned bounding boxes
//!
//! Everything in the game is a screen-aligned rectangle, so a separating-axis
//! test on x and y is all the collision detection we need.

use serde::{Deserialize, Serialize};

/// Screen-space rectangle edges (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Rectangle from its top-left corner and size
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            right: x + width,
            top: y,
            bottom: y + height,
        }
    }

    /// Square centered on (cx, cy)
    pub fn centered_square(cx: f32, cy: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            left: cx - half,
            right: cx + half,
            top: cy - half,
            bottom: cy + half,
        }
    }

    /// Strict horizontal overlap (touching edges don't count)
    #[inline]
    pub fn overlaps_x(&self, other: &Bounds) -> bool {
        self.right > other.left && self.left < other.right
    }
}

/// True unless one box lies entirely left, right, above or below the other.
///
/// Touching edges count as overlapping.
#[inline]
pub fn overlaps(a: &Bounds, b: &Bounds) -> bool {
    !(a.right < b.left || a.left > b.right || a.bottom < b.top || a.top > b.bottom)
}
