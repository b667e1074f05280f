//! World-space point type.
//!
//! `Point` uses `f32` coordinates.  Vicinity is always the axis-aligned square
//! `|dx| <= r && |dy| <= r`; there is no Euclidean distance test anywhere in
//! the indexes.

/// A position in the 2D world.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `true` if both coordinates are finite (no NaN, no infinity).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rectangular vicinity check: each axis is bounded independently by
    /// `half_extent`, so the covered area is a square centred on `center`.
    #[inline]
    pub fn within_square(self, center: Point, half_extent: f32) -> bool {
        (self.x - center.x).abs() <= half_extent && (self.y - center.y).abs() <= half_extent
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
