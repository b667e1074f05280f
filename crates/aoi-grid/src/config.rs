//! Grid bounds and cell geometry.

use aoi_core::{AoiError, AoiResult, Point};

/// Upper bound on `x_cells * y_cells`.  Each cell owns a membership set, so
/// a typo in `cell_size` must not allocate millions of them.
pub const MAX_CELLS: usize = 1 << 24;

// ── GridConfig ────────────────────────────────────────────────────────────────

/// World bounds and cell side of a [`GridIndex`](crate::GridIndex).
///
/// Typically loaded from the host's config file (with the `serde` feature)
/// and passed to `GridIndex::new`, which validates it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,

    /// Side length of one square cell, in world units.  Choose it close to
    /// the typical observation range: smaller cells mean more cells visited
    /// per query, larger ones mean more false positives.
    pub cell_size: f32,
}

impl GridConfig {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32, cell_size: f32) -> Self {
        Self { min_x, max_x, min_y, max_y, cell_size }
    }

    /// Check bounds and cell size.  All failures are `AoiError::Config`.
    pub fn validate(&self) -> AoiResult<()> {
        let fields = [self.min_x, self.max_x, self.min_y, self.max_y, self.cell_size];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(AoiError::Config(format!("grid parameters must be finite: {self:?}")));
        }
        if self.max_x <= self.min_x {
            return Err(AoiError::Config(format!(
                "max_x ({}) must exceed min_x ({})",
                self.max_x, self.min_x
            )));
        }
        if self.max_y <= self.min_y {
            return Err(AoiError::Config(format!(
                "max_y ({}) must exceed min_y ({})",
                self.max_y, self.min_y
            )));
        }
        if self.cell_size <= 0.0 {
            return Err(AoiError::Config(format!("cell_size must be positive, got {}", self.cell_size)));
        }

        let x = Self::cells_along(self.min_x, self.max_x, self.cell_size);
        let y = Self::cells_along(self.min_y, self.max_y, self.cell_size);
        if x * y > MAX_CELLS as f64 {
            return Err(AoiError::Config(format!(
                "grid of {x} x {y} cells exceeds the {MAX_CELLS} cell limit"
            )));
        }
        Ok(())
    }

    /// Cells needed to cover `[min, max]`, computed in f64 so huge extents
    /// do not overflow before the limit check.
    fn cells_along(min: f32, max: f32, cell_size: f32) -> f64 {
        ((f64::from(max) - f64::from(min)) / f64::from(cell_size)).ceil().max(1.0)
    }
}

// ── CellCoord / CellRect ──────────────────────────────────────────────────────

/// Column (`x`) and row (`y`) of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub min: CellCoord,
    pub max: CellCoord,
}

impl CellRect {
    /// Number of cells covered.
    pub fn area(&self) -> usize {
        (self.max.x - self.min.x + 1) * (self.max.y - self.min.y + 1)
    }

    /// Cells in column-major order: `x` outer, `y` inner.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (self.min.x..=self.max.x)
            .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| CellCoord { x, y }))
    }
}

// ── GridLayout ────────────────────────────────────────────────────────────────

/// A validated [`GridConfig`] with its cell counts.  Pure geometry; owns no
/// membership data.
#[derive(Copy, Clone, Debug)]
pub struct GridLayout {
    config:  GridConfig,
    x_cells: usize,
    y_cells: usize,
}

impl GridLayout {
    pub fn new(config: GridConfig) -> AoiResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            x_cells: GridConfig::cells_along(config.min_x, config.max_x, config.cell_size) as usize,
            y_cells: GridConfig::cells_along(config.min_y, config.max_y, config.cell_size) as usize,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// `(x_cells, y_cells)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.x_cells, self.y_cells)
    }

    pub fn cell_count(&self) -> usize {
        self.x_cells * self.y_cells
    }

    /// Clamp a cell index computed from `offset` along an axis of `cells`.
    #[inline]
    fn axis_cell(&self, offset: f32, cells: usize) -> usize {
        // `as usize` saturates; positions and ranges are never NaN here.
        ((offset / self.config.cell_size).floor().max(0.0) as usize).min(cells - 1)
    }

    /// The cell containing `pos`.  Points outside the world land in the
    /// nearest border cell.
    pub fn cell_of(&self, pos: Point) -> CellCoord {
        CellCoord {
            x: self.axis_cell(pos.x - self.config.min_x, self.x_cells),
            y: self.axis_cell(pos.y - self.config.min_y, self.y_cells),
        }
    }

    /// Cells overlapping the square of half-side `range` around `pos`,
    /// clamped to the grid.
    pub fn covering(&self, pos: Point, range: f32) -> CellRect {
        CellRect {
            min: self.cell_of(Point::new(pos.x - range, pos.y - range)),
            max: self.cell_of(Point::new(pos.x + range, pos.y + range)),
        }
    }

    /// Position of `cell` in the flat tower vector, or `None` outside the grid.
    #[inline]
    pub fn slot(&self, cell: CellCoord) -> Option<usize> {
        (cell.x < self.x_cells && cell.y < self.y_cells).then(|| cell.x * self.y_cells + cell.y)
    }
}
