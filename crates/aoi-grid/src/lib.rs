//! `aoi-grid` — uniform tower-grid interest index.
//!
//! # How it works
//!
//! ```text
//!  bounds (0,10)×(0,10), cell_size 2  →  5×5 cells
//!
//!  y  4 | . . . # #      query (9,9) r=3 covers x∈[6,12], y∈[6,12]
//!     3 | . . . # #      → cells (3..=4, 3..=4) after clamping
//!     2 | . . . . .
//!     1 | . . . . .
//!     0 | . . . . .
//!       +----------- x
//!         0 1 2 3 4
//! ```
//!
//! The world rectangle is cut into square cells.  Each Registered node is a
//! member of exactly one cell, the one containing its position; positions
//! outside the world are clamped into the nearest border cell.  A neighbor
//! query unions the members of every cell overlapping the query square.
//!
//! # Crate layout
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`config`] | `GridConfig`, `GridLayout`, `CellCoord`, `CellRect`  |
//! | [`grid`]   | `GridIndex`                                          |

pub mod config;
pub mod grid;


pub use config::{CellCoord, CellRect, GridConfig, GridLayout, MAX_CELLS};
pub use grid::GridIndex;
