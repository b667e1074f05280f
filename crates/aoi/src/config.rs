//! Runtime choice of index.

use aoi_grid::GridConfig;

/// Which index implementation to build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IndexKind {
    CrossList,
    Grid,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IndexKind::CrossList => "cross_list",
            IndexKind::Grid => "grid",
        })
    }
}

/// Construction parameters for [`create_index`](crate::create_index).
///
/// With the `serde` feature this is internally tagged, e.g.
///
/// ```text
/// { "kind": "cross_list" }
/// { "kind": "grid", "min_x": 0, "max_x": 1000, "min_y": 0, "max_y": 1000, "cell_size": 50 }
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum IndexConfig {
    CrossList,
    Grid(GridConfig),
}

impl IndexConfig {
    pub fn kind(&self) -> IndexKind {
        match self {
            IndexConfig::CrossList => IndexKind::CrossList,
            IndexConfig::Grid(_) => IndexKind::Grid,
        }
    }
}
