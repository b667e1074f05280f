//! `aoi` — area-of-interest management for 2D worlds.
//!
//! Tracks which nodes are within observation range of each other and tells
//! each node's listener when others enter, move within, or leave its area of
//! interest.  Two interchangeable indexes implement the same
//! [`InterestIndex`] contract:
//!
//! | Index            | Best for                                | Config        |
//! |------------------|-----------------------------------------|---------------|
//! | `CrossListIndex` | sparse or unbounded worlds              | none          |
//! | `GridIndex`      | bounded worlds with uniform density     | `GridConfig`  |
//!
//! # Per-operation flow
//!
//! ```text
//! enter / leave / move_to(node)
//!   ① Lock     — take the index's write lock.
//!   ② Mutate   — link / unlink / reposition the node.
//!   ③ Diff     — compute neighbor sets and plan every callback.
//!   ④ Unlock   — release the lock.
//!   ⑤ Dispatch — run the callbacks on the calling thread; the first
//!                listener error is returned.
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `serde`   | `Serialize`/`Deserialize` for configs, points and handles. |
//! | `fx-hash` | FxHash-backed `NeighborSet`.                               |
//!
//! # Quick-start
//!
//! ```rust
//! use std::sync::Arc;
//! use aoi::{create_index, GridConfig, IndexConfig, InterestIndex, NodeSpec, NoopListener};
//!
//! let index = create_index(IndexConfig::Grid(GridConfig::new(0.0, 100.0, 0.0, 100.0, 10.0)))?;
//! let a = index.register(NodeSpec::new(10.0, 10.0, 15.0).listener(Arc::new(NoopListener)))?;
//! let b = index.register(NodeSpec::new(20.0, 12.0, 15.0).listener(Arc::new(NoopListener)))?;
//! index.enter(a)?;
//! index.enter(b)?;
//! assert!(index.find_neighbors(a, 15.0)?.contains(b));
//! # Ok::<(), aoi::AoiError>(())
//! ```

pub mod any;
pub mod config;


pub use any::{AnyIndex, create_index};
pub use config::{IndexConfig, IndexKind};

pub use aoi_core::{
    AoiError, AoiListener, AoiResult, EventKind, InterestIndex, ListenerError, ListenerResult,
    NeighborSet, NodeHandle, NodeSpec, NodeView, NoopListener, Payload, Point,
};
pub use aoi_grid::{CellCoord, GridConfig, GridIndex};
pub use aoi_list::CrossListIndex;
