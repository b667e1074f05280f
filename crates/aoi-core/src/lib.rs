//! `aoi-core` — foundational types for the `rust_aoi` interest-management
//! indexes.
//!
//! This crate is a dependency of every other `aoi-*` crate.  It has no
//! `aoi-*` dependencies and minimal external ones (`thiserror`, `log`, plus
//! optional `serde` and `rustc-hash`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `NodeHandle`                                              |
//! | [`geo`]       | `Point`, axis-aligned vicinity test                       |
//! | [`node`]      | `NodeSpec`, `NodeRecord`, `NodeView`, `NodeArena`         |
//! | [`neighbors`] | `NeighborSet`                                             |
//! | [`listener`]  | `AoiListener` trait, `NoopListener`                       |
//! | [`events`]    | `Notifications`, `DispatchOrder`, `MoveDiff`, `EventKind` |
//! | [`index`]     | `InterestIndex`, the contract both indexes implement      |
//! | [`error`]     | `AoiError`, `AoiResult`                                   |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | Adds `Serialize`/`Deserialize` to `NodeHandle`, `Point`. |
//! | `fx-hash` | Backs `NeighborSet` with `FxHashSet` instead of SipHash. |

pub mod error;
pub mod events;
pub mod geo;
pub mod ids;
pub mod index;
pub mod listener;
pub mod neighbors;
pub mod node;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{AoiError, AoiResult};
pub use events::{DispatchOrder, EventKind, MoveDiff, Notifications, Ticket};
pub use geo::Point;
pub use ids::NodeHandle;
pub use index::InterestIndex;
pub use listener::{AoiListener, ListenerError, ListenerResult, NoopListener};
pub use neighbors::NeighborSet;
pub use node::{Lifecycle, NodeArena, NodeRecord, NodeSpec, NodeView, Payload, validate_point, validate_range};
