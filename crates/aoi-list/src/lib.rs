//! `aoi-list` — cross-linked-list interest index.
//!
//! # How it works
//!
//! ```text
//! x list:  head → (1,5) → (2,2) → (3,1) → (5,3) → (6,6) → ∅
//! y list:  head → (3,1) → (2,2) → (5,3) → (1,5) → (6,6) → ∅
//! ```
//!
//! Every registered node sits in two doubly-linked lists, one sorted by `x`
//! and one by `y`.  A neighbor query starts at the node's own X-list position
//! and walks outwards in both directions until the x gap exceeds the range,
//! testing `|dy| <= range` for each visited node.  Insertion is an ascending
//! scan from the head (O(n) worst case); removal is an O(1) splice.
//!
//! The lists live in a [`NodeArena`](aoi_core::NodeArena): links are
//! `Option<NodeHandle>` slots, not references.
//!
//! # Crate layout
//!
//! | Module   | Contents                                         |
//! |----------|--------------------------------------------------|
//! | [`axis`] | `Axis`, `AxisList`, `Link`, `AxisLinks`          |
//! | [`list`] | `CrossListIndex`                                 |

pub mod axis;
pub mod list;


pub use list::CrossListIndex;
