//! The operations every interest index exposes.

use std::any::Any;
use std::sync::Arc;

use crate::{AoiListener, AoiResult, NeighborSet, NodeHandle, NodeSpec, NodeView, Payload};

/// Interest-management index contract.
///
/// Implemented by `CrossListIndex` (`aoi-list`), `GridIndex` (`aoi-grid`) and
/// the `AnyIndex` facade (`aoi`).  Every method takes `&self`: an index owns
/// one lock over its structural state and is shared between threads as-is.
///
/// `enter`, `leave` and `move_to` compute their notifications while holding
/// the write lock and invoke listeners after releasing it, on the calling
/// thread, before returning.
pub trait InterestIndex: Send + Sync {
    /// Store a new node.  It stays Unregistered (invisible to queries) until
    /// [`enter`](Self::enter).
    fn register(&self, spec: NodeSpec) -> AoiResult<NodeHandle>;

    /// Drop an Unregistered node.  The handle is not reused.
    fn release(&self, node: NodeHandle) -> AoiResult<()>;

    /// Link `node` into the structure and notify it and its neighbors.
    fn enter(&self, node: NodeHandle) -> AoiResult<()>;

    /// Unlink `node` and notify it and its neighbors.
    fn leave(&self, node: NodeHandle) -> AoiResult<()>;

    /// Move `node` to `(x, y)` and deliver the move diff.
    fn move_to(&self, node: NodeHandle, x: f32, y: f32) -> AoiResult<()>;

    /// Change the observation radius.  Fires no events by itself.
    fn set_range(&self, node: NodeHandle, range: f32) -> AoiResult<()>;

    /// Replace the listener bound to `node`.
    fn set_listener(&self, node: NodeHandle, listener: Arc<dyn AoiListener>) -> AoiResult<()>;

    /// Attach (or replace) the opaque payload of `node`.
    fn bind_payload(&self, node: NodeHandle, payload: Payload) -> AoiResult<()>;

    /// The payload of `node`, if any, without downcasting.
    fn payload_any(&self, node: NodeHandle) -> AoiResult<Option<Payload>>;

    /// Registered nodes inside the axis-aligned square of half-side `range`
    /// around `node`.  Never includes `node` itself and never notifies.
    /// A zero range yields an empty set; a negative one is an error.
    fn find_neighbors(&self, node: NodeHandle, range: f32) -> AoiResult<NeighborSet>;

    /// Snapshot of `node`'s position and range.
    fn view(&self, node: NodeHandle) -> AoiResult<NodeView>;

    fn is_registered(&self, node: NodeHandle) -> AoiResult<bool>;

    /// Nodes held by the index, Registered or not.
    fn len(&self) -> AoiResult<usize>;

    fn is_empty(&self) -> AoiResult<bool> {
        Ok(self.len()? == 0)
    }

    fn registered_count(&self) -> AoiResult<usize>;

    /// Human-readable snapshot of the structure.  Diagnostic only.
    fn debug_dump(&self) -> String;

    /// The payload of `node` downcast to `T`.  `None` if absent or of a
    /// different type.
    fn payload<T: Any + Send + Sync>(&self, node: NodeHandle) -> AoiResult<Option<Arc<T>>>
    where
        Self: Sized,
    {
        Ok(self.payload_any(node)?.and_then(|p| p.downcast::<T>().ok()))
    }
}
