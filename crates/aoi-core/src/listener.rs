//! The listener capability notified by the indexes.

use crate::{NodeHandle, NodeView};

/// Error returned by a listener callback.  Propagated to the caller of the
/// index operation that triggered the delivery.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

pub type ListenerResult = Result<(), ListenerError>;

/// Callbacks invoked by an index when other nodes enter, move within, or
/// leave the area of interest of `observer`.
///
/// One listener may be bound to many nodes, so every callback names the
/// observing node.  The `NodeView`s are snapshots taken while the index lock
/// was held; callbacks run after the lock is released, on the thread that
/// called the index operation.
///
/// A callback must not call back into the same index synchronously.  A query
/// may observe a state newer than the event being delivered; a mutating call
/// never returns, because its events queue behind the ones being dispatched.
/// Queue such requests and issue them after the outer call returns.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: counting visible nodes
///
/// ```rust
/// use std::sync::atomic::{AtomicI64, Ordering};
/// use aoi_core::{AoiListener, ListenerResult, NodeHandle, NodeView};
///
/// #[derive(Default)]
/// struct Visible(AtomicI64);
///
/// impl AoiListener for Visible {
///     fn on_enter(&self, _observer: NodeHandle, nodes: &[NodeView]) -> ListenerResult {
///         self.0.fetch_add(nodes.len() as i64, Ordering::Relaxed);
///         Ok(())
///     }
///
///     fn on_leave(&self, _observer: NodeHandle, nodes: &[NodeView]) -> ListenerResult {
///         self.0.fetch_sub(nodes.len() as i64, Ordering::Relaxed);
///         Ok(())
///     }
/// }
/// ```
pub trait AoiListener: Send + Sync {
    /// `nodes` came into the area of interest of `observer`.
    fn on_enter(&self, _observer: NodeHandle, _nodes: &[NodeView]) -> ListenerResult {
        Ok(())
    }

    /// `node` moved and is still inside the area of interest of `observer`.
    fn on_update(&self, _observer: NodeHandle, _node: &NodeView) -> ListenerResult {
        Ok(())
    }

    /// `nodes` left the area of interest of `observer`.
    fn on_leave(&self, _observer: NodeHandle, _nodes: &[NodeView]) -> ListenerResult {
        Ok(())
    }
}

/// An [`AoiListener`] that ignores every event.  Use for nodes that are
/// observed but never observe (static props, spawn markers).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl AoiListener for NoopListener {}
