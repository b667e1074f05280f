//! The enter/update/leave event protocol shared by every index.
//!
//! # Two-step delivery
//!
//! ```text
//! ① Plan      — under the index's write lock, after the structural
//!               mutation: compute the neighbor sets, diff them, and record
//!               one Delivery per callback (listener Arc, observer, views).
//! ② Dispatch  — after the lock is released: invoke the callbacks in plan
//!               order on the calling thread.  The first listener error
//!               stops dispatch and is returned to the caller.
//! ```
//!
//! Plans are dispatched in the order their operations committed.  The index
//! draws a [`Ticket`] from its [`DispatchOrder`] before releasing the write
//! lock; dispatch waits until every earlier ticket has been delivered.
//!
//! # Call contract
//!
//! | Operation | Each affected neighbor receives   | The acting node receives      |
//! |-----------|-----------------------------------|-------------------------------|
//! | enter     | `on_enter([node])`                | one `on_enter(all neighbors)` |
//! | leave     | `on_leave([node])`                | one `on_leave(all neighbors)` |
//! | move      | `O \ N`: `on_leave([node])`       | one `on_leave(O \ N)`         |
//! |           | `N \ O`: `on_enter([node])`       | one `on_enter(N \ O)`         |
//! |           | `O ∩ N`: `on_update(node)`        | nothing for retained nodes    |
//!
//! The acting node's batch calls are made even when the batch is empty.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use log::warn;

use crate::{AoiError, AoiListener, AoiResult, NeighborSet, NodeArena, NodeHandle, NodeView};

/// Which listener callback a delivery invokes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Enter,
    Update,
    Leave,
}

// ── MoveDiff ──────────────────────────────────────────────────────────────────

/// Set differences between the neighbor sets before (`O`) and after (`N`) a
/// move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveDiff {
    /// `O \ N`: neighbors that lost sight of the mover.
    pub left:     NeighborSet,
    /// `N \ O`: neighbors that gained sight of the mover.
    pub entered:  NeighborSet,
    /// `O ∩ N`: neighbors that keep the mover in view.
    pub retained: NeighborSet,
}

impl MoveDiff {
    pub fn between(old: &NeighborSet, new: &NeighborSet) -> Self {
        Self {
            left:     old.difference(new).collect(),
            entered:  new.difference(old).collect(),
            retained: old.intersection(new).collect(),
        }
    }
}

// ── Notifications ─────────────────────────────────────────────────────────────

struct Delivery {
    listener: Arc<dyn AoiListener>,
    observer: NodeHandle,
    kind:     EventKind,
    nodes:    Vec<NodeView>,
}

/// An ordered plan of listener callbacks produced by one index operation.
pub struct Notifications {
    deliveries: Vec<Delivery>,
}

impl Notifications {
    /// Plan for `node` entering with `neighbors` in view.
    pub fn entered<L>(arena: &NodeArena<L>, node: NodeHandle, neighbors: &NeighborSet) -> Self {
        let mut plan = Self::with_capacity(neighbors.len() + 1);
        plan.broadcast(arena, node, EventKind::Enter, neighbors.iter());
        plan
    }

    /// Plan for `node` leaving with `neighbors` in view.
    pub fn left<L>(arena: &NodeArena<L>, node: NodeHandle, neighbors: &NeighborSet) -> Self {
        let mut plan = Self::with_capacity(neighbors.len() + 1);
        plan.broadcast(arena, node, EventKind::Leave, neighbors.iter());
        plan
    }

    /// Plan for `node` moving from neighbor set `old` to `new`.
    pub fn moved<L>(
        arena: &NodeArena<L>,
        node:  NodeHandle,
        old:   &NeighborSet,
        new:   &NeighborSet,
    ) -> Self {
        let diff = MoveDiff::between(old, new);
        let mut plan = Self::with_capacity(old.len() + new.len() + 2);
        let mover = arena[node].view(node);

        plan.broadcast(arena, node, EventKind::Leave, diff.left.iter());

        // Enter phase: walk N once so enter and update interleave per neighbor.
        let mut entered = Vec::with_capacity(diff.entered.len());
        for other in new.iter() {
            let rec = &arena[other];
            if diff.entered.contains(other) {
                plan.push(&rec.listener, other, EventKind::Enter, vec![mover]);
                entered.push(rec.view(other));
            } else {
                plan.push(&rec.listener, other, EventKind::Update, vec![mover]);
            }
        }
        plan.push(&arena[node].listener, node, EventKind::Enter, entered);
        plan
    }

    fn with_capacity(n: usize) -> Self {
        Self { deliveries: Vec::with_capacity(n) }
    }

    /// Singleton `kind` deliveries to each of `others`, then one batched
    /// `kind` delivery of all of them to `node`.
    fn broadcast<L>(
        &mut self,
        arena:  &NodeArena<L>,
        node:   NodeHandle,
        kind:   EventKind,
        others: impl Iterator<Item = NodeHandle>,
    ) {
        let actor = arena[node].view(node);
        let mut batch = Vec::new();
        for other in others {
            let rec = &arena[other];
            self.push(&rec.listener, other, kind, vec![actor]);
            batch.push(rec.view(other));
        }
        self.push(&arena[node].listener, node, kind, batch);
    }

    fn push(
        &mut self,
        listener: &Arc<dyn AoiListener>,
        observer: NodeHandle,
        kind:     EventKind,
        nodes:    Vec<NodeView>,
    ) {
        self.deliveries.push(Delivery { listener: Arc::clone(listener), observer, kind, nodes });
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// `(observer, kind, nodes)` for each planned delivery, in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, EventKind, &[NodeView])> + '_ {
        self.deliveries.iter().map(|d| (d.observer, d.kind, d.nodes.as_slice()))
    }

    /// Invoke every planned callback in order.
    ///
    /// Stops at the first listener error.  Deliveries made before the failure
    /// are not undone.
    pub fn dispatch(self) -> AoiResult<()> {
        for d in self.deliveries {
            let result = match d.kind {
                EventKind::Enter => d.listener.on_enter(d.observer, &d.nodes),
                EventKind::Leave => d.listener.on_leave(d.observer, &d.nodes),
                EventKind::Update => match d.nodes.first() {
                    Some(view) => d.listener.on_update(d.observer, view),
                    None => Ok(()),
                },
            };
            if let Err(source) = result {
                warn!("{:?} listener for {} failed: {source}", d.kind, d.observer);
                return Err(AoiError::Listener { observer: d.observer, source });
            }
        }
        Ok(())
    }
}

// ── DispatchOrder ─────────────────────────────────────────────────────────────

/// Place of one plan in its index's dispatch sequence.
#[must_use = "a drawn ticket must be passed to DispatchOrder::dispatch"]
#[derive(Debug)]
pub struct Ticket(u64);

/// Delivers plans one at a time, in ticket order.
///
/// Tickets must be drawn while the index's write lock is held, so ticket
/// order is commit order.  Waiting happens after the lock is released;
/// readers are never blocked by a pending dispatch.
#[derive(Debug, Default)]
pub struct DispatchOrder {
    issued:  AtomicU64,
    serving: Mutex<u64>,
    turn:    Condvar,
}

impl DispatchOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::Relaxed))
    }

    /// Wait for `ticket`'s turn, then dispatch `plan`.
    ///
    /// The turn passes to the next ticket even when a listener fails or
    /// panics.
    pub fn dispatch(&self, ticket: Ticket, plan: Notifications) -> AoiResult<()> {
        let _turn = self.wait_for(ticket);
        plan.dispatch()
    }

    fn wait_for(&self, ticket: Ticket) -> Turn<'_> {
        // `serving` is never held across a callback, so poisoning carries no
        // broken state.
        let mut serving = self.serving.lock().unwrap_or_else(PoisonError::into_inner);
        while *serving != ticket.0 {
            serving = self.turn.wait(serving).unwrap_or_else(PoisonError::into_inner);
        }
        Turn { order: self }
    }
}

struct Turn<'a> {
    order: &'a DispatchOrder,
}

impl Drop for Turn<'_> {
    fn drop(&mut self) {
        let mut serving = self.order.serving.lock().unwrap_or_else(PoisonError::into_inner);
        *serving += 1;
        self.order.turn.notify_all();
    }
}
