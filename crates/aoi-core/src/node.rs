//! Node records and the arena that owns them.
//!
//! # Layout
//!
//! Every index keeps its nodes in a [`NodeArena`]: a `Vec` of slots addressed
//! by [`NodeHandle`].  Index-specific linkage (list neighbours, grid cell) is
//! the generic `L` field of each [`NodeRecord`], so the arena never needs to
//! know which index owns it.  Slots are never reused; `release` leaves a hole
//! so a stale handle fails with `UnknownNode` instead of aliasing a newer
//! node.

use std::any::Any;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::{AoiError, AoiListener, AoiResult, NodeHandle, Point};

/// Opaque caller data attached to a node.  The index never inspects it.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Lifecycle state of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Known to the arena but not part of the spatial structure.
    #[default]
    Unregistered,
    /// Linked into the spatial structure; visible to neighbor queries.
    Registered,
}

/// Reject negative and non-finite ranges.
pub fn validate_range(range: f32) -> AoiResult<()> {
    if range.is_nan() || range.is_infinite() {
        return Err(AoiError::Validation(format!("range must be finite, got {range}")));
    }
    if range < 0.0 {
        return Err(AoiError::NegativeRange(range));
    }
    Ok(())
}

/// Reject positions with a NaN or infinite coordinate.
pub fn validate_point(pos: Point) -> AoiResult<()> {
    if !pos.is_finite() {
        return Err(AoiError::Validation(format!("position must be finite, got {pos}")));
    }
    Ok(())
}

// ── NodeSpec ──────────────────────────────────────────────────────────────────

/// Initial state for a node, passed to `InterestIndex::register`.
///
/// ```rust
/// use std::sync::Arc;
/// use aoi_core::{NodeSpec, NoopListener};
///
/// let spec = NodeSpec::new(1.0, 5.0, 2.0)
///     .listener(Arc::new(NoopListener))
///     .payload("player-17");
/// ```
#[derive(Clone)]
pub struct NodeSpec {
    pub pos:      Point,
    pub range:    f32,
    listener:     Option<Arc<dyn AoiListener>>,
    payload:      Option<Payload>,
}

impl NodeSpec {
    pub fn new(x: f32, y: f32, range: f32) -> Self {
        Self { pos: Point::new(x, y), range, listener: None, payload: None }
    }

    /// Bind the listener notified for this node.  Required.
    pub fn listener(mut self, listener: Arc<dyn AoiListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Attach opaque caller data.
    pub fn payload<T: Any + Send + Sync>(mut self, payload: T) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("pos", &self.pos)
            .field("range", &self.range)
            .field("has_listener", &self.listener.is_some())
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

// ── NodeView ──────────────────────────────────────────────────────────────────

/// Snapshot of a node handed to listeners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeView {
    pub handle: NodeHandle,
    pub pos:    Point,
    pub range:  f32,
}

// ── NodeRecord ────────────────────────────────────────────────────────────────

/// Per-node state owned by an index.  `L` is the index-private linkage.
pub struct NodeRecord<L> {
    pub pos: Point,

    /// Observation radius.  May change at any time via `set_range`.
    pub range: f32,

    /// Radius the node's current neighbor set was computed with.  Updated on
    /// enter and move; used as the "old radius" of the next move diff and as
    /// the radius of `leave`.
    pub settled_range: f32,

    pub listener: Arc<dyn AoiListener>,
    pub payload:  Option<Payload>,
    pub state:    Lifecycle,
    pub link:     L,
}

impl<L> NodeRecord<L> {
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.state == Lifecycle::Registered
    }

    #[inline]
    pub fn view(&self, handle: NodeHandle) -> NodeView {
        NodeView { handle, pos: self.pos, range: self.range }
    }
}

// ── NodeArena ─────────────────────────────────────────────────────────────────

/// Slot storage for every node known to one index.
pub struct NodeArena<L> {
    slots:      Vec<Option<NodeRecord<L>>>,
    live:       usize,
    registered: usize,
}

impl<L: Default> NodeArena<L> {
    pub fn new() -> Self {
        Self { slots: Vec::new(), live: 0, registered: 0 }
    }

    /// Validate `spec` and store it as a new Unregistered node.
    pub fn insert(&mut self, spec: NodeSpec) -> AoiResult<NodeHandle> {
        let listener = spec.listener.ok_or(AoiError::MissingListener)?;
        validate_point(spec.pos)?;
        validate_range(spec.range)?;

        let handle = NodeHandle::try_from(self.slots.len())
            .ok()
            .filter(|h| *h != NodeHandle::INVALID)
            .ok_or_else(|| AoiError::Validation("node arena is full".into()))?;

        self.slots.push(Some(NodeRecord {
            pos:           spec.pos,
            range:         spec.range,
            settled_range: spec.range,
            listener,
            payload:       spec.payload,
            state:         Lifecycle::Unregistered,
            link:          L::default(),
        }));
        self.live += 1;
        Ok(handle)
    }
}

impl<L: Default> Default for NodeArena<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> NodeArena<L> {
    /// Drop an Unregistered node.  Its handle is never reissued.
    pub fn release(&mut self, node: NodeHandle) -> AoiResult<()> {
        if self.get(node)?.is_registered() {
            return Err(AoiError::AlreadyRegistered(node));
        }
        self.slots[node.index()] = None;
        self.live -= 1;
        Ok(())
    }

    pub fn get(&self, node: NodeHandle) -> AoiResult<&NodeRecord<L>> {
        self.slots
            .get(node.index())
            .and_then(Option::as_ref)
            .ok_or(AoiError::UnknownNode(node))
    }

    pub fn get_mut(&mut self, node: NodeHandle) -> AoiResult<&mut NodeRecord<L>> {
        self.slots
            .get_mut(node.index())
            .and_then(Option::as_mut)
            .ok_or(AoiError::UnknownNode(node))
    }

    /// The node, which must be Registered.
    pub fn registered(&self, node: NodeHandle) -> AoiResult<&NodeRecord<L>> {
        let rec = self.get(node)?;
        if !rec.is_registered() {
            return Err(AoiError::NotRegistered(node));
        }
        Ok(rec)
    }

    /// The node, which must be Unregistered.
    pub fn unregistered(&self, node: NodeHandle) -> AoiResult<&NodeRecord<L>> {
        let rec = self.get(node)?;
        if rec.is_registered() {
            return Err(AoiError::AlreadyRegistered(node));
        }
        Ok(rec)
    }

    /// Flip `node` to Registered and settle its range.  The caller has
    /// already linked it into the spatial structure.
    pub fn mark_registered(&mut self, node: NodeHandle) {
        let rec = &mut self[node];
        debug_assert!(!rec.is_registered(), "{node} registered twice");
        rec.state = Lifecycle::Registered;
        rec.settled_range = rec.range;
        self.registered += 1;
    }

    /// Flip `node` to Unregistered.  The caller has already unlinked it.
    pub fn mark_unregistered(&mut self, node: NodeHandle) {
        let rec = &mut self[node];
        debug_assert!(rec.is_registered(), "{node} unregistered twice");
        rec.state = Lifecycle::Unregistered;
        self.registered -= 1;
    }

    /// Record that the node's neighbor set is now computed with its current
    /// range.
    #[inline]
    pub fn settle(&mut self, node: NodeHandle) {
        let rec = &mut self[node];
        rec.settled_range = rec.range;
    }

    /// Update the position of `node` after validating it.
    pub fn set_pos(&mut self, node: NodeHandle, pos: Point) -> AoiResult<()> {
        validate_point(pos)?;
        self.get_mut(node)?.pos = pos;
        Ok(())
    }

    /// Update the observation radius.  Never fires events; the next move
    /// diffs against the radius in effect before this call.
    pub fn set_range(&mut self, node: NodeHandle, range: f32) -> AoiResult<()> {
        validate_range(range)?;
        self.get_mut(node)?.range = range;
        Ok(())
    }

    pub fn view(&self, node: NodeHandle) -> AoiResult<NodeView> {
        Ok(self.get(node)?.view(node))
    }

    /// Nodes currently held (Registered or not).
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn registered_count(&self) -> usize {
        self.registered
    }

    /// Iterator over `(handle, record)` for every Registered node.
    pub fn iter_registered(&self) -> impl Iterator<Item = (NodeHandle, &NodeRecord<L>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .filter(|rec| rec.is_registered())
                .map(|rec| (NodeHandle(i as u32), rec))
        })
    }
}

/// Direct slot access for handles the index itself stored in its linkage.
///
/// # Panics
/// Panics if `node` is not a live slot; linkage never holds such handles.
impl<L> Index<NodeHandle> for NodeArena<L> {
    type Output = NodeRecord<L>;

    #[inline]
    fn index(&self, node: NodeHandle) -> &NodeRecord<L> {
        match self.slots.get(node.index()) {
            Some(Some(rec)) => rec,
            _ => panic!("{node} is not a live node"),
        }
    }
}

impl<L> IndexMut<NodeHandle> for NodeArena<L> {
    #[inline]
    fn index_mut(&mut self, node: NodeHandle) -> &mut NodeRecord<L> {
        match self.slots.get_mut(node.index()) {
            Some(Some(rec)) => rec,
            _ => panic!("{node} is not a live node"),
        }
    }
}
