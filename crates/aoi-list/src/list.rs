//! `CrossListIndex` and its neighbor scan.

use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use log::{debug, trace};

use aoi_core::{
    AoiListener, AoiResult, DispatchOrder, InterestIndex, NeighborSet, NodeHandle, NodeSpec, NodeView,
    Notifications, Payload, Point, validate_point, validate_range,
};

use crate::axis::{Axis, AxisList, ListArena};

// ── State behind the lock ─────────────────────────────────────────────────────

struct ListState {
    arena:  ListArena,
    x_list: AxisList,
    y_list: AxisList,
}

impl ListState {
    fn link(&mut self, node: NodeHandle) {
        self.x_list.insert(&mut self.arena, node);
        self.y_list.insert(&mut self.arena, node);
    }

    fn unlink(&mut self, node: NodeHandle) {
        self.x_list.unlink(&mut self.arena, node);
        self.y_list.unlink(&mut self.arena, node);
        debug_assert!(self.arena[node].link.is_detached(), "{node} still linked after unlink");
    }

    /// Bounded bidirectional X-list scan around `node`.
    ///
    /// Each direction stops at the first node whose x gap exceeds `range`.
    /// Visited nodes are kept iff their y gap is within `range` too.
    fn scan(&self, node: NodeHandle, range: f32) -> NeighborSet {
        let mut out = NeighborSet::new();
        if range == 0.0 {
            return out;
        }
        let origin = self.arena[node].pos;
        let mut visited = 0usize;

        let mut cursor = self.arena[node].link.x.next;
        while let Some(cur) = cursor {
            let rec = &self.arena[cur];
            if rec.pos.x - origin.x > range {
                break;
            }
            visited += 1;
            if (rec.pos.y - origin.y).abs() <= range {
                out.insert(cur);
            }
            cursor = rec.link.x.next;
        }

        let mut cursor = self.arena[node].link.x.prev;
        while let Some(cur) = cursor {
            let rec = &self.arena[cur];
            if origin.x - rec.pos.x > range {
                break;
            }
            visited += 1;
            if (rec.pos.y - origin.y).abs() <= range {
                out.insert(cur);
            }
            cursor = rec.link.x.prev;
        }

        trace!("list scan {node} r={range}: visited {visited}, found {}", out.len());
        out
    }

    fn views(&self, list: &AxisList) -> Vec<NodeView> {
        list.handles(&self.arena)
            .into_iter()
            .map(|h| self.arena[h].view(h))
            .collect()
    }
}

// ── CrossListIndex ────────────────────────────────────────────────────────────

/// Interest index over two sorted doubly-linked lists.
///
/// No configuration: the lists grow with the population.  Best when nodes
/// are sparse along at least one axis; query cost is proportional to the
/// number of nodes inside the x band `[x - range, x + range]`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use aoi_core::{InterestIndex, NodeSpec, NoopListener};
/// use aoi_list::CrossListIndex;
///
/// let index = CrossListIndex::new();
/// let a = index.register(NodeSpec::new(2.0, 2.0, 2.0).listener(Arc::new(NoopListener))).unwrap();
/// let b = index.register(NodeSpec::new(3.0, 1.0, 2.0).listener(Arc::new(NoopListener))).unwrap();
/// index.enter(a).unwrap();
/// index.enter(b).unwrap();
/// assert!(index.find_neighbors(a, 2.0).unwrap().contains(b));
/// ```
pub struct CrossListIndex {
    state: RwLock<ListState>,
    order: DispatchOrder,
}

impl CrossListIndex {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ListState {
                arena:  ListArena::new(),
                x_list: AxisList::new(Axis::X),
                y_list: AxisList::new(Axis::Y),
            }),
            order: DispatchOrder::new(),
        }
    }

    /// Snapshot of the X-list in order.
    pub fn x_order(&self) -> AoiResult<Vec<NodeView>> {
        let state = self.state.read()?;
        Ok(state.views(&state.x_list))
    }

    /// Snapshot of the Y-list in order.
    pub fn y_order(&self) -> AoiResult<Vec<NodeView>> {
        let state = self.state.read()?;
        Ok(state.views(&state.y_list))
    }

    #[cfg(test)]
    pub(crate) fn links(&self, node: NodeHandle) -> AoiResult<crate::axis::AxisLinks> {
        Ok(self.state.read()?.arena.get(node)?.link)
    }
}

impl Default for CrossListIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InterestIndex for CrossListIndex {
    fn register(&self, spec: NodeSpec) -> AoiResult<NodeHandle> {
        self.state.write()?.arena.insert(spec)
    }

    fn release(&self, node: NodeHandle) -> AoiResult<()> {
        self.state.write()?.arena.release(node)
    }

    /// Link first, then scan from the node's new list position.
    fn enter(&self, node: NodeHandle) -> AoiResult<()> {
        let (plan, ticket) = {
            let mut state = self.state.write()?;
            state.arena.unregistered(node)?;
            state.link(node);
            state.arena.mark_registered(node);

            let rec = &state.arena[node];
            debug!("list enter {node} at {} r={}", rec.pos, rec.range);
            let neighbors = state.scan(node, rec.range);
            (Notifications::entered(&state.arena, node, &neighbors), self.order.ticket())
        };
        self.order.dispatch(ticket, plan)
    }

    /// Scan while still linked, then splice out.
    fn leave(&self, node: NodeHandle) -> AoiResult<()> {
        let (plan, ticket) = {
            let mut state = self.state.write()?;
            let range = state.arena.registered(node)?.settled_range;
            let neighbors = state.scan(node, range);
            state.unlink(node);
            state.arena.mark_unregistered(node);

            debug!("list leave {node}, {} neighbors", neighbors.len());
            (Notifications::left(&state.arena, node, &neighbors), self.order.ticket())
        };
        self.order.dispatch(ticket, plan)
    }

    /// Unlink, reposition, and re-insert with a full scan from the heads;
    /// positions need not change monotonically.
    fn move_to(&self, node: NodeHandle, x: f32, y: f32) -> AoiResult<()> {
        let dest = Point::new(x, y);
        validate_point(dest)?;
        let (plan, ticket) = {
            let mut state = self.state.write()?;
            let rec = state.arena.registered(node)?;
            let (from, old_range) = (rec.pos, rec.settled_range);

            let old = state.scan(node, old_range);
            state.unlink(node);
            state.arena[node].pos = dest;
            state.link(node);
            state.arena.settle(node);
            let new = state.scan(node, state.arena[node].range);

            debug!("list move {node} {from} -> {dest}");
            (Notifications::moved(&state.arena, node, &old, &new), self.order.ticket())
        };
        self.order.dispatch(ticket, plan)
    }

    fn set_range(&self, node: NodeHandle, range: f32) -> AoiResult<()> {
        self.state.write()?.arena.set_range(node, range)
    }

    fn set_listener(&self, node: NodeHandle, listener: Arc<dyn AoiListener>) -> AoiResult<()> {
        self.state.write()?.arena.get_mut(node)?.listener = listener;
        Ok(())
    }

    fn bind_payload(&self, node: NodeHandle, payload: Payload) -> AoiResult<()> {
        self.state.write()?.arena.get_mut(node)?.payload = Some(payload);
        Ok(())
    }

    fn payload_any(&self, node: NodeHandle) -> AoiResult<Option<Payload>> {
        Ok(self.state.read()?.arena.get(node)?.payload.clone())
    }

    fn find_neighbors(&self, node: NodeHandle, range: f32) -> AoiResult<NeighborSet> {
        validate_range(range)?;
        let state = self.state.read()?;
        state.arena.registered(node)?;
        Ok(state.scan(node, range))
    }

    fn view(&self, node: NodeHandle) -> AoiResult<NodeView> {
        self.state.read()?.arena.view(node)
    }

    fn is_registered(&self, node: NodeHandle) -> AoiResult<bool> {
        Ok(self.state.read()?.arena.get(node)?.is_registered())
    }

    fn len(&self) -> AoiResult<usize> {
        Ok(self.state.read()?.arena.len())
    }

    fn registered_count(&self) -> AoiResult<usize> {
        Ok(self.state.read()?.arena.registered_count())
    }

    fn debug_dump(&self) -> String {
        let Ok(state) = self.state.read() else {
            return "cross-list index: lock poisoned\n".to_string();
        };
        let mut out = String::new();
        for (name, list) in [("x", &state.x_list), ("y", &state.y_list)] {
            let _ = write!(out, "{name} list ({}):", list.len());
            for view in state.views(list) {
                let _ = write!(out, " {}", view.pos);
            }
            out.push('\n');
        }
        out
    }
}
