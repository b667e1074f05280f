//! One sorted doubly-linked list over the node arena.

use aoi_core::{NodeArena, NodeHandle, Point};

/// Sort key of a list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn key(self, pos: Point) -> f32 {
        match self {
            Axis::X => pos.x,
            Axis::Y => pos.y,
        }
    }

    #[inline]
    fn link(self, links: &AxisLinks) -> &Link {
        match self {
            Axis::X => &links.x,
            Axis::Y => &links.y,
        }
    }

    #[inline]
    fn link_mut(self, links: &mut AxisLinks) -> &mut Link {
        match self {
            Axis::X => &mut links.x,
            Axis::Y => &mut links.y,
        }
    }
}

/// Neighbours of a node in one list.  Both `None` while unregistered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
    pub prev: Option<NodeHandle>,
    pub next: Option<NodeHandle>,
}

/// Per-node linkage for both lists; the `L` of the index's `NodeArena`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisLinks {
    pub x: Link,
    pub y: Link,
}

impl AxisLinks {
    pub fn is_detached(&self) -> bool {
        *self == AxisLinks::default()
    }
}

pub type ListArena = NodeArena<AxisLinks>;

/// Head of one sorted list.
#[derive(Debug)]
pub struct AxisList {
    axis: Axis,
    head: Option<NodeHandle>,
    len:  usize,
}

impl AxisList {
    pub fn new(axis: Axis) -> Self {
        Self { axis, head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Link `node` in ascending key order.
    ///
    /// Scans from the head to the first node with a strictly greater key, so
    /// a node with a key equal to existing entries goes after all of them.
    pub fn insert(&mut self, arena: &mut ListArena, node: NodeHandle) {
        let axis = self.axis;
        let key = axis.key(arena[node].pos);

        let mut last = None;
        let mut cursor = self.head;
        while let Some(cur) = cursor {
            if axis.key(arena[cur].pos) > key {
                break;
            }
            last = Some(cur);
            cursor = axis.link(&arena[cur].link).next;
        }

        // `last` is the predecessor, `cursor` the successor (either may be None).
        *axis.link_mut(&mut arena[node].link) = Link { prev: last, next: cursor };
        match last {
            Some(prev) => axis.link_mut(&mut arena[prev].link).next = Some(node),
            None => self.head = Some(node),
        }
        if let Some(next) = cursor {
            axis.link_mut(&mut arena[next].link).prev = Some(node);
        }
        self.len += 1;
    }

    /// Splice `node` out in O(1) and clear its links for this axis.
    pub fn unlink(&mut self, arena: &mut ListArena, node: NodeHandle) {
        let axis = self.axis;
        let Link { prev, next } = *axis.link(&arena[node].link);

        match prev {
            Some(p) => axis.link_mut(&mut arena[p].link).next = next,
            None => {
                debug_assert_eq!(self.head, Some(node), "unlinked node is neither head nor linked");
                self.head = next;
            }
        }
        if let Some(n) = next {
            axis.link_mut(&mut arena[n].link).prev = prev;
        }
        *axis.link_mut(&mut arena[node].link) = Link::default();
        self.len -= 1;
    }

    /// Handles in list order.
    pub fn handles(&self, arena: &ListArena) -> Vec<NodeHandle> {
        let mut out = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(cur) = cursor {
            out.push(cur);
            cursor = self.axis.link(&arena[cur].link).next;
        }
        out
    }
}
