//! `NeighborSet` — an unordered set of node handles.
//!
//! Used for neighbor query results and for grid cell membership.  Iteration
//! order is unspecified; call [`NeighborSet::sorted`] when a stable order is
//! needed (tests, diagnostics).

use crate::NodeHandle;

#[cfg(feature = "fx-hash")]
type HandleSet = rustc_hash::FxHashSet<NodeHandle>;

#[cfg(not(feature = "fx-hash"))]
type HandleSet = std::collections::HashSet<NodeHandle>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NeighborSet(HandleSet);

impl NeighborSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`; returns `false` if it was already present.
    #[inline]
    pub fn insert(&mut self, node: NodeHandle) -> bool {
        self.0.insert(node)
    }

    /// Remove `node`; returns `false` if it was not present.
    #[inline]
    pub fn remove(&mut self, node: NodeHandle) -> bool {
        self.0.remove(&node)
    }

    #[inline]
    pub fn contains(&self, node: NodeHandle) -> bool {
        self.0.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.0.iter().copied()
    }

    /// Members of `self` that are not in `other`.
    pub fn difference<'a>(&'a self, other: &'a NeighborSet) -> impl Iterator<Item = NodeHandle> + 'a {
        self.0.difference(&other.0).copied()
    }

    /// Members present in both sets.
    pub fn intersection<'a>(&'a self, other: &'a NeighborSet) -> impl Iterator<Item = NodeHandle> + 'a {
        self.0.intersection(&other.0).copied()
    }

    /// Members in ascending handle order.
    pub fn sorted(&self) -> Vec<NodeHandle> {
        let mut v: Vec<NodeHandle> = self.iter().collect();
        v.sort_unstable();
        v
    }
}

impl FromIterator<NodeHandle> for NeighborSet {
    fn from_iter<I: IntoIterator<Item = NodeHandle>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<NodeHandle> for NeighborSet {
    fn extend<I: IntoIterator<Item = NodeHandle>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for NeighborSet {
    type Item = NodeHandle;
    type IntoIter = <HandleSet as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
