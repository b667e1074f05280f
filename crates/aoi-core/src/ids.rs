//! Strongly typed node handle.
//!
//! A `NodeHandle` addresses one slot of an index's node arena.  Handles are
//! `Copy + Ord + Hash` so they can be used as set members and sorted without
//! ceremony.  An index never reissues a handle, even after `release`.

use std::fmt;

/// Index of a node slot in an index's arena.  Max ~4.3 billion nodes per index.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeHandle(pub u32);

impl NodeHandle {
    /// Sentinel meaning "no valid handle", equal to `u32::MAX`.
    pub const INVALID: NodeHandle = NodeHandle(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeHandle {
    /// Returns the `INVALID` sentinel so uninitialized handles are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({})", self.0)
    }
}

impl From<NodeHandle> for usize {
    #[inline(always)]
    fn from(h: NodeHandle) -> usize {
        h.0 as usize
    }
}

impl TryFrom<usize> for NodeHandle {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<NodeHandle, Self::Error> {
        u32::try_from(n).map(NodeHandle)
    }
}
