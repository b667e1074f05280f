//! `AnyIndex` — one concrete type over both implementations.

use std::sync::Arc;

use log::debug;

use aoi_core::{
    AoiListener, AoiResult, InterestIndex, NeighborSet, NodeHandle, NodeSpec, NodeView, Payload,
};
use aoi_grid::GridIndex;
use aoi_list::CrossListIndex;

use crate::{IndexConfig, IndexKind};

/// Build the index described by `config`.
///
/// # Errors
/// `AoiError::Config` if a grid configuration is invalid; nothing is built.
pub fn create_index(config: IndexConfig) -> AoiResult<AnyIndex> {
    let index = match config {
        IndexConfig::CrossList => AnyIndex::CrossList(CrossListIndex::new()),
        IndexConfig::Grid(grid) => AnyIndex::Grid(GridIndex::new(grid)?),
    };
    debug!("created {} index", index.kind());
    Ok(index)
}

/// Either index, chosen at runtime.  Implements [`InterestIndex`] by
/// delegation, so the generic `payload::<T>()` helper is available too.
pub enum AnyIndex {
    CrossList(CrossListIndex),
    Grid(GridIndex),
}

impl AnyIndex {
    pub fn kind(&self) -> IndexKind {
        match self {
            AnyIndex::CrossList(_) => IndexKind::CrossList,
            AnyIndex::Grid(_) => IndexKind::Grid,
        }
    }

    pub fn as_cross_list(&self) -> Option<&CrossListIndex> {
        match self {
            AnyIndex::CrossList(index) => Some(index),
            AnyIndex::Grid(_) => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridIndex> {
        match self {
            AnyIndex::Grid(index) => Some(index),
            AnyIndex::CrossList(_) => None,
        }
    }
}

impl From<CrossListIndex> for AnyIndex {
    fn from(index: CrossListIndex) -> Self {
        AnyIndex::CrossList(index)
    }
}

impl From<GridIndex> for AnyIndex {
    fn from(index: GridIndex) -> Self {
        AnyIndex::Grid(index)
    }
}

/// Forward a method to whichever index is inside.
macro_rules! delegate {
    ($self:ident, $index:ident => $call:expr) => {
        match $self {
            AnyIndex::CrossList($index) => $call,
            AnyIndex::Grid($index) => $call,
        }
    };
}

impl InterestIndex for AnyIndex {
    fn register(&self, spec: NodeSpec) -> AoiResult<NodeHandle> {
        delegate!(self, i => i.register(spec))
    }

    fn release(&self, node: NodeHandle) -> AoiResult<()> {
        delegate!(self, i => i.release(node))
    }

    fn enter(&self, node: NodeHandle) -> AoiResult<()> {
        delegate!(self, i => i.enter(node))
    }

    fn leave(&self, node: NodeHandle) -> AoiResult<()> {
        delegate!(self, i => i.leave(node))
    }

    fn move_to(&self, node: NodeHandle, x: f32, y: f32) -> AoiResult<()> {
        delegate!(self, i => i.move_to(node, x, y))
    }

    fn set_range(&self, node: NodeHandle, range: f32) -> AoiResult<()> {
        delegate!(self, i => i.set_range(node, range))
    }

    fn set_listener(&self, node: NodeHandle, listener: Arc<dyn AoiListener>) -> AoiResult<()> {
        delegate!(self, i => i.set_listener(node, listener))
    }

    fn bind_payload(&self, node: NodeHandle, payload: Payload) -> AoiResult<()> {
        delegate!(self, i => i.bind_payload(node, payload))
    }

    fn payload_any(&self, node: NodeHandle) -> AoiResult<Option<Payload>> {
        delegate!(self, i => i.payload_any(node))
    }

    fn find_neighbors(&self, node: NodeHandle, range: f32) -> AoiResult<NeighborSet> {
        delegate!(self, i => i.find_neighbors(node, range))
    }

    fn view(&self, node: NodeHandle) -> AoiResult<NodeView> {
        delegate!(self, i => i.view(node))
    }

    fn is_registered(&self, node: NodeHandle) -> AoiResult<bool> {
        delegate!(self, i => i.is_registered(node))
    }

    fn len(&self) -> AoiResult<usize> {
        delegate!(self, i => i.len())
    }

    fn registered_count(&self) -> AoiResult<usize> {
        delegate!(self, i => i.registered_count())
    }

    fn debug_dump(&self) -> String {
        delegate!(self, i => i.debug_dump())
    }
}
