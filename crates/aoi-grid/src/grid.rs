//! `GridIndex` and its cell-enumeration scan.

use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use log::{debug, trace};

use aoi_core::{
    AoiError, AoiListener, AoiResult, DispatchOrder, InterestIndex, NeighborSet, NodeArena, NodeHandle, NodeSpec,
    NodeView, Notifications, Payload, Point, validate_point, validate_range,
};

use crate::config::{CellCoord, GridConfig, GridLayout};

/// Per-node linkage: the node's home cell while Registered.
pub type GridArena = NodeArena<Option<CellCoord>>;

// ── State behind the lock ─────────────────────────────────────────────────────

struct GridState {
    arena:  GridArena,
    /// One membership set per cell, flattened `x * y_cells + y`.
    towers: Vec<NeighborSet>,
}

impl GridState {
    fn add(&mut self, layout: &GridLayout, node: NodeHandle, cell: CellCoord) {
        if let Some(slot) = layout.slot(cell) {
            self.towers[slot].insert(node);
            self.arena[node].link = Some(cell);
        }
    }

    fn remove(&mut self, layout: &GridLayout, node: NodeHandle) {
        if let Some(slot) = self.arena[node].link.take().and_then(|cell| layout.slot(cell)) {
            self.towers[slot].remove(node);
        }
    }

    /// Union of the memberships of every cell covering the square of
    /// half-side `range` around `node`, minus `node` itself.
    fn scan(&self, layout: &GridLayout, node: NodeHandle, range: f32) -> NeighborSet {
        let mut out = NeighborSet::new();
        if range == 0.0 {
            return out;
        }
        let rect = layout.covering(self.arena[node].pos, range);
        for cell in rect.iter() {
            if let Some(slot) = layout.slot(cell) {
                out.extend(self.towers[slot].iter());
            }
        }
        out.remove(node);
        trace!("grid scan {node} r={range}: {} cells, found {}", rect.area(), out.len());
        out
    }
}

// ── GridIndex ─────────────────────────────────────────────────────────────────

/// Interest index over a uniform grid of cells ("towers").
///
/// Query cost depends on `range / cell_size` and local density, not on the
/// total population.  Results are cell-granular: every member of a covered
/// cell is reported, even when its exact position lies slightly outside the
/// query square.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use aoi_core::{InterestIndex, NodeSpec, NoopListener};
/// use aoi_grid::{GridConfig, GridIndex};
///
/// let index = GridIndex::new(GridConfig::new(0.0, 10.0, 0.0, 10.0, 2.0)).unwrap();
/// let a = index.register(NodeSpec::new(9.0, 9.0, 3.0).listener(Arc::new(NoopListener))).unwrap();
/// index.enter(a).unwrap();
/// assert_eq!(index.home_cell(a).unwrap().map(|c| (c.x, c.y)), Some((4, 4)));
/// ```
pub struct GridIndex {
    layout: GridLayout,
    state:  RwLock<GridState>,
    order:  DispatchOrder,
}

impl GridIndex {
    /// Validate `config` and allocate every cell up front.
    pub fn new(config: GridConfig) -> AoiResult<Self> {
        let layout = GridLayout::new(config)?;
        let (xc, yc) = layout.dimensions();
        debug!("grid index {xc}x{yc} cells of {}", config.cell_size);
        Ok(Self {
            layout,
            state: RwLock::new(GridState {
                arena:  GridArena::new(),
                towers: vec![NeighborSet::new(); layout.cell_count()],
            }),
            order: DispatchOrder::new(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        self.layout.config()
    }

    /// `(x_cells, y_cells)`.
    pub fn dimensions(&self) -> (usize, usize) {
        self.layout.dimensions()
    }

    /// The (clamped) cell containing `pos`.
    pub fn cell_of(&self, pos: Point) -> CellCoord {
        self.layout.cell_of(pos)
    }

    /// Every cell a query of `range` around `pos` enumerates.
    pub fn cells_covering(&self, pos: Point, range: f32) -> AoiResult<Vec<CellCoord>> {
        validate_point(pos)?;
        validate_range(range)?;
        Ok(self.layout.covering(pos, range).iter().collect())
    }

    /// Members of `cell`.
    pub fn cell_population(&self, cell: CellCoord) -> AoiResult<usize> {
        let slot = self
            .layout
            .slot(cell)
            .ok_or_else(|| AoiError::Validation(format!("cell {cell} is outside the grid")))?;
        Ok(self.state.read()?.towers[slot].len())
    }

    /// Home cell of `node`; `None` while Unregistered.
    pub fn home_cell(&self, node: NodeHandle) -> AoiResult<Option<CellCoord>> {
        Ok(self.state.read()?.arena.get(node)?.link)
    }

    /// Sum of all cell populations.
    pub fn total_membership(&self) -> AoiResult<usize> {
        Ok(self.state.read()?.towers.iter().map(NeighborSet::len).sum())
    }
}

impl InterestIndex for GridIndex {
    fn register(&self, spec: NodeSpec) -> AoiResult<NodeHandle> {
        self.state.write()?.arena.insert(spec)
    }

    fn release(&self, node: NodeHandle) -> AoiResult<()> {
        self.state.write()?.arena.release(node)
    }

    /// Scan first, then join the home cell.
    fn enter(&self, node: NodeHandle) -> AoiResult<()> {
        let layout = &self.layout;
        let (plan, ticket) = {
            let mut state = self.state.write()?;
            let rec = state.arena.unregistered(node)?;
            let (pos, range) = (rec.pos, rec.range);

            let neighbors = state.scan(layout, node, range);
            let cell = layout.cell_of(pos);
            state.add(layout, node, cell);
            state.arena.mark_registered(node);

            debug!("grid enter {node} at {pos} cell {cell}");
            (Notifications::entered(&state.arena, node, &neighbors), self.order.ticket())
        };
        self.order.dispatch(ticket, plan)
    }

    /// Leave the home cell first, then scan.
    fn leave(&self, node: NodeHandle) -> AoiResult<()> {
        let layout = &self.layout;
        let (plan, ticket) = {
            let mut state = self.state.write()?;
            let range = state.arena.registered(node)?.settled_range;

            state.remove(layout, node);
            state.arena.mark_unregistered(node);
            let neighbors = state.scan(layout, node, range);

            debug!("grid leave {node}, {} neighbors", neighbors.len());
            (Notifications::left(&state.arena, node, &neighbors), self.order.ticket())
        };
        self.order.dispatch(ticket, plan)
    }

    fn move_to(&self, node: NodeHandle, x: f32, y: f32) -> AoiResult<()> {
        let dest = Point::new(x, y);
        validate_point(dest)?;
        let layout = &self.layout;
        let (plan, ticket) = {
            let mut state = self.state.write()?;
            let rec = state.arena.registered(node)?;
            let (from, from_cell, old_range) = (rec.pos, rec.link, rec.settled_range);

            let old = state.scan(layout, node, old_range);
            let to_cell = layout.cell_of(dest);
            if from_cell != Some(to_cell) {
                state.remove(layout, node);
                state.add(layout, node, to_cell);
            }
            state.arena[node].pos = dest;
            state.arena.settle(node);
            let new = state.scan(layout, node, state.arena[node].range);

            debug!("grid move {node} {from} -> {dest} cell {to_cell}");
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
        Ok(state.scan(&self.layout, node, range))
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

    /// One line per non-empty cell, in column-major order.
    fn debug_dump(&self) -> String {
        let Ok(state) = self.state.read() else {
            return "grid index: lock poisoned\n".to_string();
        };
        let (xc, yc) = self.layout.dimensions();
        let mut out = format!("grid {xc}x{yc}, cell {}\n", self.layout.config().cell_size);
        for x in 0..xc {
            for y in 0..yc {
                let members = &state.towers[x * yc + y];
                if members.is_empty() {
                    continue;
                }
                let _ = write!(out, "cell ({x}, {y}):");
                for h in members.sorted() {
                    let _ = write!(out, " {}", state.arena[h].pos);
                }
                out.push('\n');
            }
        }
        out
    }
}
