//! walkers — random-walk demo for the rust_aoi indexes.
//!
//! Registers WALKER_COUNT nodes in a square world and lets them wander for
//! STEPS steps, each walker on a Rayon worker.  Every delivery is counted by
//! a shared listener; the totals and a short structural dump are printed at
//! the end.
//!
//! Usage: `cargo run -p walkers -- [list|grid]` (default `grid`).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::{Result, bail};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use aoi::{
    AoiListener, GridConfig, IndexConfig, InterestIndex, ListenerResult, NodeHandle, NodeSpec,
    NodeView, create_index,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const WALKER_COUNT: usize = 2_000;
const STEPS:        usize = 200;
const SEED:         u64   = 42;
const WORLD:        f32   = 1_000.0;
const VIEW_RANGE:   f32   = 30.0;
const STRIDE:       f32   = 4.0; // max per-axis step length
const DUMP_LINES:   usize = 6;

// ── Listener ──────────────────────────────────────────────────────────────────

/// Tallies node views delivered per callback kind, across all walkers.
#[derive(Default)]
struct Tally {
    enters:  AtomicU64,
    updates: AtomicU64,
    leaves:  AtomicU64,
}

impl AoiListener for Tally {
    fn on_enter(&self, _observer: NodeHandle, nodes: &[NodeView]) -> ListenerResult {
        self.enters.fetch_add(nodes.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    fn on_update(&self, _observer: NodeHandle, _node: &NodeView) -> ListenerResult {
        self.updates.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_leave(&self, _observer: NodeHandle, nodes: &[NodeView]) -> ListenerResult {
        self.leaves.fetch_add(nodes.len() as u64, Ordering::Relaxed);
        Ok(())
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn index_config(arg: Option<&str>) -> Result<IndexConfig> {
    Ok(match arg.unwrap_or("grid") {
        "list" => IndexConfig::CrossList,
        "grid" => IndexConfig::Grid(GridConfig::new(0.0, WORLD, 0.0, WORLD, VIEW_RANGE)),
        other => bail!("unknown index kind {other:?}; expected `list` or `grid`"),
    })
}

fn main() -> Result<()> {
    let arg = std::env::args().nth(1);
    let config = index_config(arg.as_deref())?;

    println!("=== walkers — rust_aoi random-walk demo ===");
    println!(
        "Index: {}  |  Walkers: {WALKER_COUNT}  |  Steps: {STEPS}  |  Seed: {SEED}",
        config.kind()
    );
    println!();

    // 1. Build the index.
    let index = create_index(config)?;
    let tally = Arc::new(Tally::default());

    // 2. Register and enter every walker at a seeded random position.
    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut walkers = Vec::with_capacity(WALKER_COUNT);
    for i in 0..WALKER_COUNT {
        let spec = NodeSpec::new(rng.gen_range(0.0..WORLD), rng.gen_range(0.0..WORLD), VIEW_RANGE)
            .listener(tally.clone())
            .payload(i);
        let h = index.register(spec)?;
        index.enter(h)?;
        walkers.push(h);
    }
    println!("Entered {} walkers", index.registered_count()?);

    // 3. Walk.  Each walker owns its RNG stream, so the paths are
    //    deterministic; event interleaving between walkers is not.
    let t0 = Instant::now();
    walkers.par_iter().enumerate().try_for_each(|(i, &h)| -> aoi::AoiResult<()> {
        let mut rng = SmallRng::seed_from_u64(SEED ^ (i as u64 + 1));
        for _ in 0..STEPS {
            let pos = index.view(h)?.pos;
            let x = (pos.x + rng.gen_range(-STRIDE..STRIDE)).clamp(0.0, WORLD);
            let y = (pos.y + rng.gen_range(-STRIDE..STRIDE)).clamp(0.0, WORLD);
            index.move_to(h, x, y)?;
        }
        Ok(())
    })?;
    let elapsed = t0.elapsed();

    // 4. Summary.
    println!("Walked {} moves in {:.3} s", WALKER_COUNT * STEPS, elapsed.as_secs_f64());
    println!("  enter  deliveries : {}", tally.enters.load(Ordering::Relaxed));
    println!("  update deliveries : {}", tally.updates.load(Ordering::Relaxed));
    println!("  leave  deliveries : {}", tally.leaves.load(Ordering::Relaxed));

    let first = walkers[0];
    let seen = index.find_neighbors(first, VIEW_RANGE)?;
    let id = index.payload::<usize>(first)?.map_or(usize::MAX, |p| *p);
    println!(
        "  walker #{id} at {} sees {} others",
        index.view(first)?.pos,
        seen.len()
    );
    println!();

    // 5. Structural dump, truncated.
    println!("{}", "-".repeat(40));
    for line in index.debug_dump().lines().take(DUMP_LINES) {
        let short: String = line.chars().take(100).collect();
        println!("{short}");
    }

    // 6. Everyone leaves.
    for &h in &walkers {
        index.leave(h)?;
    }
    println!();
    println!("All walkers left; {} still registered", index.registered_count()?);

    Ok(())
}
