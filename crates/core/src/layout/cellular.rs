//! Cellular-automata cave carving: random seeding followed by smoothing.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::LayoutContext;
use crate::grid::CellGrid;
use crate::types::{CellKind, Pos};

pub(super) fn carve(ctx: &LayoutContext<'_>, rng: &mut ChaCha8Rng) -> CellGrid {
    let mut grid = CellGrid::filled(ctx.width, ctx.height, CellKind::Wall);
    seed_random(&mut grid, ctx, rng, |_| true);
    smooth(&mut grid, ctx);
    grid
}

/// Seeds interior cells as floor with probability `accessibility / 100`.
/// Cells outside `mask` draw no random number, so restricting the mask does
/// not shift the stream for the cells inside it.
pub(super) fn seed_random(
    grid: &mut CellGrid,
    ctx: &LayoutContext<'_>,
    rng: &mut ChaCha8Rng,
    mask: impl Fn(Pos) -> bool,
) {
    let chance = f64::from(ctx.accessibility.min(100)) / 100.0;
    for pos in ctx.interior_positions() {
        if mask(pos) && rng.random_bool(chance) {
            grid.set(pos, CellKind::Floor);
        }
    }
}

/// Runs the configured number of smoothing passes.
pub(super) fn smooth(grid: &mut CellGrid, ctx: &LayoutContext<'_>) {
    for _ in 0..ctx.config.ca_iterations {
        smooth_pass(grid, ctx);
    }
}

/// One synchronous pass: every interior cell is recomputed from the snapshot
/// taken at the start of the pass. A cell ends as floor exactly when enough
/// of its eight neighbors were floor, regardless of its own previous state.
fn smooth_pass(grid: &mut CellGrid, ctx: &LayoutContext<'_>) {
    let snapshot = grid.clone();
    for pos in ctx.interior_positions() {
        let next = if snapshot.floor_neighbors8(pos) >= ctx.config.ca_floor_neighbor_min {
            CellKind::Floor
        } else {
            CellKind::Wall
        };
        grid.set(pos, next);
    }
}
