//! Drunkard's-walk carving: a wandering cursor opens floor until the target
//! share of the interior is reached.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::LayoutContext;
use crate::grid::CellGrid;
use crate::types::{CellKind, Pos};

/// Step budget per carved cell; keeps pathological walks from spinning.
const STEP_BUDGET_FACTOR: usize = 30;

const STEPS: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

pub(super) fn carve(ctx: &LayoutContext<'_>, rng: &mut ChaCha8Rng) -> CellGrid {
    let mut grid = CellGrid::filled(ctx.width, ctx.height, CellKind::Wall);
    let target = floor_target(ctx.interior_area(), ctx.accessibility);
    walk(&mut grid, rng, ctx.center(), target, |pos| ctx.is_interior(pos));
    grid
}

/// Number of cells the walk aims to open.
pub(super) fn floor_target(area: usize, accessibility: u8) -> usize {
    area * usize::from(accessibility.min(100)) / 100
}

/// Runs one walk from `start`, carving until `target` cells are floor or the
/// step budget runs out. Leaving `within` teleports the cursor back to a
/// random already-carved cell instead of stepping, which keeps the mass in
/// bounds without biasing the walk toward the center.
pub(super) fn walk(
    grid: &mut CellGrid,
    rng: &mut ChaCha8Rng,
    start: Pos,
    target: usize,
    within: impl Fn(Pos) -> bool,
) {
    if target == 0 || !within(start) {
        return;
    }
    let mut carved: Vec<Pos> = Vec::new();
    grid.set(start, CellKind::Floor);
    carved.push(start);
    let mut cursor = start;
    let budget = target.saturating_mul(STEP_BUDGET_FACTOR);
    let mut steps = 0;
    while carved.len() < target && steps < budget {
        steps += 1;
        let (dy, dx) = STEPS[rng.random_range(0..STEPS.len())];
        let next = cursor.offset(dy, dx);
        if !within(next) {
            cursor = carved[rng.random_range(0..carved.len())];
            continue;
        }
        cursor = next;
        if !grid.is_floor(next) {
            grid.set(next, CellKind::Floor);
            carved.push(next);
        }
    }
}
