//! Decorative object placement.
//!
//! Dresses a finished layout with multi-tile props: stones, trees, fences,
//! the occasional house. Occupied cells turn into [`CellKind::Object`] so
//! later phases treat them as blocked, while the ground tile underneath
//! stays visible and the object sprite lands on the overlay layer. Every
//! footprint keeps a one-cell floor buffer, so placements can never split
//! the walkable area.

mod shapes;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::DecorConfig;
use crate::grid::{CellGrid, TileGrid};
use crate::tiles::decor_sprite;
use crate::types::{CellKind, DecorObject, Pos, Style, TileId};

/// One placed object instance: the cells it covers, sorted row-major, and
/// the sprite drawn over them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorPlacement {
    pub object: DecorObject,
    pub sprite: TileId,
    pub cells: Vec<Pos>,
}

const CAVE_OBJECTS: [DecorObject; 4] = [
    DecorObject::SmallStone,
    DecorObject::BigStone,
    DecorObject::Grave,
    DecorObject::Barrel,
];

const OUTDOOR_OBJECTS: [DecorObject; 10] = [
    DecorObject::SmallStone,
    DecorObject::BigStone,
    DecorObject::Tree,
    DecorObject::Stump,
    DecorObject::Bush,
    DecorObject::Fence,
    DecorObject::Log,
    DecorObject::SmallHouse,
    DecorObject::BigHouse,
    DecorObject::Barrel,
];

/// Object families that may appear in a given style.
pub fn allowed_objects(style: Style) -> &'static [DecorObject] {
    match style {
        Style::Cave => &CAVE_OBJECTS,
        Style::Savanna | Style::Beach | Style::Forest => &OUTDOOR_OBJECTS,
    }
}

/// Scatters decorative objects over the layout. Mutates `grid` and `tiles`
/// in place and returns the placements in the order they were made.
///
/// Placement seeds come from cells with a fully open 3x3 neighborhood, keep
/// a minimum spacing between each other, and each successful placement may
/// chain into a nearby companion of the same type. Slots that find no valid
/// seed or no fitting shape simply contribute nothing.
pub(crate) fn place_objects(
    grid: &mut CellGrid,
    tiles: &mut TileGrid,
    style: Style,
    decor: &DecorConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<DecorPlacement> {
    let candidates: Vec<Pos> = grid.positions().filter(|pos| grid.open_3x3(*pos)).collect();
    if candidates.is_empty() {
        return Vec::new();
    }
    let quota = (decor.max_object_share * candidates.len() as f64) as usize;
    let allowed = allowed_objects(style);
    let mut accepted: Vec<Pos> = Vec::new();
    let mut placements = Vec::new();
    let mut cluster_budget = decor.max_cluster_spawns;
    for _ in 0..quota {
        let Some(seed) = draw_seed(grid, decor, &candidates, &accepted, rng) else {
            continue;
        };
        accepted.push(seed);
        let Some(placement) = try_place_at(grid, tiles, seed, allowed, decor, rng) else {
            continue;
        };
        let mut worklist = vec![(placement.object, placement.cells[0])];
        placements.push(placement);
        // Companion chain: a placement may seed another instance of the
        // same type nearby, which in turn may seed another one.
        while let Some((object, origin)) = worklist.pop() {
            if cluster_budget == 0 || !rng.random_bool(decor.cluster_spawn_chance) {
                continue;
            }
            let Some(next) = nearby_open_cell(grid, origin, decor.cluster_spawn_distance, rng)
            else {
                continue;
            };
            let Some(spawned) = place_one(grid, tiles, object, next, decor, rng) else {
                continue;
            };
            cluster_budget -= 1;
            worklist.push((object, spawned.cells[0]));
            placements.push(spawned);
        }
    }
    placements
}

/// Rejection-samples one placement seed: a candidate that is still fully
/// open (earlier placements may have closed it) and far enough from every
/// previously accepted seed.
fn draw_seed(
    grid: &CellGrid,
    decor: &DecorConfig,
    candidates: &[Pos],
    accepted: &[Pos],
    rng: &mut ChaCha8Rng,
) -> Option<Pos> {
    let spacing_sq = u64::from(decor.min_object_spacing) * u64::from(decor.min_object_spacing);
    for _ in 0..decor.max_iterations_per_object {
        let candidate = candidates[rng.random_range(0..candidates.len())];
        if !grid.open_3x3(candidate) {
            continue;
        }
        if accepted.iter().any(|prev| candidate.distance_sq(*prev) < spacing_sq) {
            continue;
        }
        return Some(candidate);
    }
    None
}

fn try_place_at(
    grid: &mut CellGrid,
    tiles: &mut TileGrid,
    seed: Pos,
    allowed: &[DecorObject],
    decor: &DecorConfig,
    rng: &mut ChaCha8Rng,
) -> Option<DecorPlacement> {
    for _ in 0..decor.object_tries_per_position {
        let object = allowed[rng.random_range(0..allowed.len())];
        if let Some(placement) = place_one(grid, tiles, object, seed, decor, rng) {
            return Some(placement);
        }
    }
    None
}

/// Builds and stamps a single instance of `object` seeded at `seed`.
fn place_one(
    grid: &mut CellGrid,
    tiles: &mut TileGrid,
    object: DecorObject,
    seed: Pos,
    decor: &DecorConfig,
    rng: &mut ChaCha8Rng,
) -> Option<DecorPlacement> {
    let cells = shapes::build_footprint(object, seed, grid, decor, rng)?;
    let sprite = decor_sprite(object);
    for cell in &cells {
        grid.set(*cell, CellKind::Object);
        tiles.set_overlay(*cell, sprite);
    }
    Some(DecorPlacement { object, sprite, cells })
}

/// Uniformly picks an open cell within Euclidean `reach` of `origin`, or
/// `None` when the whole vicinity is closed.
fn nearby_open_cell(
    grid: &CellGrid,
    origin: Pos,
    reach: u32,
    rng: &mut ChaCha8Rng,
) -> Option<Pos> {
    let span = reach as i32;
    let reach_sq = u64::from(reach) * u64::from(reach);
    let mut options = Vec::new();
    for dy in -span..=span {
        for dx in -span..=span {
            let pos = origin.offset(dy, dx);
            if pos.distance_sq(origin) <= reach_sq && grid.open_3x3(pos) {
                options.push(pos);
            }
        }
    }
    if options.is_empty() { None } else { Some(options[rng.random_range(0..options.len())]) }
}
