//! Footprint construction for each decorative object family.
//!
//! Every builder returns the set of cells one object instance would occupy,
//! or `None` when no fitting footprint exists around the seed cell. Builders
//! only read the grid; stamping happens in the placement driver.

use std::collections::BTreeSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::DecorConfig;
use crate::grid::CellGrid;
use crate::types::{DecorObject, Pos};

/// Blob shapes stop growing at this many cells regardless of expand chance.
const MAX_BLOB_CELLS: usize = 12;
/// Chain shapes without their own length cap stop here.
const MAX_CHAIN_CELLS: usize = 16;

const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Builds the cells an instance of `object` would cover when seeded at
/// `seed`, sorted row-major. `None` when nothing fits there.
pub(super) fn build_footprint(
    object: DecorObject,
    seed: Pos,
    grid: &CellGrid,
    decor: &DecorConfig,
    rng: &mut ChaCha8Rng,
) -> Option<Vec<Pos>> {
    let cells = match object {
        DecorObject::SmallStone | DecorObject::Stump => fixed_rect(grid, seed, 1, 1)?,
        DecorObject::Grave => fixed_rect(grid, seed, 1, 2)?,
        DecorObject::SmallHouse => fixed_rect(grid, seed, 2, 2)?,
        DecorObject::BigHouse => fixed_rect(grid, seed, 3, 3)?,
        DecorObject::Barrel => vertical_pair(grid, seed)?,
        DecorObject::BigStone => grown_blob(grid, seed, decor.big_stone_expand_chance, rng)?,
        DecorObject::Tree => grown_blob(grid, seed, decor.tree_expand_chance, rng)?,
        DecorObject::Bush => {
            grown_chain(grid, seed, decor.bush_expand_chance, MAX_CHAIN_CELLS, rng)?
        }
        DecorObject::Fence => {
            grown_chain(grid, seed, decor.fence_expand_chance, MAX_CHAIN_CELLS, rng)?
        }
        DecorObject::Log => {
            grown_chain(grid, seed, decor.log_expand_chance, decor.max_log_length, rng)?
        }
    };
    Some(cells.into_iter().collect())
}

/// A footprint fits when every cell is open floor and the one-cell buffer
/// around it is floor as well, so objects never butt against walls, the grid
/// edge or each other.
fn footprint_clear(grid: &CellGrid, cells: &BTreeSet<Pos>) -> bool {
    cells.iter().all(|cell| {
        grid.is_floor(*cell)
            && cell
                .moore_neighbors()
                .into_iter()
                .all(|n| cells.contains(&n) || grid.is_floor(n))
    })
}

fn member_neighbors(cells: &BTreeSet<Pos>, pos: Pos) -> usize {
    pos.orthogonal_neighbors().into_iter().filter(|n| cells.contains(n)).count()
}

/// Scans every anchor that keeps `seed` inside a `w` by `h` rectangle and
/// returns the first placement that fits.
fn fixed_rect(grid: &CellGrid, seed: Pos, w: i32, h: i32) -> Option<BTreeSet<Pos>> {
    for dy in 0..h {
        for dx in 0..w {
            let anchor = seed.offset(-dy, -dx);
            let cells: BTreeSet<Pos> = (0..h)
                .flat_map(|ry| (0..w).map(move |rx| anchor.offset(ry, rx)))
                .collect();
            if footprint_clear(grid, &cells) {
                return Some(cells);
            }
        }
    }
    None
}

/// Barrel footprint: the seed plus the cell above it, falling back to the
/// cell below.
fn vertical_pair(grid: &CellGrid, seed: Pos) -> Option<BTreeSet<Pos>> {
    for dy in [-1, 1] {
        let cells: BTreeSet<Pos> = [seed, seed.offset(dy, 0)].into_iter().collect();
        if footprint_clear(grid, &cells) {
            return Some(cells);
        }
    }
    None
}

/// Organic blob: a 2x2 core grown by vertical-plus-diagonal cell pairs. Each
/// new cell may touch the existing mass at no more than one orthogonal
/// member, which keeps the outline lumpy instead of square.
fn grown_blob(
    grid: &CellGrid,
    seed: Pos,
    expand_chance: f64,
    rng: &mut ChaCha8Rng,
) -> Option<BTreeSet<Pos>> {
    let mut cells = blob_core(grid, seed)?;
    while cells.len() + 2 <= MAX_BLOB_CELLS && rng.random_bool(expand_chance) {
        let options = blob_extensions(grid, &cells);
        if options.is_empty() {
            break;
        }
        let (straight, diagonal) = options[rng.random_range(0..options.len())];
        cells.insert(straight);
        cells.insert(diagonal);
    }
    Some(cells)
}

fn blob_core(grid: &CellGrid, seed: Pos) -> Option<BTreeSet<Pos>> {
    for dy in 0..2 {
        for dx in 0..2 {
            let anchor = seed.offset(-dy, -dx);
            let cells: BTreeSet<Pos> = (0..2)
                .flat_map(|ry| (0..2).map(move |rx| anchor.offset(ry, rx)))
                .collect();
            if footprint_clear(grid, &cells) {
                return Some(cells);
            }
        }
    }
    None
}

fn blob_extensions(grid: &CellGrid, cells: &BTreeSet<Pos>) -> Vec<(Pos, Pos)> {
    let mut options = Vec::new();
    for member in cells {
        for (dy, dx) in DIAGONALS {
            let straight = member.offset(dy, 0);
            let diagonal = member.offset(dy, dx);
            let pair = (straight, diagonal);
            if cells.contains(&straight) || cells.contains(&diagonal) || options.contains(&pair) {
                continue;
            }
            if member_neighbors(cells, straight) > 1 || member_neighbors(cells, diagonal) > 1 {
                continue;
            }
            let mut extended = cells.clone();
            extended.insert(straight);
            extended.insert(diagonal);
            if footprint_clear(grid, &extended) {
                options.push(pair);
            }
        }
    }
    options
}

/// Chain shape: a single seed cell extended step by step from its loose
/// ends. A new cell may only touch the chain at one member, so the shape
/// stays a line that can bend but never thicken or close a loop.
fn grown_chain(
    grid: &CellGrid,
    seed: Pos,
    expand_chance: f64,
    max_len: usize,
    rng: &mut ChaCha8Rng,
) -> Option<BTreeSet<Pos>> {
    let mut cells: BTreeSet<Pos> = [seed].into_iter().collect();
    if !footprint_clear(grid, &cells) {
        return None;
    }
    while cells.len() < max_len && rng.random_bool(expand_chance) {
        let options = chain_extensions(grid, &cells);
        if options.is_empty() {
            break;
        }
        cells.insert(options[rng.random_range(0..options.len())]);
    }
    Some(cells)
}

fn chain_extensions(grid: &CellGrid, cells: &BTreeSet<Pos>) -> Vec<Pos> {
    let mut options = Vec::new();
    for member in cells {
        // Only the loose ends of the chain may grow.
        if member_neighbors(cells, *member) > 1 {
            continue;
        }
        for candidate in member.orthogonal_neighbors() {
            if cells.contains(&candidate)
                || options.contains(&candidate)
                || member_neighbors(cells, candidate) != 1
            {
                continue;
            }
            let mut extended = cells.clone();
            extended.insert(candidate);
            if footprint_clear(grid, &extended) {
                options.push(candidate);
            }
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::types::CellKind;

    fn open_grid(width: usize, height: usize) -> CellGrid {
        let mut grid = CellGrid::filled(width, height, CellKind::Floor);
        for pos in grid.positions().collect::<Vec<_>>() {
            if pos.y == 0
                || pos.x == 0
                || pos.y == height as i32 - 1
                || pos.x == width as i32 - 1
            {
                grid.set(pos, CellKind::Wall);
            }
        }
        grid
    }

    fn rng(n: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(n)
    }

    #[test]
    fn small_stone_is_a_single_cell() {
        let grid = open_grid(10, 10);
        let cells =
            build_footprint(DecorObject::SmallStone, Pos::new(4, 4), &grid, &DecorConfig::default(), &mut rng(1))
                .expect("open center fits a stone");
        assert_eq!(cells, vec![Pos::new(4, 4)]);
    }

    #[test]
    fn grave_takes_two_cells_in_a_column() {
        let grid = open_grid(10, 10);
        let cells =
            build_footprint(DecorObject::Grave, Pos::new(4, 4), &grid, &DecorConfig::default(), &mut rng(1))
                .expect("open center fits a grave");
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].x, cells[1].x, "grave cells share a column");
        assert_eq!(cells[1].y - cells[0].y, 1);
    }

    #[test]
    fn big_house_shifts_its_anchor_to_fit() {
        let grid = open_grid(12, 12);
        // Seeded near the bottom-right wall: the 3x3 block plus its buffer
        // only fits once the anchor slides up and left.
        let cells =
            build_footprint(DecorObject::BigHouse, Pos::new(9, 9), &grid, &DecorConfig::default(), &mut rng(1))
                .expect("anchor scan finds room");
        assert_eq!(cells.len(), 9);
        for cell in &cells {
            assert!(
                (7..=9).contains(&cell.y) && (7..=9).contains(&cell.x),
                "footprint kept its buffer off the wall: {cell}"
            );
        }
        assert!(cells.contains(&Pos::new(9, 9)), "footprint still covers the seed");
    }

    #[test]
    fn big_house_rejects_a_cramped_seed() {
        let grid = open_grid(6, 6);
        // A 6x6 grid with a wall ring has a 4x4 interior; the 3x3 house plus
        // its buffer needs 5x5.
        let result = build_footprint(
            DecorObject::BigHouse,
            Pos::new(2, 2),
            &grid,
            &DecorConfig::default(),
            &mut rng(1),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn barrel_prefers_upward_and_falls_back_downward() {
        let grid = open_grid(10, 10);
        let up = build_footprint(DecorObject::Barrel, Pos::new(5, 5), &grid, &DecorConfig::default(), &mut rng(1))
            .expect("barrel fits");
        assert_eq!(up, vec![Pos::new(4, 5), Pos::new(5, 5)]);

        let mut blocked = open_grid(10, 10);
        blocked.set(Pos::new(3, 5), CellKind::Wall);
        let down =
            build_footprint(DecorObject::Barrel, Pos::new(5, 5), &blocked, &DecorConfig::default(), &mut rng(1))
                .expect("barrel falls back downward");
        assert_eq!(down, vec![Pos::new(5, 5), Pos::new(6, 5)]);
    }

    #[test]
    fn blob_growth_respects_its_cap() {
        let grid = open_grid(30, 30);
        let decor = DecorConfig { big_stone_expand_chance: 1.0, ..DecorConfig::default() };
        for n in 0..8 {
            let cells =
                build_footprint(DecorObject::BigStone, Pos::new(14, 14), &grid, &decor, &mut rng(n))
                    .expect("open field fits a blob");
            assert!(cells.len() >= 4, "blob keeps its 2x2 core");
            assert!(cells.len() <= MAX_BLOB_CELLS);
            assert_eq!(cells.len() % 2, 0, "blob grows in pairs");
        }
    }

    #[test]
    fn chains_never_thicken() {
        let grid = open_grid(30, 30);
        let decor = DecorConfig { fence_expand_chance: 1.0, ..DecorConfig::default() };
        for n in 0..8 {
            let cells =
                build_footprint(DecorObject::Fence, Pos::new(14, 14), &grid, &decor, &mut rng(n))
                    .expect("open field fits a fence");
            assert!(cells.len() <= MAX_CHAIN_CELLS);
            let set: BTreeSet<Pos> = cells.iter().copied().collect();
            for cell in &cells {
                assert!(
                    member_neighbors(&set, *cell) <= 2,
                    "cell {cell} has more than two chain neighbors"
                );
            }
        }
    }

    #[test]
    fn logs_honor_the_configured_length_cap() {
        let grid = open_grid(30, 30);
        let decor =
            DecorConfig { log_expand_chance: 1.0, max_log_length: 4, ..DecorConfig::default() };
        for n in 0..8 {
            let cells = build_footprint(DecorObject::Log, Pos::new(14, 14), &grid, &decor, &mut rng(n))
                .expect("open field fits a log");
            assert!(cells.len() <= 4, "log of {} cells exceeds its cap", cells.len());
        }
    }

    #[test]
    fn footprints_always_keep_a_floor_buffer() {
        let grid = open_grid(24, 24);
        let decor = DecorConfig::default();
        let objects = [
            DecorObject::SmallStone,
            DecorObject::BigStone,
            DecorObject::Tree,
            DecorObject::Bush,
            DecorObject::Fence,
            DecorObject::Log,
            DecorObject::Barrel,
            DecorObject::Grave,
            DecorObject::SmallHouse,
            DecorObject::BigHouse,
        ];
        for (n, object) in objects.into_iter().enumerate() {
            let cells = build_footprint(object, Pos::new(11, 11), &grid, &decor, &mut rng(n as u64))
                .unwrap_or_else(|| panic!("{} fits an open field", object.name()));
            let set: BTreeSet<Pos> = cells.iter().copied().collect();
            for cell in &cells {
                for neighbor in cell.moore_neighbors() {
                    assert!(
                        set.contains(&neighbor) || grid.is_floor(neighbor),
                        "{} touches a non-floor cell at {neighbor}",
                        object.name()
                    );
                }
            }
        }
    }

    #[test]
    fn growth_is_deterministic_per_rng_seed() {
        let grid = open_grid(30, 30);
        let decor = DecorConfig::default();
        let a = build_footprint(DecorObject::Tree, Pos::new(15, 15), &grid, &decor, &mut rng(9));
        let b = build_footprint(DecorObject::Tree, Pos::new(15, 15), &grid, &decor, &mut rng(9));
        assert_eq!(a, b);
    }
}
