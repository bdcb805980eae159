//! Flood-fill region extraction over the cell grid.

use std::collections::VecDeque;

use crate::grid::CellGrid;
use crate::types::{CellKind, Pos};

/// A maximal 4-connected patch of same-category cells.
#[derive(Clone, Debug)]
pub struct Region {
    pub kind: CellKind,
    /// Member cells in discovery order, deterministic for a given grid.
    pub cells: Vec<Pos>,
    /// Member cells with at least one in-bounds orthogonal neighbor of a
    /// different category.
    pub border: Vec<Pos>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Extracts every region of every category, ordered by the row-major
/// position of each region's first discovered cell.
pub fn extract_regions(grid: &CellGrid) -> Vec<Region> {
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut regions = Vec::new();
    for start in grid.positions() {
        if visited[cell_index(grid, start)] {
            continue;
        }
        visited[cell_index(grid, start)] = true;
        regions.push(flood_from(grid, start, &mut visited));
    }
    regions
}

/// Index of the largest region of `kind`. Earlier scan order wins ties, so
/// the answer is stable for a given grid.
pub fn largest_of_kind(regions: &[Region], kind: CellKind) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, region) in regions.iter().enumerate() {
        if region.kind != kind {
            continue;
        }
        let replace = match best {
            None => true,
            Some(current) => region.len() > regions[current].len(),
        };
        if replace {
            best = Some(idx);
        }
    }
    best
}

fn cell_index(grid: &CellGrid, pos: Pos) -> usize {
    pos.y as usize * grid.width() + pos.x as usize
}

fn flood_from(grid: &CellGrid, start: Pos, visited: &mut [bool]) -> Region {
    let kind = grid.get(start);
    let mut cells = Vec::new();
    let mut border = Vec::new();
    let mut queue = VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        cells.push(pos);
        let mut on_border = false;
        for neighbor in pos.orthogonal_neighbors() {
            if !grid.in_bounds(neighbor) {
                continue;
            }
            if grid.get(neighbor) != kind {
                on_border = true;
                continue;
            }
            let idx = cell_index(grid, neighbor);
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(neighbor);
            }
        }
        if on_border {
            border.push(pos);
        }
    }
    Region { kind, cells, border }
}
