//! Walking-distance queries over a generated layout.
//!
//! Spot placement needs shortest-path lengths, not routes; the game wires in
//! its own provider backed by live collision data, while [`GridPathfinder`]
//! answers from the generated grid alone.

use std::collections::{BTreeMap, BTreeSet};

use crate::grid::CellGrid;
use crate::types::Pos;

/// Shortest-path provider used by spot placement.
pub trait Pathfinder {
    /// Steps from `start` to `goal`, excluding `start` itself. `None` when no
    /// route exists; an empty path means `start == goal`.
    fn find_path(&self, grid: &CellGrid, start: Pos, goal: Pos) -> Option<Vec<Pos>>;

    /// Walking distance in steps, `None` when unreachable.
    fn walking_distance(&self, grid: &CellGrid, start: Pos, goal: Pos) -> Option<u32> {
        self.find_path(grid, start, goal).map(|path| path.len() as u32)
    }
}

/// A* over the cell grid with unit step costs. Walkable means plain floor:
/// walls and decorative objects both block.
pub struct GridPathfinder;

impl Pathfinder for GridPathfinder {
    fn find_path(&self, grid: &CellGrid, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
        if !grid.is_floor(start) || !grid.is_floor(goal) {
            return None;
        }
        if start == goal {
            return Some(vec![]);
        }
        astar(grid, start, goal)
    }
}

/// Open-set entry ordered by f-score, then heuristic, then position, which
/// keeps expansion order (and thus returned paths) fully deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    f: u32,
    h: u32,
    y: i32,
    x: i32,
}

fn astar(grid: &CellGrid, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let h = start.manhattan(goal);
    open_set.insert(OpenNode { f: h, h, y: start.y, x: start.x });
    g_score.insert(start, 0);
    while let Some(node) = open_set.pop_first() {
        let current = Pos::new(node.y, node.x);
        if current == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }
        let current_g = *g_score.get(&current).expect("expanded node must have a g-score");
        for neighbor in current.orthogonal_neighbors() {
            if !grid.is_floor(neighbor) {
                continue;
            }
            let tentative = current_g + 1;
            if tentative < *g_score.get(&neighbor).unwrap_or(&u32::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                let h = neighbor.manhattan(goal);
                open_set.insert(OpenNode { f: tentative + h, h, y: neighbor.y, x: neighbor.x });
            }
        }
    }
    None
}

fn reconstruct_path(came_from: &BTreeMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut cursor = goal;
    let mut path = vec![cursor];
    while cursor != start {
        cursor = *came_from.get(&cursor).expect("path must be reconstructible");
        path.push(cursor);
    }
    path.reverse();
    path.remove(0);
    path
}
