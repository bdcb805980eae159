//! Cell and tile grids shared by every generation phase.

use serde::{Deserialize, Serialize};

use crate::types::{CellKind, Pos, TileId};

/// Rectangular grid of movement categories. All layout phases read and write
/// this one structure; sprite selection happens later on a [`TileGrid`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

impl CellGrid {
    pub fn filled(width: usize, height: usize, kind: CellKind) -> Self {
        Self { width, height, cells: vec![kind; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.y >= 0
            && pos.x >= 0
            && (pos.y as usize) < self.height
            && (pos.x as usize) < self.width
    }

    fn index(&self, pos: Pos) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }

    /// Category at `pos`. Out-of-bounds reads as `Wall`, which lets neighbor
    /// scans near the edge skip explicit bounds checks.
    pub fn get(&self, pos: Pos) -> CellKind {
        if self.in_bounds(pos) { self.cells[self.index(pos)] } else { CellKind::Wall }
    }

    /// Writes `kind` at `pos`. Out-of-bounds writes are dropped.
    pub fn set(&mut self, pos: Pos, kind: CellKind) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.cells[idx] = kind;
        }
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.get(pos).is_floor()
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// Every position in row-major order. The fixed order keeps scans (and
    /// therefore generation) deterministic.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width;
        (0..self.height)
            .flat_map(move |y| (0..width).map(move |x| Pos::new(y as i32, x as i32)))
    }

    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Number of floor cells among the eight surrounding cells. Cells beyond
    /// the edge count as not-floor.
    pub fn floor_neighbors8(&self, pos: Pos) -> usize {
        pos.moore_neighbors().into_iter().filter(|n| self.is_floor(*n)).count()
    }

    /// True when `pos` and all eight surrounding cells are plain floor.
    pub fn open_3x3(&self, pos: Pos) -> bool {
        self.is_floor(pos) && self.floor_neighbors8(pos) == 8
    }
}

/// Two-layer sprite grid: a ground tile everywhere plus an optional overlay
/// (decorative objects) above it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    ground: Vec<TileId>,
    overlay: Vec<Option<TileId>>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, ground: TileId) -> Self {
        Self {
            width,
            height,
            ground: vec![ground; width * height],
            overlay: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index_of(&self, pos: Pos) -> Option<usize> {
        if pos.y >= 0
            && pos.x >= 0
            && (pos.y as usize) < self.height
            && (pos.x as usize) < self.width
        {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    pub fn ground_at(&self, pos: Pos) -> Option<TileId> {
        self.index_of(pos).map(|idx| self.ground[idx])
    }

    pub fn overlay_at(&self, pos: Pos) -> Option<TileId> {
        self.index_of(pos).and_then(|idx| self.overlay[idx])
    }

    pub fn set_ground(&mut self, pos: Pos, id: TileId) {
        if let Some(idx) = self.index_of(pos) {
            self.ground[idx] = id;
        }
    }

    pub fn set_overlay(&mut self, pos: Pos, id: TileId) {
        if let Some(idx) = self.index_of(pos) {
            self.overlay[idx] = Some(id);
        }
    }

    pub fn ground(&self) -> &[TileId] {
        &self.ground
    }

    pub fn overlay(&self) -> &[Option<TileId>] {
        &self.overlay
    }
}
