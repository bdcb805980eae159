//! Content-spot position sampling.
//!
//! Reserves cells on the finished layout for gameplay content: minigames,
//! NPCs, books, teleporters and dungeon gates. All categories draw from the
//! same pool of walkable cells and never share a cell. Dungeon gates
//! additionally keep a walking distance (not a straight-line distance) from
//! world connections and from every other reserved spot, so sub-areas sit
//! away from where the player enters.

use std::collections::BTreeSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::SpotConfig;
use crate::grid::CellGrid;
use crate::path::Pathfinder;
use crate::types::{Pos, SpotKind, WorldConnection};

/// How many positions of each kind a generation request wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotPlan {
    pub minigames: usize,
    pub npcs: usize,
    pub books: usize,
    pub teleporters: usize,
    pub dungeon_gates: usize,
}

impl SpotPlan {
    pub fn count(&self, kind: SpotKind) -> usize {
        match kind {
            SpotKind::Minigame => self.minigames,
            SpotKind::Npc => self.npcs,
            SpotKind::Book => self.books,
            SpotKind::Teleporter => self.teleporters,
            SpotKind::DungeonGate => self.dungeon_gates,
        }
    }
}

/// Reserved positions per content category, in placement order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotPositions {
    pub minigames: Vec<Pos>,
    pub npcs: Vec<Pos>,
    pub books: Vec<Pos>,
    pub teleporters: Vec<Pos>,
    pub dungeon_gates: Vec<Pos>,
}

impl SpotPositions {
    pub fn of(&self, kind: SpotKind) -> &[Pos] {
        match kind {
            SpotKind::Minigame => &self.minigames,
            SpotKind::Npc => &self.npcs,
            SpotKind::Book => &self.books,
            SpotKind::Teleporter => &self.teleporters,
            SpotKind::DungeonGate => &self.dungeon_gates,
        }
    }

    fn of_mut(&mut self, kind: SpotKind) -> &mut Vec<Pos> {
        match kind {
            SpotKind::Minigame => &mut self.minigames,
            SpotKind::Npc => &mut self.npcs,
            SpotKind::Book => &mut self.books,
            SpotKind::Teleporter => &mut self.teleporters,
            SpotKind::DungeonGate => &mut self.dungeon_gates,
        }
    }

    /// Every reserved position with its category, in category order.
    pub fn iter_all(&self) -> impl Iterator<Item = (SpotKind, Pos)> + '_ {
        SpotKind::ALL
            .into_iter()
            .flat_map(move |kind| self.of(kind).iter().map(move |pos| (kind, *pos)))
    }

    pub fn total(&self) -> usize {
        SpotKind::ALL.into_iter().map(|kind| self.of(kind).len()).sum()
    }
}

/// Samples non-overlapping content-spot positions on a finished layout.
///
/// The generator is built once per layout, asked for each category in turn
/// and then consumed by [`finish`](Self::finish); its bookkeeping (which
/// cells are taken) does not outlive the handoff.
pub struct SpotPositionGenerator<'a, P: Pathfinder> {
    grid: &'a CellGrid,
    pathfinder: &'a P,
    config: &'a SpotConfig,
    connections: &'a [WorldConnection],
    open_cells: Vec<Pos>,
    used: BTreeSet<Pos>,
    positions: SpotPositions,
}

impl<'a, P: Pathfinder> SpotPositionGenerator<'a, P> {
    pub fn new(
        grid: &'a CellGrid,
        pathfinder: &'a P,
        config: &'a SpotConfig,
        connections: &'a [WorldConnection],
    ) -> Self {
        let open_cells = grid.positions().filter(|pos| grid.is_floor(*pos)).collect();
        Self {
            grid,
            pathfinder,
            config,
            connections,
            open_cells,
            used: BTreeSet::new(),
            positions: SpotPositions::default(),
        }
    }

    /// Replaces the positions of `kind` with up to `count` fresh draws.
    /// Cells held by other categories stay excluded; the old positions of
    /// this category are released first.
    pub fn generate_positions(&mut self, kind: SpotKind, count: usize, rng: &mut ChaCha8Rng) {
        for pos in std::mem::take(self.positions.of_mut(kind)) {
            self.used.remove(&pos);
        }
        for _ in 0..count {
            let placed = match kind {
                SpotKind::DungeonGate => self.place_dungeon_gate(rng),
                _ => self.draw_unused(rng),
            };
            if let Some(pos) = placed {
                self.used.insert(pos);
                self.positions.of_mut(kind).push(pos);
            }
        }
    }

    /// Hands the sampled positions off, dropping the bookkeeping.
    pub fn finish(self) -> SpotPositions {
        self.positions
    }

    /// Uniform draw over walkable cells, skipping cells any category already
    /// holds. `None` once the attempt budget runs out.
    fn draw_unused(&self, rng: &mut ChaCha8Rng) -> Option<Pos> {
        if self.open_cells.is_empty() {
            return None;
        }
        for _ in 0..self.config.sample_attempts {
            let candidate = self.open_cells[rng.random_range(0..self.open_cells.len())];
            if !self.used.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Dungeon gates keep their distance from world connections and from
    /// every placed spot. When no draw satisfies the constraints the last
    /// draw is kept anyway: a crowded map still gets its gate.
    fn place_dungeon_gate(&self, rng: &mut ChaCha8Rng) -> Option<Pos> {
        let mut kept = None;
        for _ in 0..self.config.dungeon_gate_attempts {
            let Some(candidate) = self.draw_unused(rng) else {
                break;
            };
            kept = Some(candidate);
            if self.gate_constraints_hold(candidate) {
                break;
            }
        }
        kept
    }

    fn gate_constraints_hold(&self, candidate: Pos) -> bool {
        let connections = self.connections.iter().map(|connection| connection.pos);
        if !self.all_at_distance(candidate, connections, self.config.min_dungeon_distance) {
            return false;
        }
        let spots = self.positions.iter_all().map(|(_, pos)| pos);
        self.all_at_distance(candidate, spots, self.config.min_spot_distance)
    }

    /// True when every target is at least `min` walking steps away.
    /// Unreachable targets pass: no route means no crowding.
    fn all_at_distance(&self, from: Pos, targets: impl Iterator<Item = Pos>, min: u32) -> bool {
        for target in targets {
            if let Some(distance) = self.pathfinder.walking_distance(self.grid, from, target) {
                if distance < min {
                    return false;
                }
            }
        }
        true
    }
}
