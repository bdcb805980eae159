//! Layout strategies and the shared carving phases they all run through.
//!
//! Every strategy produces a rough floor mass inside the solid border ring;
//! the shared phases then dissolve noise regions, carve world-connection
//! channels, join every room into one walkable component and thin out
//! one-cell wall slivers.

mod cellular;
mod drunkard;
mod islands;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::config::GenConfig;
use crate::grid::CellGrid;
use crate::region;
use crate::types::{CellKind, Pos, WorldConnection};

/// Strategy used for the initial rough floor mass. All of them feed the same
/// shared phases afterwards, so they only differ in the texture of the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    CellularAutomata,
    DrunkardsWalk,
    IslandCellularAutomata,
    IslandDrunkardsWalk,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 4] = [
        LayoutAlgorithm::CellularAutomata,
        LayoutAlgorithm::DrunkardsWalk,
        LayoutAlgorithm::IslandCellularAutomata,
        LayoutAlgorithm::IslandDrunkardsWalk,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutAlgorithm::CellularAutomata => "cellular_automata",
            LayoutAlgorithm::DrunkardsWalk => "drunkards_walk",
            LayoutAlgorithm::IslandCellularAutomata => "island_cellular_automata",
            LayoutAlgorithm::IslandDrunkardsWalk => "island_drunkards_walk",
        }
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        LayoutAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == raw)
            .ok_or_else(|| format!("unknown layout algorithm `{raw}`"))
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shared inputs for one layout run.
pub(crate) struct LayoutContext<'a> {
    pub config: &'a GenConfig,
    pub width: usize,
    pub height: usize,
    /// Percentage of the interior aimed at being walkable.
    pub accessibility: u8,
}

impl LayoutContext<'_> {
    fn border(&self) -> i32 {
        self.config.border_thickness as i32
    }

    /// True for cells strictly inside the border ring. Only these cells may
    /// ever change category during layout.
    pub(crate) fn is_interior(&self, pos: Pos) -> bool {
        let b = self.border();
        pos.y >= b
            && pos.x >= b
            && pos.y < self.height as i32 - b
            && pos.x < self.width as i32 - b
    }

    /// Interior cells in row-major order.
    pub(crate) fn interior_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let b = self.border();
        let max_y = self.height as i32 - b;
        let max_x = self.width as i32 - b;
        (b..max_y).flat_map(move |y| (b..max_x).map(move |x| Pos::new(y, x)))
    }

    pub(crate) fn interior_area(&self) -> usize {
        self.config
            .interior_span(self.width, self.height)
            .map_or(0, |(w, h)| w * h)
    }

    fn center(&self) -> Pos {
        Pos::new(self.height as i32 / 2, self.width as i32 / 2)
    }
}

/// Runs the requested strategy plus every shared phase. The returned grid is
/// fully connected: every floor cell, including carved connection channels,
/// belongs to one component.
pub(crate) fn build_layout(
    algorithm: LayoutAlgorithm,
    ctx: &LayoutContext<'_>,
    connections: &[WorldConnection],
    rng: &mut ChaCha8Rng,
) -> CellGrid {
    let mut grid = match algorithm {
        LayoutAlgorithm::CellularAutomata => cellular::carve(ctx, rng),
        LayoutAlgorithm::DrunkardsWalk => drunkard::carve(ctx, rng),
        LayoutAlgorithm::IslandCellularAutomata => islands::carve_cellular(ctx, rng),
        LayoutAlgorithm::IslandDrunkardsWalk => islands::carve_drunkard(ctx, rng),
    };
    dissolve_noise_regions(&mut grid, ctx);
    ensure_some_floor(&mut grid, ctx);
    carve_connection_channels(&mut grid, ctx, connections);
    connect_rooms(&mut grid, ctx);
    erode_wall_slivers(&mut grid, ctx);
    grid
}

/// Removes flood-fill noise: wall pockets too small to read as obstacles
/// dissolve into floor, floor pockets too small to be rooms are sealed.
/// Wall regions touching the border ring are never dissolved.
fn dissolve_noise_regions(grid: &mut CellGrid, ctx: &LayoutContext<'_>) {
    let regions = region::extract_regions(grid);
    for found in &regions {
        let replacement = match found.kind {
            CellKind::Wall
                if found.len() < ctx.config.min_wall_region
                    && found.cells.iter().all(|pos| ctx.is_interior(*pos)) =>
            {
                CellKind::Floor
            }
            CellKind::Floor if found.len() < ctx.config.min_floor_region => CellKind::Wall,
            _ => continue,
        };
        for pos in &found.cells {
            grid.set(*pos, replacement);
        }
    }
}

/// Degenerate inputs (accessibility near zero, heavy smoothing on small
/// grids) can leave no floor at all. Carve a small centered room so the
/// remaining phases always have something to connect.
fn ensure_some_floor(grid: &mut CellGrid, ctx: &LayoutContext<'_>) {
    if grid.count(CellKind::Floor) > 0 {
        return;
    }
    log::warn!(
        "layout left no floor on a {}x{} grid; carving a fallback room",
        ctx.width,
        ctx.height
    );
    let center = ctx.center();
    let reach = 4;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let pos = center.offset(dy, dx);
            if ctx.is_interior(pos) {
                grid.set(pos, CellKind::Floor);
            }
        }
    }
}

/// Opens a channel through the border ring for every world connection:
/// `border_thickness` cells deep and `2 * half_width + 1` cells wide,
/// perpendicular to the edge the connection sits on.
fn carve_connection_channels(
    grid: &mut CellGrid,
    ctx: &LayoutContext<'_>,
    connections: &[WorldConnection],
) {
    let depth_max = ctx.border();
    let half_width = ctx.config.connection_half_width as i32;
    let right = ctx.width as i32 - 1;
    let bottom = ctx.height as i32 - 1;
    for connection in connections {
        let pos = connection.pos;
        for depth in 0..depth_max {
            for offset in -half_width..=half_width {
                let cell = if pos.x == 0 {
                    Pos::new(pos.y + offset, depth)
                } else if pos.x == right {
                    Pos::new(pos.y + offset, right - depth)
                } else if pos.y == 0 {
                    Pos::new(depth, pos.x + offset)
                } else {
                    Pos::new(bottom - depth, pos.x + offset)
                };
                grid.set(cell, CellKind::Floor);
            }
        }
    }
}

new_key_type! {
    struct RoomKey;
}

struct Room {
    size: usize,
    border: Vec<Pos>,
}

/// A candidate corridor from one room's border cell to another's.
#[derive(Clone, Copy)]
struct Link {
    target: RoomKey,
    from: Pos,
    to: Pos,
    distance_sq: u64,
}

/// Joins every floor region into a single component. Starting from the
/// largest room, the nearest still-unconnected room is attached one at a
/// time. Each connected room caches its nearest answer and only recomputes
/// it once that answer has been absorbed, so corridors follow a good (not
/// necessarily optimal) spanning tree.
fn connect_rooms(grid: &mut CellGrid, ctx: &LayoutContext<'_>) {
    let mut rooms: SlotMap<RoomKey, Room> = SlotMap::with_key();
    for found in region::extract_regions(grid) {
        if found.kind != CellKind::Floor {
            continue;
        }
        rooms.insert(Room { size: found.len(), border: found.border });
    }
    if rooms.len() <= 1 {
        return;
    }

    let mut seed_room: Option<RoomKey> = None;
    for (key, room) in &rooms {
        let bigger = match seed_room {
            None => true,
            Some(current) => room.size > rooms[current].size,
        };
        if bigger {
            seed_room = Some(key);
        }
    }
    let seed_room = seed_room.expect("rooms is non-empty");

    let mut connected: Vec<RoomKey> = vec![seed_room];
    let mut pending: BTreeSet<RoomKey> =
        rooms.keys().filter(|key| *key != seed_room).collect();
    let mut nearest_cache: BTreeMap<RoomKey, Link> = BTreeMap::new();

    while !pending.is_empty() {
        let mut best: Option<Link> = None;
        for &source in &connected {
            let link = match nearest_cache.get(&source) {
                Some(cached) if pending.contains(&cached.target) => *cached,
                _ => {
                    let Some(link) = nearest_pending_link(&rooms, source, &pending) else {
                        continue;
                    };
                    nearest_cache.insert(source, link);
                    link
                }
            };
            let closer = match best {
                None => true,
                Some(current) => link.distance_sq < current.distance_sq,
            };
            if closer {
                best = Some(link);
            }
        }
        let Some(link) = best else {
            break;
        };
        carve_corridor(grid, ctx, link.from, link.to);
        pending.remove(&link.target);
        connected.push(link.target);
    }
}

/// Closest border-cell pair between `source` and any pending room. Ties keep
/// the first hit in scan order, so the result is stable.
fn nearest_pending_link(
    rooms: &SlotMap<RoomKey, Room>,
    source: RoomKey,
    pending: &BTreeSet<RoomKey>,
) -> Option<Link> {
    let mut best: Option<Link> = None;
    for &target in pending {
        for &from in &rooms[source].border {
            for &to in &rooms[target].border {
                let distance_sq = from.distance_sq(to);
                let closer = match best {
                    None => true,
                    Some(current) => distance_sq < current.distance_sq,
                };
                if closer {
                    best = Some(Link { target, from, to, distance_sq });
                }
            }
        }
    }
    best
}

/// Carves a wide corridor by stamping a filled disc at every cell of the
/// line between the two endpoints. Stamping is clamped to the interior so
/// corridors can approach carved channels without breaching the ring.
fn carve_corridor(grid: &mut CellGrid, ctx: &LayoutContext<'_>, from: Pos, to: Pos) {
    let radius = ctx.config.corridor_radius as i32;
    for point in line_points(from, to) {
        stamp_floor_disc(grid, ctx, point, radius);
    }
}

fn stamp_floor_disc(grid: &mut CellGrid, ctx: &LayoutContext<'_>, center: Pos, radius: i32) {
    let radius_sq = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dy * dy + dx * dx > radius_sq {
                continue;
            }
            let cell = center.offset(dy, dx);
            if ctx.is_interior(cell) {
                grid.set(cell, CellKind::Floor);
            }
        }
    }
}

/// All cells of the line from `from` to `to`, both endpoints included.
fn line_points(from: Pos, to: Pos) -> Vec<Pos> {
    let mut points = Vec::new();
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step_x = if from.x < to.x { 1 } else { -1 };
    let step_y = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = from.x;
    let mut y = from.y;
    loop {
        points.push(Pos::new(y, x));
        if x == to.x && y == to.y {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += step_x;
        }
        if doubled <= dx {
            err += dx;
            y += step_y;
        }
    }
    points
}

/// Opens interior wall cells that are not braced by a wall neighbor on both
/// axes. One-cell spurs and thin lines left between overlapping corridors
/// read as noise; each sweep only removes wall, so the loop reaches a fixed
/// point.
fn erode_wall_slivers(grid: &mut CellGrid, ctx: &LayoutContext<'_>) {
    loop {
        let mut changed = false;
        for pos in ctx.interior_positions() {
            if grid.get(pos) != CellKind::Wall {
                continue;
            }
            let horizontal = grid.get(pos.offset(0, -1)) == CellKind::Wall
                || grid.get(pos.offset(0, 1)) == CellKind::Wall;
            let vertical = grid.get(pos.offset(-1, 0)) == CellKind::Wall
                || grid.get(pos.offset(1, 0)) == CellKind::Wall;
            if !(horizontal && vertical) {
                grid.set(pos, CellKind::Floor);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}
