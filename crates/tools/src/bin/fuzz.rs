//! Generation fuzz harness: sweeps seeds, styles and algorithms, generates
//! each area twice and checks the invariants the rest of the game relies on.

use std::collections::BTreeSet;

use anyhow::Result;
use clap::Parser;
use gridloom_core::{
    AreaGenerator, AreaRequest, CellGrid, CellKind, ConnectionRole, GenConfig, GeneratedArea,
    LayoutAlgorithm, Pos, SpotPlan, Style, WorldConnection,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 100)]
    runs: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Fuzzing {} generation runs from base seed {}...", args.runs, args.seed);
    let generator = AreaGenerator::with_defaults();
    for run in 0..args.runs {
        let style = Style::ALL[run as usize % Style::ALL.len()];
        let algorithm =
            LayoutAlgorithm::ALL[(run as usize / Style::ALL.len()) % LayoutAlgorithm::ALL.len()];
        let accessibility = 30 + ((args.seed + u64::from(run) * 7) % 51) as u8;
        let request = AreaRequest {
            seed: format!("fuzz-{}-{run}", args.seed),
            width: 52,
            height: 44,
            accessibility,
            style,
            algorithm,
            world_connections: vec![
                WorldConnection::new(Pos::new(22, 0), "west", ConnectionRole::Entry),
                WorldConnection::new(Pos::new(0, 26), "north", ConnectionRole::Exit),
            ],
            spots: SpotPlan { minigames: 2, npcs: 2, books: 1, teleporters: 1, dungeon_gates: 1 },
        };

        let area = generator.generate(&request)?;
        let again = generator.generate(&request)?;
        assert_eq!(
            area.canonical_bytes(),
            again.canonical_bytes(),
            "run {run}: generation must be reproducible"
        );

        for connection in &request.world_connections {
            assert!(
                area.cells.is_floor(connection.pos),
                "run {run}: connection anchor {} must be open",
                connection.pos
            );
        }
        assert_single_floor_component(&area.cells);
        assert_ring_sealed(&area.cells, generator.config(), &request.world_connections);
        assert_spots_distinct(&area);
        assert_decor_consistent(&area);
    }
    println!("Fuzzing completed successfully.");
    Ok(())
}

/// Flood fill from the first floor cell; every floor cell must be reached.
fn assert_single_floor_component(grid: &CellGrid) {
    let first = grid.positions().find(|pos| grid.is_floor(*pos)).expect("area has floor");
    let mut seen = BTreeSet::new();
    let mut frontier = vec![first];
    seen.insert(first);
    while let Some(pos) = frontier.pop() {
        for next in pos.orthogonal_neighbors() {
            if grid.is_floor(next) && seen.insert(next) {
                frontier.push(next);
            }
        }
    }
    let floor = grid.positions().filter(|pos| grid.is_floor(*pos)).count();
    assert_eq!(seen.len(), floor, "floor must form one connected component");
}

/// Ring cells must be wall except inside a carved connection channel.
fn assert_ring_sealed(grid: &CellGrid, config: &GenConfig, connections: &[WorldConnection]) {
    let border = config.border_thickness as i32;
    let half = config.connection_half_width as i32;
    for pos in grid.positions() {
        let in_ring = pos.y < border
            || pos.x < border
            || pos.y >= grid.height() as i32 - border
            || pos.x >= grid.width() as i32 - border;
        if !in_ring || grid.get(pos) == CellKind::Wall {
            continue;
        }
        assert!(
            connections.iter().any(|connection| in_channel(grid, border, half, connection, pos)),
            "non-wall ring cell {pos} outside every connection channel"
        );
    }
}

fn in_channel(
    grid: &CellGrid,
    border: i32,
    half: i32,
    connection: &WorldConnection,
    pos: Pos,
) -> bool {
    let right = grid.width() as i32 - 1;
    let bottom = grid.height() as i32 - 1;
    let anchor = connection.pos;
    if anchor.x == 0 {
        pos.x < border && (pos.y - anchor.y).abs() <= half
    } else if anchor.x == right {
        pos.x > right - border && (pos.y - anchor.y).abs() <= half
    } else if anchor.y == 0 {
        pos.y < border && (pos.x - anchor.x).abs() <= half
    } else {
        pos.y > bottom - border && (pos.x - anchor.x).abs() <= half
    }
}

fn assert_spots_distinct(area: &GeneratedArea) {
    let mut seen = BTreeSet::new();
    for (kind, pos) in area.spots.iter_all() {
        assert!(area.cells.is_floor(pos), "{} spot at {pos} must be walkable", kind.name());
        assert!(seen.insert(pos), "{} spot at {pos} collides with another spot", kind.name());
    }
}

fn assert_decor_consistent(area: &GeneratedArea) {
    for pos in area.cells.positions() {
        assert_eq!(
            area.tiles.overlay_at(pos).is_some(),
            area.cells.get(pos) == CellKind::Object,
            "overlay must coincide with object cells at {pos}"
        );
    }
}
