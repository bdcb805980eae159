//! Command-line area preview: generates one area and prints it as ASCII art
//! or JSON. Handy for eyeballing seeds and tuning config values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gridloom_core::{
    AreaGenerator, AreaRequest, CellKind, ConnectionRole, GenConfig, GeneratedArea,
    LayoutAlgorithm, Pos, SpotKind, SpotPlan, Style, WorldConnection,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed string the area is generated from
    #[arg(short, long, default_value = "gridloom")]
    seed: String,
    #[arg(long, default_value_t = 60)]
    width: usize,
    #[arg(long, default_value_t = 40)]
    height: usize,
    /// Percentage of the interior aimed at being walkable (0-100)
    #[arg(short, long, default_value_t = 50)]
    accessibility: u8,
    /// Tile palette: cave, savanna, beach or forest
    #[arg(long, default_value = "cave")]
    style: Style,
    /// Carving strategy, e.g. cellular_automata or drunkards_walk
    #[arg(long, default_value = "cellular_automata")]
    algorithm: LayoutAlgorithm,
    #[arg(long, default_value_t = 0)]
    minigames: usize,
    #[arg(long, default_value_t = 0)]
    npcs: usize,
    #[arg(long, default_value_t = 0)]
    books: usize,
    #[arg(long, default_value_t = 0)]
    teleporters: usize,
    #[arg(long, default_value_t = 0)]
    dungeon_gates: usize,
    /// World connection as `Y,X` or `Y,X,TARGET`; may be repeated
    #[arg(long = "connection", value_name = "Y,X[,TARGET]")]
    connections: Vec<String>,
    /// TOML file overriding the default generation config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit the full area as JSON instead of an ASCII preview
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GenConfig::load(path)?,
        None => GenConfig::default(),
    };
    let world_connections = args
        .connections
        .iter()
        .map(|raw| parse_connection(raw))
        .collect::<Result<Vec<_>>>()?;

    let request = AreaRequest {
        seed: args.seed.clone(),
        width: args.width,
        height: args.height,
        accessibility: args.accessibility,
        style: args.style,
        algorithm: args.algorithm,
        world_connections,
        spots: SpotPlan {
            minigames: args.minigames,
            npcs: args.npcs,
            books: args.books,
            teleporters: args.teleporters,
            dungeon_gates: args.dungeon_gates,
        },
    };
    let generator = AreaGenerator::new(config)?;
    let area = generator.generate(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&area).context("failed to encode area")?);
    } else {
        print!("{}", render_ascii(&area));
        println!(
            "{}x{} {} | {} floor cells, {} objects, {} spots",
            area.width(),
            area.height(),
            area.style,
            area.cells.count(CellKind::Floor),
            area.decor.len(),
            area.spots.total()
        );
    }
    Ok(())
}

/// Parses `Y,X` or `Y,X,TARGET` into a world connection.
fn parse_connection(raw: &str) -> Result<WorldConnection> {
    let mut parts = raw.splitn(3, ',').map(str::trim);
    let y: i32 = parts
        .next()
        .filter(|part| !part.is_empty())
        .with_context(|| format!("connection `{raw}` must look like Y,X"))?
        .parse()
        .with_context(|| format!("bad row in connection `{raw}`"))?;
    let x: i32 = parts
        .next()
        .with_context(|| format!("connection `{raw}` must look like Y,X"))?
        .parse()
        .with_context(|| format!("bad column in connection `{raw}`"))?;
    let target = parts.next().unwrap_or("neighbor").to_string();
    Ok(WorldConnection::new(Pos::new(y, x), target, ConnectionRole::Entry))
}

/// One character per cell: walls, floor, decorative objects, reserved spots
/// and world-connection anchors.
fn render_ascii(area: &GeneratedArea) -> String {
    let mut out = String::with_capacity((area.width() + 1) * area.height());
    for y in 0..area.height() as i32 {
        for x in 0..area.width() as i32 {
            out.push(cell_char(area, Pos::new(y, x)));
        }
        out.push('\n');
    }
    out
}

fn cell_char(area: &GeneratedArea, pos: Pos) -> char {
    if area.world_connections.iter().any(|connection| connection.pos == pos) {
        return '@';
    }
    if let Some((kind, _)) = area.spots.iter_all().find(|(_, spot)| *spot == pos) {
        return spot_char(kind);
    }
    match area.cells.get(pos) {
        CellKind::Wall => '#',
        CellKind::Floor => '.',
        CellKind::Object => '%',
    }
}

fn spot_char(kind: SpotKind) -> char {
    match kind {
        SpotKind::Minigame => 'M',
        SpotKind::Npc => 'N',
        SpotKind::Book => 'B',
        SpotKind::Teleporter => 'T',
        SpotKind::DungeonGate => 'D',
    }
}
