//! Shared vocabulary types used across the generation pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grid position. `y` grows downward, `x` grows to the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dy: i32, dx: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    /// Squared Euclidean distance. Kept in integers so orderings never
    /// depend on floating-point rounding.
    pub fn distance_sq(self, other: Self) -> u64 {
        let dy = i64::from(self.y) - i64::from(other.y);
        let dx = i64::from(self.x) - i64::from(other.x);
        (dy * dy + dx * dx) as u64
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.y.abs_diff(other.y) + self.x.abs_diff(other.x)
    }

    /// The four edge-sharing neighbors, in up, right, down, left order.
    pub fn orthogonal_neighbors(self) -> [Self; 4] {
        [
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(1, 0),
            self.offset(0, -1),
        ]
    }

    /// All eight surrounding cells, in row-major order.
    pub fn moore_neighbors(self) -> [Self; 8] {
        [
            self.offset(-1, -1),
            self.offset(-1, 0),
            self.offset(-1, 1),
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(1, -1),
            self.offset(1, 0),
            self.offset(1, 1),
        ]
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.y, self.x)
    }
}

/// What a single cell of the layout means for movement.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    #[default]
    Wall,
    Floor,
    /// Floor occupied by a decorative object. Blocks movement like a wall
    /// but still renders its ground tile underneath.
    Object,
}

impl CellKind {
    pub fn is_floor(self) -> bool {
        matches!(self, CellKind::Floor)
    }

    pub fn blocks_movement(self) -> bool {
        !self.is_floor()
    }
}

/// Visual theme of an area. Decides the tile palette, which decorative
/// objects may appear, and how aggressively the layout is polished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Cave,
    Savanna,
    Beach,
    Forest,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Cave, Style::Savanna, Style::Beach, Style::Forest];

    pub fn name(self) -> &'static str {
        match self {
            Style::Cave => "cave",
            Style::Savanna => "savanna",
            Style::Beach => "beach",
            Style::Forest => "forest",
        }
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.name() == raw)
            .ok_or_else(|| {
                format!("unknown style `{raw}` (expected cave, savanna, beach or forest)")
            })
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content categories that receive reserved positions on the finished layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpotKind {
    Minigame,
    Npc,
    Book,
    Teleporter,
    DungeonGate,
}

impl SpotKind {
    pub const ALL: [SpotKind; 5] = [
        SpotKind::Minigame,
        SpotKind::Npc,
        SpotKind::Book,
        SpotKind::Teleporter,
        SpotKind::DungeonGate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpotKind::Minigame => "minigame",
            SpotKind::Npc => "npc",
            SpotKind::Book => "book",
            SpotKind::Teleporter => "teleporter",
            SpotKind::DungeonGate => "dungeon_gate",
        }
    }
}

/// Decorative object families the environment generator can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorObject {
    SmallStone,
    BigStone,
    Tree,
    Stump,
    Bush,
    Fence,
    Log,
    SmallHouse,
    BigHouse,
    Grave,
    Barrel,
}

impl DecorObject {
    pub fn name(self) -> &'static str {
        match self {
            DecorObject::SmallStone => "small_stone",
            DecorObject::BigStone => "big_stone",
            DecorObject::Tree => "tree",
            DecorObject::Stump => "stump",
            DecorObject::Bush => "bush",
            DecorObject::Fence => "fence",
            DecorObject::Log => "log",
            DecorObject::SmallHouse => "small_house",
            DecorObject::BigHouse => "big_house",
            DecorObject::Grave => "grave",
            DecorObject::Barrel => "barrel",
        }
    }
}

/// Sprite identifier in the game's tile atlas.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TileId(pub u16);

/// Whether a world connection leads into this area or out of it. Purely
/// descriptive metadata; both roles are carved the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRole {
    Entry,
    Exit,
}

/// A doorway to a neighboring area, anchored on the outer border of the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConnection {
    pub pos: Pos,
    pub target_area: String,
    pub role: ConnectionRole,
}

impl WorldConnection {
    pub fn new(pos: Pos, target_area: impl Into<String>, role: ConnectionRole) -> Self {
        Self { pos, target_area: target_area.into(), role }
    }
}
