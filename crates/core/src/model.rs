//! Output bundle of one generation run.

use serde::{Deserialize, Serialize};

use crate::decor::DecorPlacement;
use crate::grid::{CellGrid, TileGrid};
use crate::layout::LayoutAlgorithm;
use crate::spots::SpotPositions;
use crate::types::{CellKind, Pos, Style, WorldConnection};

/// Everything one generation run produces, together with the inputs that
/// shaped it. Consumers paint [`tiles`](Self::tiles), instantiate content at
/// [`spots`](Self::spots) and use [`cells`](Self::cells) for collision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArea {
    pub seed: String,
    pub style: Style,
    pub algorithm: LayoutAlgorithm,
    pub accessibility: u8,
    pub cells: CellGrid,
    pub tiles: TileGrid,
    pub decor: Vec<DecorPlacement>,
    pub spots: SpotPositions,
    pub world_connections: Vec<WorldConnection>,
}

impl GeneratedArea {
    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    /// True when the cell can be walked on: floor that no object covers.
    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.cells.is_floor(pos)
    }

    /// Stable byte encoding of everything observable in the output. Two
    /// areas agree on their canonical bytes exactly when a consumer could
    /// not tell them apart; the fuzz harness compares these across runs.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(self.seed.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(self.style.name().as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(self.algorithm.name().as_bytes());
        bytes.push(0);
        bytes.push(self.accessibility);
        bytes.extend_from_slice(&(self.width() as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.height() as u32).to_le_bytes());
        for cell in self.cells.cells() {
            bytes.push(match cell {
                CellKind::Wall => 0,
                CellKind::Floor => 1,
                CellKind::Object => 2,
            });
        }
        for tile in self.tiles.ground() {
            bytes.extend_from_slice(&tile.0.to_le_bytes());
        }
        for tile in self.tiles.overlay() {
            match tile {
                Some(id) => {
                    bytes.push(1);
                    bytes.extend_from_slice(&id.0.to_le_bytes());
                }
                None => bytes.push(0),
            }
        }
        for placement in &self.decor {
            bytes.extend_from_slice(placement.object.name().as_bytes());
            bytes.push(0);
            bytes.extend_from_slice(&placement.sprite.0.to_le_bytes());
            bytes.extend_from_slice(&(placement.cells.len() as u32).to_le_bytes());
            for cell in &placement.cells {
                push_pos(&mut bytes, *cell);
            }
        }
        for (kind, pos) in self.spots.iter_all() {
            bytes.extend_from_slice(kind.name().as_bytes());
            bytes.push(0);
            push_pos(&mut bytes, pos);
        }
        bytes
    }
}

fn push_pos(bytes: &mut Vec<u8>, pos: Pos) {
    bytes.extend_from_slice(&pos.y.to_le_bytes());
    bytes.extend_from_slice(&pos.x.to_le_bytes());
}
