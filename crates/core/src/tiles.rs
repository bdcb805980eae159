//! Sprite palettes per style and the cell-to-tile projection.

use crate::grid::{CellGrid, TileGrid};
use crate::types::{CellKind, DecorObject, Style, TileId};

/// Ground and wall sprites for one style. Styles occupy fixed rows of the
/// tile atlas, so the ids are plain constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSet {
    pub ground: TileId,
    pub wall: TileId,
}

pub fn tile_set(style: Style) -> TileSet {
    match style {
        Style::Cave => TileSet { ground: TileId(16), wall: TileId(17) },
        Style::Savanna => TileSet { ground: TileId(32), wall: TileId(33) },
        Style::Beach => TileSet { ground: TileId(48), wall: TileId(49) },
        Style::Forest => TileSet { ground: TileId(64), wall: TileId(65) },
    }
}

/// Atlas sprite for a decorative object family.
pub fn decor_sprite(object: DecorObject) -> TileId {
    TileId(match object {
        DecorObject::SmallStone => 128,
        DecorObject::BigStone => 129,
        DecorObject::Tree => 130,
        DecorObject::Stump => 131,
        DecorObject::Bush => 132,
        DecorObject::Fence => 133,
        DecorObject::Log => 134,
        DecorObject::SmallHouse => 135,
        DecorObject::BigHouse => 136,
        DecorObject::Grave => 137,
        DecorObject::Barrel => 138,
    })
}

/// Projects a finished layout onto sprites. Purely a per-cell mapping: walls
/// get the style's wall tile, everything else its ground tile. The overlay
/// layer starts empty; decorative objects fill it in afterwards.
pub fn convert(grid: &CellGrid, style: Style) -> TileGrid {
    let set = tile_set(style);
    let mut tiles = TileGrid::filled(grid.width(), grid.height(), set.ground);
    for pos in grid.positions() {
        match grid.get(pos) {
            CellKind::Wall => tiles.set_ground(pos, set.wall),
            CellKind::Floor | CellKind::Object => {}
        }
    }
    tiles
}
