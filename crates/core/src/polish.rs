//! Style-driven cleanup of finished layouts: walls are thickened until they
//! read as solid shapes and cramped ground is widened or sealed.

use crate::config::GenConfig;
use crate::grid::CellGrid;
use crate::types::{CellKind, Pos, Style};

/// Minimum contiguous wall run (width, height) a wall cell must belong to.
/// Forest props can sit on thinner walls than the rocky styles.
fn wall_run_minima(style: Style) -> (usize, usize) {
    match style {
        Style::Forest => (2, 2),
        Style::Cave | Style::Savanna | Style::Beach => (2, 4),
    }
}

/// Open terrain styles also repair one-cell-wide passages; cave walls are
/// allowed to pinch.
fn repairs_pinched_ground(style: Style) -> bool {
    matches!(style, Style::Savanna | Style::Beach)
}

/// Sweeps the interior until both repairs hold everywhere or the pass cap is
/// reached. Only interior cells change; the border ring and any carved
/// channels through it stay as the layout left them.
pub fn polish(grid: &mut CellGrid, style: Style, config: &GenConfig) {
    let (min_width, min_height) = wall_run_minima(style);
    let border = config.border_thickness as i32;
    for _ in 0..config.max_polish_passes {
        let mut changed = thicken_walls(grid, border, min_width, min_height);
        if repairs_pinched_ground(style) {
            changed |= widen_pinched_ground(grid, border);
        }
        if !changed {
            return;
        }
    }
    log::warn!("polish for {style} hit the pass cap before reaching a fixed point");
}

fn is_interior(grid: &CellGrid, border: i32, pos: Pos) -> bool {
    pos.y >= border
        && pos.x >= border
        && pos.y < grid.height() as i32 - border
        && pos.x < grid.width() as i32 - border
}

fn interior_positions(width: usize, height: usize, border: i32) -> impl Iterator<Item = Pos> {
    let max_y = height as i32 - border;
    let max_x = width as i32 - border;
    (border..max_y).flat_map(move |y| (border..max_x).map(move |x| Pos::new(y, x)))
}

/// Opens interior wall cells whose contiguous runs fall short of the style
/// minima. Runs may extend into the ring, so walls rooted in the ring are
/// measured at their true length.
fn thicken_walls(grid: &mut CellGrid, border: i32, min_width: usize, min_height: usize) -> bool {
    let mut changed = false;
    for pos in interior_positions(grid.width(), grid.height(), border) {
        if grid.get(pos) != CellKind::Wall {
            continue;
        }
        let width_run = run_length(grid, pos, 0, 1);
        let height_run = run_length(grid, pos, 1, 0);
        if width_run < min_width || height_run < min_height {
            grid.set(pos, CellKind::Floor);
            changed = true;
        }
    }
    changed
}

/// Length of the maximal contiguous wall run through `pos` along one axis.
fn run_length(grid: &CellGrid, pos: Pos, dy: i32, dx: i32) -> usize {
    let mut length = 1;
    let mut probe = pos.offset(dy, dx);
    while grid.in_bounds(probe) && grid.get(probe) == CellKind::Wall {
        length += 1;
        probe = probe.offset(dy, dx);
    }
    probe = pos.offset(-dy, -dx);
    while grid.in_bounds(probe) && grid.get(probe) == CellKind::Wall {
        length += 1;
        probe = probe.offset(-dy, -dx);
    }
    length
}

/// Repairs floor cells squeezed to a single cell of width: the passage is
/// widened by opening one flanking wall, and cells walled in on all four
/// sides are sealed outright.
fn widen_pinched_ground(grid: &mut CellGrid, border: i32) -> bool {
    let mut changed = false;
    for pos in interior_positions(grid.width(), grid.height(), border) {
        if grid.get(pos) != CellKind::Floor {
            continue;
        }
        let left = pos.offset(0, -1);
        let right = pos.offset(0, 1);
        let up = pos.offset(-1, 0);
        let down = pos.offset(1, 0);
        let pinched_horizontal =
            grid.get(left) == CellKind::Wall && grid.get(right) == CellKind::Wall;
        let pinched_vertical =
            grid.get(up) == CellKind::Wall && grid.get(down) == CellKind::Wall;
        if pinched_horizontal && pinched_vertical {
            grid.set(pos, CellKind::Wall);
            changed = true;
            continue;
        }
        let flanks: &[Pos] = if pinched_horizontal {
            &[left, right]
        } else if pinched_vertical {
            &[up, down]
        } else {
            continue;
        };
        for &flank in flanks {
            if is_interior(grid, border, flank) {
                grid.set(flank, CellKind::Floor);
                changed = true;
                break;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;
    use crate::seed::area_rng;

    fn open_field(width: usize, height: usize, config: &GenConfig) -> CellGrid {
        let border = config.border_thickness as i32;
        let mut grid = CellGrid::filled(width, height, CellKind::Wall);
        for pos in grid.positions().collect::<Vec<_>>() {
            if is_interior(&grid, border, pos) {
                grid.set(pos, CellKind::Floor);
            }
        }
        grid
    }

    #[test]
    fn one_cell_wall_spurs_are_opened_for_every_style() {
        for style in Style::ALL {
            let config = GenConfig::default();
            let mut grid = open_field(24, 24, &config);
            grid.set(Pos::new(10, 10), CellKind::Wall);
            polish(&mut grid, style, &config);
            assert!(grid.is_floor(Pos::new(10, 10)), "{style} kept a 1x1 wall spur");
        }
    }

    #[test]
    fn cave_walls_need_runs_of_two_by_four() {
        let config = GenConfig::default();
        let mut grid = open_field(30, 30, &config);
        // 2x3 block: wide enough, not tall enough.
        for dy in 0..3 {
            for dx in 0..2 {
                grid.set(Pos::new(10 + dy, 10 + dx), CellKind::Wall);
            }
        }
        // 2x4 block: meets both minima.
        for dy in 0..4 {
            for dx in 0..2 {
                grid.set(Pos::new(10 + dy, 20 + dx), CellKind::Wall);
            }
        }
        polish(&mut grid, Style::Cave, &config);
        assert!(grid.is_floor(Pos::new(11, 10)), "short block must dissolve");
        assert_eq!(grid.get(Pos::new(11, 20)), CellKind::Wall, "2x4 block must survive");
        assert_eq!(grid.get(Pos::new(13, 21)), CellKind::Wall);
    }

    #[test]
    fn forest_accepts_two_by_two_blocks() {
        let config = GenConfig::default();
        let mut grid = open_field(24, 24, &config);
        for dy in 0..2 {
            for dx in 0..2 {
                grid.set(Pos::new(10 + dy, 10 + dx), CellKind::Wall);
            }
        }
        let before = grid.clone();
        polish(&mut grid, Style::Forest, &config);
        assert_eq!(grid, before, "a 2x2 block satisfies the forest minima");
    }

    #[test]
    fn savanna_widens_one_cell_corridors() {
        let config = GenConfig::default();
        let mut grid = CellGrid::filled(12, 12, CellKind::Wall);
        for y in 3..9 {
            grid.set(Pos::new(y, 5), CellKind::Floor);
        }
        polish(&mut grid, Style::Savanna, &config);
        for y in 3..9 {
            let pos = Pos::new(y, 5);
            assert!(grid.is_floor(pos));
            let open_side = grid.is_floor(pos.offset(0, -1)) || grid.is_floor(pos.offset(0, 1));
            assert!(open_side, "corridor cell {pos} is still pinched");
        }
    }

    #[test]
    fn savanna_seals_boxed_in_cells() {
        let config = GenConfig::default();
        let mut grid = CellGrid::filled(12, 12, CellKind::Wall);
        grid.set(Pos::new(5, 5), CellKind::Floor);
        polish(&mut grid, Style::Savanna, &config);
        assert_eq!(grid.get(Pos::new(5, 5)), CellKind::Wall, "isolated cell must seal");
    }

    #[test]
    fn cave_leaves_pinched_corridors_alone() {
        let config = GenConfig::default();
        let mut grid = CellGrid::filled(12, 12, CellKind::Wall);
        for y in 3..9 {
            grid.set(Pos::new(y, 5), CellKind::Floor);
        }
        let before = grid.clone();
        polish(&mut grid, Style::Cave, &config);
        assert_eq!(grid, before, "cave style must not widen corridors");
    }

    #[test]
    fn polish_is_idempotent_on_noisy_grids() {
        let config = GenConfig::default();
        let border = config.border_thickness as i32;
        for style in Style::ALL {
            let mut rng = area_rng("polish-noise");
            let mut grid = CellGrid::filled(26, 26, CellKind::Wall);
            for pos in grid.positions().collect::<Vec<_>>() {
                if is_interior(&grid, border, pos) && rng.random_bool(0.55) {
                    grid.set(pos, CellKind::Floor);
                }
            }
            polish(&mut grid, style, &config);
            let settled = grid.clone();
            polish(&mut grid, style, &config);
            assert_eq!(grid, settled, "second polish changed a settled {style} grid");
        }
    }

    #[test]
    fn polish_never_touches_the_ring() {
        let config = GenConfig::default();
        let border = config.border_thickness as i32;
        let mut rng = area_rng("ring-guard");
        let mut grid = CellGrid::filled(20, 20, CellKind::Wall);
        for pos in grid.positions().collect::<Vec<_>>() {
            if is_interior(&grid, border, pos) && rng.random_bool(0.5) {
                grid.set(pos, CellKind::Floor);
            }
        }
        polish(&mut grid, Style::Beach, &config);
        for pos in grid.positions() {
            if !is_interior(&grid, border, pos) {
                assert_eq!(grid.get(pos), CellKind::Wall, "ring changed at {pos}");
            }
        }
    }
}
