//! Island carving: disc-masked pockets carved independently, left for the
//! shared connection phase to bridge into one walkable component.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{LayoutContext, cellular, drunkard};
use crate::grid::CellGrid;
use crate::types::{CellKind, Pos};

struct IslandSite {
    center: Pos,
    radius: i32,
}

impl IslandSite {
    fn contains(&self, pos: Pos) -> bool {
        self.center.distance_sq(pos) <= (self.radius * self.radius) as u64
    }
}

/// Draws island centers uniformly over the interior. Count scales with the
/// interior area, radius with the shorter interior span; overlapping discs
/// simply merge into larger islands.
fn island_sites(ctx: &LayoutContext<'_>, rng: &mut ChaCha8Rng) -> Vec<IslandSite> {
    let (inner_w, inner_h) =
        ctx.config.interior_span(ctx.width, ctx.height).unwrap_or((1, 1));
    let count = (inner_w * inner_h / 700).clamp(2, 5);
    let radius = (inner_w.min(inner_h) as i32 / 4).max(4);
    let border = ctx.config.border_thickness as i32;
    (0..count)
        .map(|_| {
            let y = rng.random_range(border..ctx.height as i32 - border);
            let x = rng.random_range(border..ctx.width as i32 - border);
            IslandSite { center: Pos::new(y, x), radius }
        })
        .collect()
}

pub(super) fn carve_cellular(ctx: &LayoutContext<'_>, rng: &mut ChaCha8Rng) -> CellGrid {
    let sites = island_sites(ctx, rng);
    let mut grid = CellGrid::filled(ctx.width, ctx.height, CellKind::Wall);
    cellular::seed_random(&mut grid, ctx, rng, |pos| {
        sites.iter().any(|site| site.contains(pos))
    });
    cellular::smooth(&mut grid, ctx);
    grid
}

pub(super) fn carve_drunkard(ctx: &LayoutContext<'_>, rng: &mut ChaCha8Rng) -> CellGrid {
    let sites = island_sites(ctx, rng);
    let mut grid = CellGrid::filled(ctx.width, ctx.height, CellKind::Wall);
    for site in &sites {
        let disc_cells = ctx
            .interior_positions()
            .filter(|pos| site.contains(*pos))
            .count();
        let target = drunkard::floor_target(disc_cells, ctx.accessibility);
        drunkard::walk(&mut grid, rng, site.center, target, |pos| {
            ctx.is_interior(pos) && site.contains(pos)
        });
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenConfig;
    use crate::seed::area_rng;

    fn context(config: &GenConfig) -> LayoutContext<'_> {
        LayoutContext { config, width: 48, height: 40, accessibility: 70 }
    }

    #[test]
    fn cellular_islands_carve_some_interior_floor() {
        let config = GenConfig::default();
        let ctx = context(&config);
        let mut rng = area_rng("isle-a");
        let grid = carve_cellular(&ctx, &mut rng);
        assert!(grid.count(CellKind::Floor) > 0);
        for pos in grid.positions() {
            if grid.is_floor(pos) {
                assert!(ctx.is_interior(pos), "island floor escaped the interior at {pos}");
            }
        }
    }

    #[test]
    fn drunkard_islands_carve_some_interior_floor() {
        let config = GenConfig::default();
        let ctx = context(&config);
        let mut rng = area_rng("isle-b");
        let grid = carve_drunkard(&ctx, &mut rng);
        assert!(grid.count(CellKind::Floor) > 0);
        for pos in grid.positions() {
            if grid.is_floor(pos) {
                assert!(ctx.is_interior(pos), "island floor escaped the interior at {pos}");
            }
        }
    }

    #[test]
    fn equal_streams_place_equal_islands() {
        let config = GenConfig::default();
        let ctx = context(&config);
        let mut first_rng = area_rng("isle-twin");
        let mut second_rng = area_rng("isle-twin");
        assert_eq!(
            carve_cellular(&ctx, &mut first_rng),
            carve_cellular(&ctx, &mut second_rng)
        );
        let mut first_rng = area_rng("isle-twin");
        let mut second_rng = area_rng("isle-twin");
        assert_eq!(
            carve_drunkard(&ctx, &mut first_rng),
            carve_drunkard(&ctx, &mut second_rng)
        );
    }

    #[test]
    fn site_count_scales_with_interior_area() {
        let config = GenConfig::default();
        let small = LayoutContext { config: &config, width: 20, height: 20, accessibility: 50 };
        let large = LayoutContext { config: &config, width: 90, height: 90, accessibility: 50 };
        let mut rng = area_rng("sites");
        let small_sites = island_sites(&small, &mut rng);
        let large_sites = island_sites(&large, &mut rng);
        assert!(small_sites.len() >= 2);
        assert!(large_sites.len() > small_sites.len());
        assert!(large_sites.len() <= 5);
    }
}
