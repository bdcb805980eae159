//! The generation pipeline facade.
//!
//! [`AreaGenerator`] wires the phases together in their fixed order: layout,
//! polish, tile conversion, decoration, spot sampling. One random stream is
//! seeded from the request's seed string and threaded through the phases
//! that draw from it, which makes the whole run a pure function of the
//! request and the config.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GenConfig;
use crate::decor;
use crate::error::GenerationError;
use crate::layout::{self, LayoutAlgorithm, LayoutContext};
use crate::model::GeneratedArea;
use crate::path::{GridPathfinder, Pathfinder};
use crate::polish;
use crate::seed;
use crate::spots::{SpotPlan, SpotPositionGenerator};
use crate::tiles;
use crate::types::{Pos, SpotKind, Style, WorldConnection};

/// Inputs of one generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRequest {
    pub seed: String,
    pub width: usize,
    pub height: usize,
    /// Percentage (0..=100) steering how much of the interior becomes floor.
    pub accessibility: u8,
    pub style: Style,
    pub algorithm: LayoutAlgorithm,
    pub world_connections: Vec<WorldConnection>,
    pub spots: SpotPlan,
}

/// Runs the full pipeline for a request. Holds nothing but the config, so
/// one generator can serve any number of requests.
pub struct AreaGenerator {
    config: GenConfig,
}

impl AreaGenerator {
    pub fn new(config: GenConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self { config: GenConfig::default() }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Generates an area, measuring dungeon-gate distances on the generated
    /// grid itself.
    pub fn generate(&self, request: &AreaRequest) -> Result<GeneratedArea, GenerationError> {
        self.generate_with(request, &GridPathfinder)
    }

    /// Generates an area with a caller-supplied distance oracle. The game
    /// passes its live collision map here so gate distances agree with what
    /// the player can actually walk.
    pub fn generate_with<P: Pathfinder>(
        &self,
        request: &AreaRequest,
        pathfinder: &P,
    ) -> Result<GeneratedArea, GenerationError> {
        self.validate(request)?;
        log::debug!(
            "generating {}x{} {} area via {} from seed `{}`",
            request.width,
            request.height,
            request.style,
            request.algorithm,
            request.seed
        );
        let mut rng = seed::area_rng(&request.seed);
        let ctx = LayoutContext {
            config: &self.config,
            width: request.width,
            height: request.height,
            accessibility: request.accessibility,
        };
        let mut grid =
            layout::build_layout(request.algorithm, &ctx, &request.world_connections, &mut rng);
        polish::polish(&mut grid, request.style, &self.config);
        let mut tile_grid = tiles::convert(&grid, request.style);
        let placements = decor::place_objects(
            &mut grid,
            &mut tile_grid,
            request.style,
            &self.config.decor,
            &mut rng,
        );
        log::debug!("placed {} decorative objects", placements.len());
        let mut spot_gen = SpotPositionGenerator::new(
            &grid,
            pathfinder,
            &self.config.spots,
            &request.world_connections,
        );
        for kind in SpotKind::ALL {
            spot_gen.generate_positions(kind, request.spots.count(kind), &mut rng);
        }
        let spots = spot_gen.finish();
        log::debug!("reserved {} content spots", spots.total());
        Ok(GeneratedArea {
            seed: request.seed.clone(),
            style: request.style,
            algorithm: request.algorithm,
            accessibility: request.accessibility,
            cells: grid,
            tiles: tile_grid,
            decor: placements,
            spots,
            world_connections: request.world_connections.clone(),
        })
    }

    fn validate(&self, request: &AreaRequest) -> Result<(), GenerationError> {
        if request.accessibility > 100 {
            return Err(GenerationError::InvalidAccessibility(request.accessibility));
        }
        if self.config.interior_span(request.width, request.height).is_none() {
            return Err(GenerationError::InvalidDimensions {
                width: request.width,
                height: request.height,
                border: self.config.border_thickness,
            });
        }
        for connection in &request.world_connections {
            if !on_single_edge(request.width, request.height, connection.pos) {
                return Err(GenerationError::ConnectionOffBorder { pos: connection.pos });
            }
        }
        Ok(())
    }
}

/// A valid connection anchor sits on exactly one outer edge: corners have no
/// perpendicular direction to carve a channel in, interior cells none at all.
fn on_single_edge(width: usize, height: usize, pos: Pos) -> bool {
    let right = width as i32 - 1;
    let bottom = height as i32 - 1;
    if pos.y < 0 || pos.x < 0 || pos.y > bottom || pos.x > right {
        return false;
    }
    let edges = [pos.x == 0, pos.x == right, pos.y == 0, pos.y == bottom];
    edges.into_iter().filter(|on_edge| *on_edge).count() == 1
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::grid::CellGrid;
    use crate::region;
    use crate::types::{CellKind, ConnectionRole};

    fn request(seed: &str) -> AreaRequest {
        AreaRequest {
            seed: seed.into(),
            width: 60,
            height: 60,
            accessibility: 50,
            style: Style::Cave,
            algorithm: LayoutAlgorithm::CellularAutomata,
            world_connections: vec![],
            spots: SpotPlan::default(),
        }
    }

    fn floor_components(grid: &CellGrid) -> usize {
        region::extract_regions(grid)
            .iter()
            .filter(|found| found.kind == CellKind::Floor)
            .count()
    }

    #[test]
    fn identical_requests_generate_identical_areas() {
        let mut req = request("xyz");
        req.width = 40;
        req.height = 40;
        req.accessibility = 30;
        req.style = Style::Forest;
        req.spots = SpotPlan { minigames: 2, npcs: 2, books: 1, teleporters: 1, dungeon_gates: 1 };
        let a = AreaGenerator::with_defaults().generate(&req).expect("generation succeeds");
        let b = AreaGenerator::with_defaults().generate(&req).expect("generation succeeds");
        assert_eq!(a, b);
        assert_eq!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn different_seeds_diverge() {
        let a = AreaGenerator::with_defaults().generate(&request("abc")).expect("generates");
        let b = AreaGenerator::with_defaults().generate(&request("abd")).expect("generates");
        assert_ne!(a.cells, b.cells);
    }

    #[test]
    fn floor_forms_a_single_connected_component() {
        let area = AreaGenerator::with_defaults().generate(&request("abc")).expect("generates");
        assert!(area.cells.count(CellKind::Floor) > 0);
        assert_eq!(floor_components(&area.cells), 1);
    }

    #[test]
    fn border_ring_is_solid_without_connections() {
        let generator = AreaGenerator::with_defaults();
        let area = generator.generate(&request("abc")).expect("generates");
        let border = generator.config().border_thickness as i32;
        for pos in area.cells.positions() {
            let in_ring = pos.y < border
                || pos.x < border
                || pos.y >= area.height() as i32 - border
                || pos.x >= area.width() as i32 - border;
            if in_ring {
                assert_eq!(area.cells.get(pos), CellKind::Wall, "ring cell {pos} must be wall");
            }
        }
    }

    #[test]
    fn connection_channels_breach_the_ring_and_join_the_floor() {
        let mut req = request("harbor");
        req.world_connections = vec![
            WorldConnection::new(Pos::new(20, 0), "west-area", ConnectionRole::Entry),
            WorldConnection::new(Pos::new(0, 30), "north-area", ConnectionRole::Exit),
        ];
        let area = AreaGenerator::with_defaults().generate(&req).expect("generates");
        for connection in &area.world_connections {
            assert!(
                area.cells.is_floor(connection.pos),
                "connection anchor {} must be walkable",
                connection.pos
            );
        }
        assert_eq!(floor_components(&area.cells), 1, "channels must join the single component");
    }

    #[test]
    fn every_algorithm_yields_a_connected_area() {
        for algorithm in LayoutAlgorithm::ALL {
            let mut req = request("quarry");
            req.width = 48;
            req.height = 48;
            req.accessibility = 55;
            req.algorithm = algorithm;
            req.world_connections =
                vec![WorldConnection::new(Pos::new(24, 0), "west-area", ConnectionRole::Entry)];
            let area = AreaGenerator::with_defaults().generate(&req).expect("generates");
            assert_eq!(floor_components(&area.cells), 1, "{algorithm} left split floor");
            assert!(area.cells.is_floor(Pos::new(24, 0)), "{algorithm} sealed the channel");
        }
    }

    #[test]
    fn cave_walls_keep_their_minimum_runs() {
        let generator = AreaGenerator::with_defaults();
        let area = generator.generate(&request("abc")).expect("generates");
        let border = generator.config().border_thickness as i32;
        let wall = |pos: Pos| area.cells.get(pos) == CellKind::Wall;
        let run = |pos: Pos, dy: i32, dx: i32| {
            let mut len = 1;
            for dir in [-1, 1] {
                let mut probe = pos.offset(dy * dir, dx * dir);
                while area.cells.in_bounds(probe) && wall(probe) {
                    len += 1;
                    probe = probe.offset(dy * dir, dx * dir);
                }
            }
            len
        };
        for pos in area.cells.positions() {
            let interior = pos.y >= border
                && pos.x >= border
                && pos.y < area.height() as i32 - border
                && pos.x < area.width() as i32 - border;
            if interior && wall(pos) {
                assert!(run(pos, 0, 1) >= 2, "horizontal wall run too short at {pos}");
                assert!(run(pos, 1, 0) >= 4, "vertical wall run too short at {pos}");
            }
        }
    }

    #[test]
    fn spot_requests_yield_distinct_walkable_cells() {
        let mut req = request("library");
        req.spots = SpotPlan { minigames: 5, npcs: 5, ..SpotPlan::default() };
        let area = AreaGenerator::with_defaults().generate(&req).expect("generates");
        assert_eq!(area.spots.minigames.len(), 5);
        assert_eq!(area.spots.npcs.len(), 5);
        let distinct: BTreeSet<Pos> = area.spots.iter_all().map(|(_, pos)| pos).collect();
        assert_eq!(distinct.len(), 10, "ten requested spots must land on ten cells");
        for (kind, pos) in area.spots.iter_all() {
            assert!(area.is_walkable(pos), "{} spot at {pos} must be walkable", kind.name());
        }
    }

    #[test]
    fn dungeon_gates_are_placed_even_on_tight_maps() {
        let mut req = request("fort");
        req.width = 32;
        req.height = 32;
        req.accessibility = 70;
        req.world_connections =
            vec![WorldConnection::new(Pos::new(16, 0), "west-area", ConnectionRole::Entry)];
        req.spots = SpotPlan { dungeon_gates: 1, ..SpotPlan::default() };
        let area = AreaGenerator::with_defaults().generate(&req).expect("generates");
        assert_eq!(area.spots.dungeon_gates.len(), 1);
        assert!(area.is_walkable(area.spots.dungeon_gates[0]));
    }

    #[test]
    fn decor_overlay_matches_object_cells() {
        let mut req = request("glade");
        req.style = Style::Savanna;
        req.accessibility = 65;
        let area = AreaGenerator::with_defaults().generate(&req).expect("generates");
        for pos in area.cells.positions() {
            assert_eq!(
                area.tiles.overlay_at(pos).is_some(),
                area.cells.get(pos) == CellKind::Object,
                "overlay and object cells must coincide at {pos}"
            );
        }
    }

    #[test]
    fn accessibility_above_one_hundred_is_rejected() {
        let mut req = request("abc");
        req.accessibility = 101;
        assert!(matches!(
            AreaGenerator::with_defaults().generate(&req),
            Err(GenerationError::InvalidAccessibility(101))
        ));
    }

    #[test]
    fn grids_thinner_than_the_border_are_rejected() {
        let mut req = request("abc");
        req.width = 6;
        assert!(matches!(
            AreaGenerator::with_defaults().generate(&req),
            Err(GenerationError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn connections_must_sit_on_exactly_one_edge() {
        for bad in [Pos::new(0, 0), Pos::new(5, 5), Pos::new(0, 59), Pos::new(60, 0)] {
            let mut req = request("abc");
            req.world_connections =
                vec![WorldConnection::new(bad, "elsewhere", ConnectionRole::Entry)];
            assert!(
                matches!(
                    AreaGenerator::with_defaults().generate(&req),
                    Err(GenerationError::ConnectionOffBorder { .. })
                ),
                "{bad} must be rejected as a connection anchor"
            );
        }
        let mut req = request("abc");
        req.world_connections =
            vec![WorldConnection::new(Pos::new(0, 5), "north-area", ConnectionRole::Entry)];
        assert!(AreaGenerator::with_defaults().generate(&req).is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected_at_construction() {
        let config = GenConfig { border_thickness: 0, ..GenConfig::default() };
        assert!(matches!(
            AreaGenerator::new(config),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn generation_is_deterministic_and_connected(
            seed in "[a-z]{1,8}",
            accessibility in 30u8..=80,
            style_idx in 0usize..4,
            algorithm_idx in 0usize..4,
        ) {
            let mut req = request(&seed);
            req.width = 44;
            req.height = 40;
            req.accessibility = accessibility;
            req.style = Style::ALL[style_idx];
            req.algorithm = LayoutAlgorithm::ALL[algorithm_idx];
            req.spots = SpotPlan { minigames: 2, npcs: 1, books: 1, teleporters: 1, dungeon_gates: 1 };
            let a = AreaGenerator::with_defaults().generate(&req).expect("generation succeeds");
            let b = AreaGenerator::with_defaults().generate(&req).expect("generation succeeds");
            prop_assert_eq!(a.canonical_bytes(), b.canonical_bytes());
            prop_assert_eq!(floor_components(&a.cells), 1);
            let spot_cells: BTreeSet<Pos> = a.spots.iter_all().map(|(_, pos)| pos).collect();
            prop_assert_eq!(spot_cells.len(), a.spots.total());
        }
    }
}
