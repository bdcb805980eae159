//! Tunable generation parameters with game-tested defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Top-level knobs for the whole pipeline. The defaults are the values the
/// game ships with; a TOML file can override any subset of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Thickness of the solid wall ring around the playable interior.
    pub border_thickness: usize,
    /// Smoothing passes applied after the initial random seeding.
    pub ca_iterations: usize,
    /// A cell ends a smoothing pass as floor when at least this many of its
    /// eight neighbors were floor at the start of the pass.
    pub ca_floor_neighbor_min: usize,
    /// Wall pockets smaller than this dissolve into floor.
    pub min_wall_region: usize,
    /// Floor pockets smaller than this are sealed back into wall.
    pub min_floor_region: usize,
    /// World-connection channels span `2 * half_width + 1` cells along the edge.
    pub connection_half_width: usize,
    /// Radius of the circles stamped along corridor lines.
    pub corridor_radius: usize,
    /// Upper bound on polishing sweeps, reached only on degenerate layouts.
    pub max_polish_passes: usize,
    pub decor: DecorConfig,
    pub spots: SpotConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            border_thickness: 3,
            ca_iterations: 15,
            ca_floor_neighbor_min: 4,
            min_wall_region: 50,
            min_floor_region: 100,
            connection_half_width: 1,
            corridor_radius: 4,
            max_polish_passes: 64,
            decor: DecorConfig::default(),
            spots: SpotConfig::default(),
        }
    }
}

/// Knobs for decorative object placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    /// Fraction of eligible seed cells that receive a placement attempt.
    pub max_object_share: f64,
    /// Minimum Euclidean distance between accepted seed positions.
    pub min_object_spacing: u32,
    /// Seed draws per placement slot before the slot is abandoned.
    pub max_iterations_per_object: usize,
    /// Object types tried at an accepted seed before giving up on it.
    pub object_tries_per_position: usize,
    /// Chance that a successful placement spawns a neighbor of the same type.
    pub cluster_spawn_chance: f64,
    /// How far, in cells, a cluster neighbor may land from its parent.
    pub cluster_spawn_distance: u32,
    /// Hard cap on follow-up placements chained from one seed.
    pub max_cluster_spawns: usize,
    /// Longest chain the log shape may grow to.
    pub max_log_length: usize,
    // Per-step growth chances of the grown shapes.
    pub big_stone_expand_chance: f64,
    pub tree_expand_chance: f64,
    pub bush_expand_chance: f64,
    pub fence_expand_chance: f64,
    pub log_expand_chance: f64,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            max_object_share: 0.08,
            min_object_spacing: 3,
            max_iterations_per_object: 50,
            object_tries_per_position: 3,
            cluster_spawn_chance: 0.5,
            cluster_spawn_distance: 6,
            max_cluster_spawns: 24,
            max_log_length: 6,
            big_stone_expand_chance: 0.55,
            tree_expand_chance: 0.45,
            bush_expand_chance: 0.5,
            fence_expand_chance: 0.6,
            log_expand_chance: 0.5,
        }
    }
}

/// Knobs for content-spot sampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotConfig {
    /// Minimum walking distance between a dungeon gate and any world connection.
    pub min_dungeon_distance: u32,
    /// Minimum walking distance between a dungeon gate and every placed spot.
    pub min_spot_distance: u32,
    /// Candidate draws per dungeon gate before the last draw is kept anyway.
    pub dungeon_gate_attempts: usize,
    /// Candidate draws per plain spot before the slot is abandoned.
    pub sample_attempts: usize,
}

impl Default for SpotConfig {
    fn default() -> Self {
        Self {
            min_dungeon_distance: 75,
            min_spot_distance: 20,
            dungeon_gate_attempts: 10,
            sample_attempts: 100,
        }
    }
}

impl GenConfig {
    /// Parses a TOML fragment. Absent keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, GenerationError> {
        let raw = fs::read_to_string(path).map_err(|source| GenerationError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|source| GenerationError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Interior span left on each axis once the border ring is subtracted,
    /// or `None` when the grid is all border.
    pub fn interior_span(&self, width: usize, height: usize) -> Option<(usize, usize)> {
        let inner_w = width.checked_sub(2 * self.border_thickness)?;
        let inner_h = height.checked_sub(2 * self.border_thickness)?;
        if inner_w == 0 || inner_h == 0 { None } else { Some((inner_w, inner_h)) }
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.border_thickness == 0 {
            return Err(GenerationError::InvalidConfig(
                "border_thickness must be at least 1".into(),
            ));
        }
        if self.ca_floor_neighbor_min > 8 {
            return Err(GenerationError::InvalidConfig(format!(
                "ca_floor_neighbor_min must be at most 8, got {}",
                self.ca_floor_neighbor_min
            )));
        }
        if self.max_polish_passes == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_polish_passes must be at least 1".into(),
            ));
        }
        self.decor.validate()?;
        self.spots.validate()
    }
}

impl DecorConfig {
    fn validate(&self) -> Result<(), GenerationError> {
        for (name, chance) in [
            ("max_object_share", self.max_object_share),
            ("cluster_spawn_chance", self.cluster_spawn_chance),
            ("big_stone_expand_chance", self.big_stone_expand_chance),
            ("tree_expand_chance", self.tree_expand_chance),
            ("bush_expand_chance", self.bush_expand_chance),
            ("fence_expand_chance", self.fence_expand_chance),
            ("log_expand_chance", self.log_expand_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(GenerationError::InvalidConfig(format!(
                    "decor.{name} must lie in 0..=1, got {chance}"
                )));
            }
        }
        if self.max_iterations_per_object == 0 || self.object_tries_per_position == 0 {
            return Err(GenerationError::InvalidConfig(
                "decor placement attempt counts must be at least 1".into(),
            ));
        }
        if self.max_log_length == 0 {
            return Err(GenerationError::InvalidConfig(
                "decor.max_log_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl SpotConfig {
    fn validate(&self) -> Result<(), GenerationError> {
        if self.dungeon_gate_attempts == 0 || self.sample_attempts == 0 {
            return Err(GenerationError::InvalidConfig(
                "spot attempt counts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
