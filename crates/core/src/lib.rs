pub mod config;
pub mod decor;
pub mod error;
pub mod generator;
pub mod grid;
pub mod layout;
pub mod model;
pub mod path;
pub mod polish;
pub mod region;
pub mod seed;
pub mod spots;
pub mod tiles;
pub mod types;

pub use config::{DecorConfig, GenConfig, SpotConfig};
pub use decor::DecorPlacement;
pub use error::GenerationError;
pub use generator::{AreaGenerator, AreaRequest};
pub use grid::{CellGrid, TileGrid};
pub use layout::LayoutAlgorithm;
pub use model::GeneratedArea;
pub use path::{GridPathfinder, Pathfinder};
pub use spots::{SpotPlan, SpotPositions};
pub use types::*;
