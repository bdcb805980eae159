//! Error type shared by request validation, config loading and generation.

use thiserror::Error;

use crate::types::Pos;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The requested grid leaves no interior once the solid wall border is
    /// subtracted from both axes.
    #[error("grid {width}x{height} leaves no interior inside the {border}-cell wall border")]
    InvalidDimensions { width: usize, height: usize, border: usize },

    #[error("accessibility is a percentage and must be at most 100, got {0}")]
    InvalidAccessibility(u8),

    #[error("world connection at {pos} must sit on exactly one outer edge of the grid")]
    ConnectionOffBorder { pos: Pos },

    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file `{path}`")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file `{path}`")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
