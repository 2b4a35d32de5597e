use crate::api::types::EntityId;
use crate::core::group::GroupId;

/// Result alias used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Rejected configuration. Raised before the resolver ever sees the values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("ray count must be at least 2, got {count}")]
    TooFewRays { count: usize },

    #[error("skin width must be finite and non-negative, got {0}")]
    InvalidSkinWidth(f32),

    #[error("probe extent {extent} is smaller than twice the skin width {skin_width}")]
    DegenerateProbeSpacing { extent: f32, skin_width: f32 },

    #[error("fixed timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
}

/// Top-level engine error.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to parse level: {0}")]
    Level(#[from] serde_json::Error),

    #[error("no tileset covers gid {gid}")]
    UnknownTileset { gid: u32 },

    #[error("entity {0:?} is not in the registry")]
    UnknownEntity(EntityId),

    #[error("group {0:?} does not exist")]
    UnknownGroup(GroupId),
}
