//! Errors surfaced by level generation.
//!
//! Only generation can fail. Everything that happens inside a tick is either
//! applied or ignored, so the simulation never halts mid-frame.

use thiserror::Error;

use crate::placement::FeatureKind;

/// Failure to build a level from a `LevelConfig`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    /// The configuration cannot produce a carve-able maze.
    #[error("invalid level config: {reason}")]
    Config { reason: String },

    /// Rejection sampling ran out of attempts or eligible cells.
    #[error("insufficient empty space: placed {placed} of {requested} {kind:?}")]
    PlacementExhausted {
        kind: FeatureKind,
        placed: u32,
        requested: u32,
    },

    /// Strict grid lookup outside the grid extents.
    #[error("cell ({x}, {z}) is outside the grid")]
    OutOfBounds { x: i64, z: i64 },
}

impl LevelError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Whether the caller should regenerate with a different seed or config.
    pub fn is_generation_failure(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::PlacementExhausted { .. })
    }
}
