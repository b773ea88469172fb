//! Error infrastructure for terrain-core.
//!
//! Most unusual requests (painting an edge tile, adding onto an occupied cell,
//! a blend index outside the path table) are not errors at all: the operation
//! becomes a no-op and returns an empty refresh set. The variants below are the
//! conditions the host has to hear about.

use crate::grid::{GridCoord, Level};
use crate::host::HostError;
use crate::layer::TileId;
use crate::tile::TileVariant;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the request may succeed after the host fixes its input
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: the terrain cannot be edited until the cause is fixed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug or corrupted lookup state.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TerrainError {
    #[error("variant catalog has no mesh for `{variant}`")]
    MissingVariant { variant: TileVariant },

    #[error(
        "coordinate {coord} on level {level} is claimed by tiles {existing} and {duplicate}"
    )]
    DuplicateCoordinate {
        level: Level,
        coord: GridCoord,
        existing: TileId,
        duplicate: TileId,
    },

    #[error("level {level} appears more than once in the restored scene")]
    DuplicateLevel { level: Level },

    #[error(transparent)]
    Host(#[from] HostError),
}

impl TerrainError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingVariant { .. } => ErrorSeverity::Fatal,
            Self::DuplicateCoordinate { .. } | Self::DuplicateLevel { .. } => {
                ErrorSeverity::Fatal
            }
            Self::Host(error) => error.severity(),
        }
    }

    /// Static identifier of the variant, for logs and metrics.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingVariant { .. } => "missing_variant",
            Self::DuplicateCoordinate { .. } => "duplicate_coordinate",
            Self::DuplicateLevel { .. } => "duplicate_level",
            Self::Host(_) => "host",
        }
    }
}
