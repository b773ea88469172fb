//! Errors surfaced by the editor session.

use terrain_core::{ErrorSeverity, TerrainError};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("brush size {size} is outside {min}..={max}")]
    InvalidBrushSize { size: u8, min: u8, max: u8 },

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error("failed to load terrain content: {0:#}")]
    Content(#[from] anyhow::Error),
}

impl EditorError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidBrushSize { .. } => ErrorSeverity::Validation,
            Self::Terrain(error) => error.severity(),
            Self::Content(_) => ErrorSeverity::Fatal,
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_the_source() {
        let brush = EditorError::InvalidBrushSize {
            size: 7,
            min: 1,
            max: 3,
        };
        assert_eq!(brush.severity(), ErrorSeverity::Validation);
        assert_eq!(brush.to_string(), "brush size 7 is outside 1..=3");

        let terrain = EditorError::from(TerrainError::DuplicateLevel {
            level: terrain_core::Level(2),
        });
        assert_eq!(terrain.severity(), ErrorSeverity::Fatal);
    }
}
