//! Editor-session glue between a host tool and the terrain core.
//!
//! The host projects pointer presses onto the ground plane and hands them to
//! an [`EditorSession`], which applies the active tool through
//! [`terrain_core::TerrainController`] and returns the cells to refresh.
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod tool;

pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use session::EditorSession;
pub use tool::{EditorTool, PointerEvent};
