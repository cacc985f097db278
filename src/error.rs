//! Boundary errors.
//!
//! The layout and camera code never fails; degenerate input degrades to a
//! smaller scene. Errors only come from loading moment records or config.

use std::path::PathBuf;

/// Error raised while loading input records or configuration
#[derive(Debug, thiserror::Error)]
pub enum GalaxyError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid moment records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config value out of range: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GalaxyError>;

impl GalaxyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GalaxyError::Io {
            path: path.into(),
            source,
        }
    }
}
