//! Error types for scenario configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving, loading or blending scenarios.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No factory scenario with this name
    #[error("scenario not found: {0}")]
    ScenarioNotFound(String),

    /// A blend weight was negative or NaN
    #[error("invalid blend weight {weight} for scenario '{name}'")]
    InvalidWeight {
        /// Scenario the weight was attached to.
        name: String,
        /// Rejected weight.
        weight: f32,
    },

    /// A blend had no entry with a positive weight
    #[error("blend has no scenario with a positive weight")]
    EmptyBlend,

    /// Scenario values failed main-parameter validation
    #[error("validation failed: {0}")]
    Validation(#[from] atmos_core::ParamError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid weight error.
    pub fn invalid_weight(name: impl Into<String>, weight: f32) -> Self {
        ConfigError::InvalidWeight {
            name: name.into(),
            weight,
        }
    }

    /// Whether the error is a missing file (as opposed to an unreadable one).
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::ReadFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
