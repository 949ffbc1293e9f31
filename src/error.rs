//! Error types for startup configuration loading.
//!
//! The simulation itself never fails: invalid in-game commands are ignored.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a `GameConfig` from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// RON parsing failed.
    #[error("parse error in config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    /// Values parsed but describe an unplayable game.
    #[error("invalid config: {0}")]
    Invalid(String),
}
