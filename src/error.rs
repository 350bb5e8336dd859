//! Error types for the trafficctl command-line front end.

use crate::lifecycle::ErrorCategory;
use std::path::PathBuf;
use thiserror::Error;

/// On-disk user cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt cache file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to remove credentials {path}: {source}")]
    Logout {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No cache directory could be determined")]
    NoCacheDir,
}

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("--values path {path:?} not valid: {reason}")]
    InvalidValuesPath { path: PathBuf, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Remote {
        category: ErrorCategory,
        message: String,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("The user daemon is not running (no socket at {0})")]
    DaemonNotRunning(PathBuf),

    #[error("Unknown help topic {0:?}")]
    UnknownCommand(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Category of a structured remote failure, if this is one.
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            CliError::Remote { category, .. } => Some(*category),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::ConfigError(err.to_string())
    }
}
