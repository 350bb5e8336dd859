//! Configuration System
//!
//! Layered configuration for the CLI: built-in defaults, the user's global config file, an
//! explicit `--config` file, and `TRAFFICCTL__SECTION__KEY` environment overrides, in that order.

use crate::error::CliError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod paths;
mod sources;

pub use paths::{default_cache_dir, default_socket_path};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where to reach the user daemon
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// On-disk user cache
    #[serde(default)]
    pub cache: CacheConfig,

    /// Help output settings
    #[serde(default)]
    pub help: HelpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Unix socket the user daemon listens on
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Override for the user cache directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Configured directory, or the platform cache directory.
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        self.dir.clone().or_else(default_cache_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpConfig {
    /// Documentation link appended to the help hint; empty disables it
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
}

fn default_docs_url() -> String {
    "https://www.trafficctl.dev".to_string()
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            docs_url: default_docs_url(),
        }
    }
}

impl CliConfig {
    /// Validate the loaded configuration
    pub fn validate(&self) -> Result<(), CliError> {
        if self.daemon.socket_path.as_os_str().is_empty() {
            return Err(CliError::ConfigError(
                "daemon.socket_path cannot be empty".to_string(),
            ));
        }
        let url = &self.help.docs_url;
        if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::ConfigError(format!(
                "help.docs_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        Ok(())
    }

    /// Documentation URL for the help hint, if one is configured.
    pub fn docs_url(&self) -> Option<&str> {
        Some(self.help.docs_url.as_str()).filter(|u| !u.is_empty())
    }
}

/// Loads and validates [`CliConfig`] from all sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, layering an explicit file over the global one when given.
    pub fn load(explicit: Option<&Path>) -> Result<CliConfig, CliError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => sources::explicit_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = sources::environment::add_to_builder(builder);

        let config: CliConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load only from a specific file (plus defaults), ignoring global and environment sources.
    pub fn load_from_file(path: &Path) -> Result<CliConfig, CliError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::explicit_file::add_to_builder(builder, path)?;
        let config: CliConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
