//! Merge rules: defaults that every other source layers on top of.

use super::paths::default_socket_path;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default(
            "daemon.socket_path",
            default_socket_path().to_string_lossy().into_owned(),
        )?
        .set_default("help.docs_url", "https://www.trafficctl.dev")?
        .set_default("logging.level", "warn")?
        .set_default("logging.output", "stderr")
}
