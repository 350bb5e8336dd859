//! Environment source: `TRAFFICCTL__DAEMON__SOCKET_PATH=/path` style overrides.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TRAFFICCTL")
            .prefix_separator("__")
            .separator("__"),
    )
}
