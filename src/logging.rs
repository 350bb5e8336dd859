//! Logging System
//!
//! Structured logging using the `tracing` crate. Log output goes to stderr by default so it
//! never mixes with command output or help text on stdout.

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Disable all log output when false
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, stdout, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (required when output is "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, never for files)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Log destination
#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    Stderr,
    Stdout,
    File(PathBuf),
}

/// Initialize the logging system
///
/// Priority order (highest to lowest):
/// 1. `TRAFFICCTL_LOG` filter directives
/// 2. `TRAFFICCTL_LOG_FORMAT` / `TRAFFICCTL_LOG_OUTPUT`
/// 3. The given config (already merged with CLI flags by the binary)
/// 4. Defaults
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), CliError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    let filter = if config.enabled {
        build_env_filter(config)?
    } else {
        EnvFilter::new("off")
    };
    let format = determine_format(config)?;
    let output = determine_output(config)?;

    let use_color = config.color && !matches!(output, Output::File(_));
    let writer = match output {
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CliError::ConfigError(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    CliError::ConfigError(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
    };

    let base_subscriber = Registry::default().with(filter);
    let installed = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };
    installed.map_err(|e| CliError::ConfigError(format!("Failed to install log subscriber: {}", e)))
}

/// Build environment filter from `TRAFFICCTL_LOG` or the config
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, CliError> {
    if let Ok(filter) = EnvFilter::try_from_env("TRAFFICCTL_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| CliError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<String, CliError> {
    if let Ok(format) = std::env::var("TRAFFICCTL_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    match config.format.as_str() {
        "json" | "text" => Ok(config.format.clone()),
        other => Err(CliError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn determine_output(config: &LoggingConfig) -> Result<Output, CliError> {
    let output = std::env::var("TRAFFICCTL_LOG_OUTPUT").unwrap_or_else(|_| config.output.clone());
    parse_output(&output, config.file.as_ref())
}

fn parse_output(output: &str, file: Option<&PathBuf>) -> Result<Output, CliError> {
    match output {
        "stderr" => Ok(Output::Stderr),
        "stdout" => Ok(Output::Stdout),
        "file" => file.cloned().map(Output::File).ok_or_else(|| {
            CliError::ConfigError("Log output 'file' requires a log file path".to_string())
        }),
        _ => Err(CliError::ConfigError(format!(
            "Invalid log output: {} (must be 'stderr', 'stdout', or 'file')",
            output
        ))),
    }
}
