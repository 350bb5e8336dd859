//! CLI parse: clap types for trafficctl. No behavior; definitions only.
//!
//! Flag groups are their own `Args` structs so help output can recognize them by definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "trafficctl")]
#[command(about = "Manage the cluster traffic manager through the user daemon")]
#[command(disable_help_flag = true, disable_help_subcommand = true, disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Show help for this command
    #[arg(short = 'h', long, global = true)]
    pub help: bool,

    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Flags of the "Logging" group
#[derive(Args, Debug, Clone, Default)]
pub struct LoggingArgs {
    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable all logging
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, global = true, value_name = "OUTPUT")]
    pub log_output: Option<String>,

    /// Log file path, used when the log output is "file"
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

/// Flags of the "Configuration" group
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file layered over the global config
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Connection flags of the "Kubernetes flags" group
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct KubeFlags {
    /// Path to the kubeconfig file to use for CLI requests
    #[arg(long, value_name = "STRING")]
    pub kubeconfig: Option<String>,

    /// The name of the kubeconfig context to use
    #[arg(long, value_name = "STRING")]
    pub context: Option<String>,

    /// The name of the kubeconfig cluster to use
    #[arg(long, value_name = "STRING")]
    pub cluster: Option<String>,

    /// The name of the kubeconfig user to use
    #[arg(long, value_name = "STRING")]
    pub user: Option<String>,

    /// The address and port of the Kubernetes API server
    #[arg(short = 's', long, value_name = "STRING")]
    pub server: Option<String>,

    /// Username to impersonate for the operation
    #[arg(long = "as", value_name = "STRING")]
    pub as_user: Option<String>,

    /// Group to impersonate for the operation, repeat to specify multiple groups
    #[arg(long = "as-group", value_name = "STRINGARRAY")]
    pub as_group: Vec<String>,

    /// Bearer token for authentication to the API server
    #[arg(long, value_name = "STRING")]
    pub token: Option<String>,

    /// Path to a cert file for the certificate authority
    #[arg(long, value_name = "STRING")]
    pub certificate_authority: Option<String>,

    /// If true, the server's certificate will not be checked for validity
    #[arg(long)]
    pub insecure_skip_tls_verify: bool,

    /// The length of time to wait before giving up on a single server request
    #[arg(long, value_name = "STRING")]
    pub request_timeout: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install, upgrade, or uninstall the traffic manager
    #[command(disable_help_subcommand = true)]
    Helm {
        #[command(subcommand)]
        command: Option<HelmCommands>,
    },
    /// Show version information
    Version,
    /// Help about any command
    Help {
        /// Command path to show help for
        command: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HelmCommands {
    /// Install the traffic manager
    Install {
        /// Replace the traffic manager if it already exists
        #[arg(short = 'u', long)]
        upgrade: bool,

        /// Specify values in a YAML file or a URL (can specify multiple)
        #[arg(short = 'f', long = "values", value_name = "STRINGS", value_delimiter = ',')]
        values: Vec<PathBuf>,

        /// Specify a value as a.b=v (can specify multiple or separate values with commas: a.b=v1,a.c=v2)
        #[arg(long = "set", value_name = "STRINGS", value_delimiter = ',')]
        set: Vec<String>,

        #[command(flatten)]
        kube: KubeFlags,
    },
    /// Uninstall the traffic manager
    Uninstall {
        #[command(flatten)]
        kube: KubeFlags,
    },
}
