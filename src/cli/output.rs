//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::CliError;
use crate::lifecycle::ErrorCategory;

/// Map a command error to the one-line message printed on stderr.
pub fn map_error(e: &CliError) -> String {
    match e {
        CliError::Remote {
            category: ErrorCategory::NoDaemonLogs | ErrorCategory::User,
            message,
        } => message.clone(),
        CliError::Remote { message, .. } => {
            format!("{} (see the user daemon logs for details)", message)
        }
        CliError::UnknownCommand(topic) => {
            format!("Unknown help topic {:?}. Run 'trafficctl help' for usage.", topic)
        }
        other => other.to_string(),
    }
}
