//! trafficctl: command-line front end for a cluster traffic manager.
//!
//! Lifecycle commands are forwarded to a local user daemon; help output groups flags by origin
//! and wraps to the terminal.

pub mod cli;
pub mod config;
pub mod env_export;
pub mod error;
pub mod lifecycle;
pub mod logging;
