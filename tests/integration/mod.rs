//! Integration tests for the trafficctl command-line front end

mod cli_binary;
mod lifecycle_install;
mod test_utils;
