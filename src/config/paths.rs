//! Platform directories for the daemon socket and the user cache.

use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "trafficctl", "trafficctl")
}

/// Default user daemon socket: the runtime dir when the platform has one, else the cache dir.
pub fn default_socket_path() -> PathBuf {
    project_dirs()
        .map(|dirs| {
            dirs.runtime_dir()
                .unwrap_or_else(|| dirs.cache_dir())
                .join("daemon.sock")
        })
        .unwrap_or_else(|| std::env::temp_dir().join("trafficctl").join("daemon.sock"))
}

/// Default user cache directory.
pub fn default_cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding the global config file.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("trafficctl"));
        }
    }
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}
