//! User cache boundary: ingress info per cluster and login credentials.

use crate::error::CacheError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ingress configuration for a cluster. Opaque to the CLI.
pub type IngressConfig = serde_json::Value;

/// Ingress cache keyed by `server/context`.
pub type Ingresses = BTreeMap<String, IngressConfig>;

const INGRESSES_FILE: &str = "ingresses.json";
const CREDENTIAL_FILES: &[&str] = &["tokens.json", "user-info.json"];

/// On-disk state the orchestrator cleans up after an uninstall.
pub trait UserCache {
    fn load_ingresses(&self) -> Result<Ingresses, CacheError>;

    fn save_ingresses(&self, ingresses: &Ingresses) -> Result<(), CacheError>;

    /// Remove login credentials. Succeeds when already logged out.
    fn ensure_logged_out(&self) -> Result<(), CacheError>;
}

/// [`UserCache`] stored as JSON files in a cache directory.
#[derive(Debug, Clone)]
pub struct FileUserCache {
    dir: PathBuf,
}

impl FileUserCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ingresses_path(&self) -> PathBuf {
        self.dir.join(INGRESSES_FILE)
    }
}

impl UserCache for FileUserCache {
    fn load_ingresses(&self) -> Result<Ingresses, CacheError> {
        let path = self.ingresses_path();
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Ingresses::new()),
            Err(source) => return Err(CacheError::Read { path, source }),
        };
        serde_json::from_slice(&data).map_err(|source| CacheError::Corrupt { path, source })
    }

    fn save_ingresses(&self, ingresses: &Ingresses) -> Result<(), CacheError> {
        let path = self.ingresses_path();
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let data = serde_json::to_vec_pretty(ingresses)
            .map_err(|source| CacheError::Corrupt {
                path: path.clone(),
                source,
            })?;

        // Readers never observe a partially written file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, data).map_err(|source| CacheError::Write {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| CacheError::Write { path, source })
    }

    fn ensure_logged_out(&self) -> Result<(), CacheError> {
        for name in CREDENTIAL_FILES {
            let path = self.dir.join(name);
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed credentials"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => return Err(CacheError::Logout { path, source }),
            }
        }
        Ok(())
    }
}
