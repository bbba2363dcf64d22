//! Persistent per-user cache.
//!
//! A small key-addressed byte store under the user's cache directory
//! (`~/.cache/oebb-cli` on Linux). It only holds the authentication record,
//! and it is advisory: a missing or unreadable entry is a miss, never a
//! failure of the caller's operation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Directory name under the platform cache directory.
const APP_DIR: &str = "oebb-cli";

/// Errors from the persistent cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The platform has no per-user cache directory
    #[error("no per-user cache directory available")]
    NoCacheDir,

    /// Key is empty or would escape the cache directory
    #[error("invalid cache key {0:?}")]
    InvalidKey(String),

    /// Filesystem operation failed
    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A key-addressed byte store.
///
/// Access is sequential within one process; concurrent processes race on
/// writes and the last writer wins.
pub trait KeyValueCache {
    /// Read an entry. Missing or unreadable entries are `None`.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Write an entry, creating directories as needed.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError>;

    /// Delete an entry. Deleting a missing entry succeeds.
    fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Disk-backed cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    /// Create a cache rooted at the given directory.
    ///
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a cache in the per-user cache directory.
    pub fn user_default() -> Result<Self, CacheError> {
        let base = dirs::cache_dir().ok_or(CacheError::NoCacheDir)?;
        Ok(Self::new(base.join(APP_DIR)))
    }

    /// Resolve a key to a file path inside the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0'])
            && !key.starts_with("..");
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CacheError + '_ {
        move |source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl KeyValueCache for DiskCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key).ok()?;
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cache miss");
                None
            }
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key)?;

        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(Self::io_error(&self.root))?;
        }

        // Write beside the target and rename so a concurrent reader never
        // sees a partial file.
        let tmp = self
            .root
            .join(format!(".{key}.{}.tmp", std::process::id()));
        write_private(&tmp, bytes).map_err(Self::io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CacheError::Io {
                path: path.clone(),
                source: e,
            }
        })?;

        debug!(path = %path.display(), len = bytes.len(), "cache write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io { path, source: e }),
        }
    }
}

/// Write a file readable and writable by the owner only.
#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
