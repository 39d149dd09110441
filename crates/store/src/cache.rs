//! Persisted state cache.
//!
//! A flat key-value store of full JSON snapshots. Each [`CacheKey`] is an
//! independent entry, overwritten wholesale on every relevant change. There is
//! no schema versioning: an entry that no longer parses is treated as absent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Errors reading or writing the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed.
    #[error("cache I/O error for {key}: {source}")]
    Io {
        key: CacheKey,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized.
    #[error("cache serialization error for {key}: {source}")]
    Json {
        key: CacheKey,
        #[source]
        source: serde_json::Error,
    },
}

/// The persisted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Products,
    User,
    Orders,
    Users,
    AdminLogs,
    /// Bearer token for the remote API.
    Token,
}

impl CacheKey {
    /// Every entry, in the order they are written.
    pub const ALL: [Self; 6] = [
        Self::Products,
        Self::User,
        Self::Orders,
        Self::Users,
        Self::AdminLogs,
        Self::Token,
    ];

    /// The storage key name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Products => "uhsin_products",
            Self::User => "uhsin_user",
            Self::Orders => "uhsin_orders",
            Self::Users => "uhsin_users_list",
            Self::AdminLogs => "uhsin_admin_logs",
            Self::Token => "uhsin_jwt",
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Durable string-keyed storage.
pub trait StateCache: Send + Sync {
    /// Read an entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backing storage cannot be read.
    fn get(&self, key: CacheKey) -> Result<Option<String>, CacheError>;

    /// Overwrite an entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backing storage cannot be written.
    fn set(&self, key: CacheKey, value: &str) -> Result<(), CacheError>;

    /// Delete an entry. Deleting a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the backing storage cannot be modified.
    fn remove(&self, key: CacheKey) -> Result<(), CacheError>;
}

/// Typed snapshot helpers over any [`StateCache`].
pub trait StateCacheExt: StateCache {
    /// Read and decode a snapshot.
    ///
    /// Unreadable or corrupt entries are logged and reported as absent.
    fn load<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let raw = match self.get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, error = %e, "cache entry unreadable, ignoring");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "cache entry corrupt, ignoring");
                None
            }
        }
    }

    /// Encode and write a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if encoding or writing fails.
    fn save<T: Serialize + ?Sized>(&self, key: CacheKey, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value).map_err(|source| CacheError::Json { key, source })?;
        self.set(key, &raw)
    }
}

impl<C: StateCache + ?Sized> StateCacheExt for C {}

// =============================================================================
// FileCache
// =============================================================================

/// One `<key>.json` file per entry inside a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| CacheError::Io {
            key: CacheKey::Products,
            source,
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.name()))
    }
}

impl StateCache for FileCache {
    fn get(&self, key: CacheKey) -> Result<Option<String>, CacheError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CacheError::Io { key, source }),
        }
    }

    fn set(&self, key: CacheKey, value: &str) -> Result<(), CacheError> {
        // Write to a sibling file and rename so readers never see a torn entry
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|source| CacheError::Io { key, source })?;
        std::fs::rename(&tmp, &path).map_err(|source| CacheError::Io { key, source })
    }

    fn remove(&self, key: CacheKey) -> Result<(), CacheError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { key, source }),
        }
    }
}

// =============================================================================
// MemoryCache
// =============================================================================

/// In-process cache for tests and offline sessions.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, String>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateCache for MemoryCache {
    fn get(&self, key: CacheKey) -> Result<Option<String>, CacheError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: CacheKey, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&self, key: CacheKey) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&key);
        Ok(())
    }
}
