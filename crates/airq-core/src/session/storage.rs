// ── Durable session storage ──
//
// Two keys, written together on login and removed together on logout:
// the raw bearer token and the serialized user record. Only the
// `SessionStore` touches these.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::trace;

/// The persisted entries that make up a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StorageKey {
    /// Raw bearer token string.
    Token,
    /// JSON-serialized `UserProfile`.
    User,
}

impl StorageKey {
    /// File name used by [`FileStorage`].
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::User => "user.json",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence for the session.
///
/// Implementations must be usable from any thread; the store calls them
/// synchronously from inside its operations.
pub trait SessionStorage: Send + Sync {
    /// Read a key. `Ok(None)` means the key was never written or was removed.
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

// ── File-backed storage ─────────────────────────────────────────────

/// Stores each key as a file in a per-user data directory.
///
/// Writes go through a temporary file and a rename so a crash never
/// leaves a half-written token behind. On Unix the files are created
/// owner-readable only.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(&path)(e)),
        }
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let path = self.path(key);
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value).map_err(io_err(&tmp))?;
        restrict_permissions(&tmp)?;
        std::fs::rename(&tmp, &path).map_err(io_err(&path))?;

        trace!(key = %key, path = %path.display(), "session entry written");
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let path = self.path(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&path)(e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(io_err(path))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

// ── In-memory storage ───────────────────────────────────────────────

/// Process-local storage: sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<StorageKey, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".into()))
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.entries()?.get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.entries()?.insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.entries()?.remove(&key);
        Ok(())
    }
}
