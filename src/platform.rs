//! Platform capabilities
//!
//! The host runtime provides three capabilities the SDK cannot implement on
//! its own: persisted key/value storage, the native login handshake, and a
//! transient on-screen notification. Each is a small trait so that decision
//! logic stays testable without a device.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};

use crate::error::HomestayError;

/// Storage key holding the session token.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the serialized user profile.
pub const USER_INFO_KEY: &str = "userInfo";

pub type LoginFuture<'a> = Pin<Box<dyn Future<Output = Result<String, HomestayError>> + Send + 'a>>;

/// Persisted string storage that survives process restarts.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, HomestayError>;

    fn set(&self, key: &str, value: &str) -> Result<(), HomestayError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), HomestayError>;
}

/// Native login handshake yielding a one-time code to exchange with the backend.
pub trait LoginProvider: Send + Sync {
    fn login_code(&self) -> LoginFuture<'_>;
}

/// Transient user-facing notification (a toast).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

fn lock_map(map: &Mutex<HashMap<String, String>>) -> MutexGuard<'_, HashMap<String, String>> {
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, HomestayError> {
        Ok(lock_map(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HomestayError> {
        lock_map(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HomestayError> {
        lock_map(&self.values).remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON object on disk.
///
/// The file is re-read on every access so that several handles to the same
/// path observe each other's writes.
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<HashMap<String, String>>,
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, HomestayError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(HomestayError::Storage(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<(), HomestayError> {
        let bytes = serde_json::to_vec_pretty(values)?;
        std::fs::write(&self.path, bytes).map_err(|e| {
            HomestayError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, HomestayError> {
        let _guard = lock_map(&self.guard);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HomestayError> {
        let _guard = lock_map(&self.guard);
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), HomestayError> {
        let _guard = lock_map(&self.guard);
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

/// Login provider for hosts without a native handshake.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedLogin;

impl LoginProvider for UnsupportedLogin {
    fn login_code(&self) -> LoginFuture<'_> {
        Box::pin(async {
            Err(HomestayError::Login(
                "native login is not available on this platform".to_string(),
            ))
        })
    }
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!("[Homestay] notify: {}", message);
    }
}
