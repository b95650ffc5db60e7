//! Local Storage - durable key/value persistence for the client
//!
//! Values are JSON strings stored under fixed keys. `FileStorage` keeps one
//! file per key under the data directory; `MemoryStorage` backs tests and
//! ephemeral runs.

use crate::{ApplicationError, ApplicationResult};
use fms_core::storage_error;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// Key holding the serialized signed-in user
pub const USER_KEY: &str = "user";
/// Key holding the locally cached feedback list
pub const FEEDBACKS_KEY: &str = "feedbacks";

/// Durable string storage addressed by key
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> ApplicationResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> ApplicationResult<()>;

    /// Removing an absent key is not an error
    fn remove_item(&self, key: &str) -> ApplicationResult<()>;
}

fn check_key(key: &str) -> ApplicationResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ApplicationError::Core(storage_error!(
            format!("Invalid storage key: {:?}", key),
            "local_storage"
        )))
    }
}

/// File-backed storage, one `<key>.json` per entry
#[derive(Debug, Clone)]
pub struct FileStorage {
    storage_dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `storage_dir`, creating it if needed
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> ApplicationResult<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&storage_dir).map_err(|e| {
            storage_error!(
                format!("Failed to create {}", storage_dir.display()),
                "file_storage",
                e
            )
        })?;

        info!("Local storage initialized at: {}", storage_dir.display());

        Ok(Self { storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn path_for(&self, key: &str) -> ApplicationResult<PathBuf> {
        check_key(key)?;
        Ok(self.storage_dir.join(format!("{}.json", key)))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> ApplicationResult<Option<String>> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(value) => {
                debug!("Read {} from {}", key, path.display());
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error!(
                format!("Failed to read {}", path.display()),
                "file_storage",
                e
            )
            .into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> ApplicationResult<()> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        // Write-then-rename so readers never observe a half-written value
        std::fs::write(&staging, value).map_err(|e| {
            storage_error!(
                format!("Failed to write {}", staging.display()),
                "file_storage",
                e
            )
        })?;
        std::fs::rename(&staging, &path).map_err(|e| {
            if let Err(cleanup) = std::fs::remove_file(&staging) {
                warn!("Failed to remove {}: {}", staging.display(), cleanup);
            }
            storage_error!(
                format!("Failed to replace {}", path.display()),
                "file_storage",
                e
            )
        })?;

        debug!("Saved {} to {}", key, path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> ApplicationResult<()> {
        let path = self.path_for(key)?;

        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error!(
                format!("Failed to delete {}", path.display()),
                "file_storage",
                e
            )
            .into()),
        }
    }
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
    read_only: RwLock<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `entries`
    pub fn with_items<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let items = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: RwLock::new(items),
            read_only: RwLock::new(false),
        }
    }

    /// Make writes fail, as a full disk or read-only mount would
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.write().unwrap_or_else(|e| e.into_inner()) = read_only;
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_writable(&self) -> ApplicationResult<()> {
        if *self.read_only.read().unwrap_or_else(|e| e.into_inner()) {
            return Err(storage_error!("Storage is read-only", "memory_storage").into());
        }
        Ok(())
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> ApplicationResult<Option<String>> {
        check_key(key)?;
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> ApplicationResult<()> {
        check_key(key)?;
        self.ensure_writable()?;
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> ApplicationResult<()> {
        check_key(key)?;
        self.ensure_writable()?;
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        items.remove(key);
        Ok(())
    }
}
