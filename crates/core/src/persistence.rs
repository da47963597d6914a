use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::{error, warn};

/// Provides durable storage for session data like the logged in user and cookies.
/// Implementations should handle platform-specific storage (e.g. NSUserDefaults on iOS,
/// local storage in a browser shell) and keep the data private, as some of it is
/// bearer tokens.
#[uniffi::export(callback_interface)]
pub trait SecurePersistentStore: Send + Sync {
    /// Removes the entry for the given key
    fn remove_entry(&self, key: String);

    /// Gets the value for the given key, or None if not found
    fn get(&self, key: String) -> Option<Vec<u8>>;

    /// Sets the value for the given key
    fn set(&self, key: String, value: Vec<u8>);
}

/// Process local store, nothing survives a restart.
#[derive(Default, Debug)]
pub struct MemoryStore(Mutex<BTreeMap<String, Vec<u8>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecurePersistentStore for MemoryStore {
    fn remove_entry(&self, key: String) {
        if let Ok(mut map) = self.0.lock() {
            map.remove(&key);
        }
    }

    fn get(&self, key: String) -> Option<Vec<u8>> {
        self.0.lock().ok()?.get(&key).cloned()
    }

    fn set(&self, key: String, value: Vec<u8>) {
        if let Ok(mut map) = self.0.lock() {
            map.insert(key, value);
        }
    }
}

/// A single JSON document on disk holding every key.
///
/// The whole map is rewritten on each mutation, which is fine for the two or
/// three small records the console keeps.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file starts empty, an unreadable one
    /// is logged and also starts empty so a damaged file can't lock the user out.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    error!(
                        "Failed to parse store at {} - {e} - defaulting to empty store",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                error!("Failed to read store at {} - {e}", path.display());
                BTreeMap::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, Vec<u8>>) {
        let bytes = match serde_json::to_vec(entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize store: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, bytes) {
            error!("Failed to write store at {} - {e}", self.path.display());
        }
    }
}

impl SecurePersistentStore for FileStore {
    fn remove_entry(&self, key: String) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.remove(&key).is_some() {
            self.flush(&entries);
        }
    }

    fn get(&self, key: String) -> Option<Vec<u8>> {
        self.entries.lock().ok()?.get(&key).cloned()
    }

    fn set(&self, key: String, value: Vec<u8>) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        entries.insert(key, value);
        self.flush(&entries);
    }
}
