//! Key-value persistence
//!
//! Settings and records are small JSON documents stored under fixed keys:
//! - `LocalStorageStore` in the browser
//! - `FileStore` (one file per key) for native builds
//! - `MemoryStore` for tests and headless runs
//!
//! Failures never reach gameplay; callers log and fall back to defaults.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON")]
    Json(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Load a JSON value, falling back to `T::default()` when missing or broken
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let loaded = store
        .get(key)
        .and_then(|raw| raw.map(|json| serde_json::from_str(&json)).transpose().map_err(StoreError::from));
    match loaded {
        Ok(Some(value)) => {
            log::info!("Loaded {key}");
            value
        }
        Ok(None) => {
            log::info!("No stored {key}, using defaults");
            T::default()
        }
        Err(e) => {
            log::warn!("Failed to load {key}: {e}; using defaults");
            T::default()
        }
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use super::{KeyValueStore, StoreError};

    /// One `<key>.json` file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        fn path(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            match fs::read_to_string(self.path(key)) {
                Ok(s) => Ok(Some(s)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            fs::create_dir_all(&self.dir)?;
            // Write then rename so a crash never leaves half a file
            let tmp = self.dir.join(format!("{key}.json.tmp"));
            fs::write(&tmp, value)?;
            fs::rename(&tmp, self.path(key))?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, StoreError};

    /// Browser LocalStorage
    pub struct LocalStorageStore {
        storage: Option<web_sys::Storage>,
    }

    impl Default for LocalStorageStore {
        fn default() -> Self {
            Self::new()
        }
    }

    impl LocalStorageStore {
        pub fn new() -> Self {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
            if storage.is_none() {
                log::warn!("LocalStorage unavailable - progress will not be saved");
            }
            Self { storage }
        }

        fn storage(&self) -> Result<&web_sys::Storage, StoreError> {
            self.storage
                .as_ref()
                .ok_or_else(|| StoreError::Unavailable("no LocalStorage".into()))
        }
    }

    impl KeyValueStore for LocalStorageStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.storage()?
                .get_item(key)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.storage()?
                .set_item(key, value)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        n: u32,
    }

    #[test]
    fn test_memory_roundtrip_and_defaults() {
        let mut store = MemoryStore::default();
        assert_eq!(load_or_default::<Doc>(&store, "doc"), Doc::default());
        save_json(&mut store, "doc", &Doc { n: 7 }).unwrap();
        assert_eq!(load_or_default::<Doc>(&store, "doc"), Doc { n: 7 });
    }

    #[test]
    fn test_corrupt_value_falls_back() {
        let mut store = MemoryStore::default();
        store.set("doc", "{not json").unwrap();
        assert_eq!(load_or_default::<Doc>(&store, "doc"), Doc::default());
    }

    #[test]
    fn test_file_store() {
        let dir = std::env::temp_dir().join(format!("pollo_loco_store_{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("doc", "{\"n\":3}").unwrap();
        assert_eq!(load_or_default::<Doc>(&store, "doc"), Doc { n: 3 });
        let _ = std::fs::remove_dir_all(&dir);
    }
}
