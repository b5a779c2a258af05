//! Key-value persistence
//!
//! LocalStorage on web, a shared in-memory map natively and in tests. Values
//! are JSON strings so the same helpers serve the high score and settings.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Failure at the storage seam
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend (no window, storage disabled by the browser)
    Unavailable,
    /// The backend refused a read or write
    Backend { key: String, message: String },
    /// A value could not be serialized
    Encode { key: String, message: String },
    /// A stored value could not be parsed
    Decode { key: String, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Backend { key, message } => write!(f, "storage error for '{key}': {message}"),
            Self::Encode { key, message } => write!(f, "cannot encode '{key}': {message}"),
            Self::Decode { key, message } => write!(f, "cannot decode '{key}': {message}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// String key-value store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Read and parse a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(json) = store.get_item(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| StorageError::Decode {
            key: key.to_string(),
            message: e.to_string(),
        })
}

/// Serialize a value to JSON and store it
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set_item(key, &json)
}

/// In-memory store. Clones share the same map, so a caller can keep a handle
/// after boxing one into the game state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored value
    pub fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|_| StorageError::Unavailable)?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }

    fn backend_error(key: &str, err: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Backend {
            key: key.to_string(),
            message: format!("{:?}", err),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| Self::backend_error(key, e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| Self::backend_error(key, e))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| Self::backend_error(key, e))
    }
}

/// LocalStorage when the browser provides it, memory otherwise
#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{e}; scores will not survive a reload");
            Box::new(MemoryStorage::new())
        }
    }
}

/// Native builds keep everything in memory
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStorage::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_shares_map_between_clones() {
        let handle = MemoryStorage::new();
        let mut boxed: Box<dyn KeyValueStore> = Box::new(handle.clone());

        boxed.set_item("k", "v").unwrap();
        assert_eq!(handle.get("k").as_deref(), Some("v"));

        boxed.remove_item("k").unwrap();
        assert_eq!(handle.get("k"), None);
    }

    #[test]
    fn test_json_roundtrip_and_missing_key() {
        let mut store = MemoryStorage::new();
        assert_eq!(load_json::<u64>(&store, "score").unwrap(), None);

        save_json(&mut store, "score", &1234u64).unwrap();
        assert_eq!(store.get("score").as_deref(), Some("1234"));
        assert_eq!(load_json::<u64>(&store, "score").unwrap(), Some(1234));
    }

    #[test]
    fn test_corrupt_value_is_decode_error() {
        let mut store = MemoryStorage::new();
        store.set_item("score", "not a number").unwrap();

        let err = load_json::<u64>(&store, "score").unwrap_err();
        assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "score"));
        assert!(err.to_string().starts_with("cannot decode 'score'"));
    }
}
