use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::io::ErrorKind;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{CatalogError, FurnitureType};
use super::state::PlacedItem;
use crate::settings::EditorSettings;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialise layout: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value persistence medium.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    /// Drop every key, not only the ones this editor wrote.
    fn clear_all(&mut self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.values.insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<(), StorageError> {
        self.values.clear();
        Ok(())
    }
}

/// One file per key inside `dir`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn clear_all(&mut self) -> Result<(), StorageError> {
        match fs::remove_dir_all(&self.dir) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// Browser `localStorage`, looked up on every call.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{:?}", err)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }

    pub fn is_available() -> bool {
        Self::local_storage().is_ok()
    }
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", err))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local_storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local_storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Self::local_storage()?.remove_item(key).map_err(js_error)
    }

    fn clear_all(&mut self) -> Result<(), StorageError> {
        Self::local_storage()?.clear().map_err(js_error)
    }
}

/// Serialised form of one placed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    #[serde(rename = "type")]
    pub furniture_type: String,
    pub x: f32,
    pub z: f32,
    /// Layouts saved before rotation existed have no angle.
    #[serde(rename = "rotationY", default)]
    pub rotation_y: f32,
}

impl PersistedRecord {
    pub fn to_item(&self) -> Result<PlacedItem, CatalogError> {
        let furniture_type = self.furniture_type.parse::<FurnitureType>()?;
        Ok(PlacedItem::new(furniture_type, self.x, self.z, self.rotation_y))
    }
}

/// The persisted layout slot.
#[derive(Resource)]
pub struct LayoutStore {
    storage: Box<dyn KeyValueStorage>,
    key: String,
}

impl LayoutStore {
    pub fn new(storage: impl KeyValueStorage + 'static, key: impl Into<String>) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.into(),
        }
    }

    /// `localStorage` in the browser, files under the settings directory natively.
    pub fn platform_default(settings: &EditorSettings) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            if BrowserStorage::is_available() {
                Self::new(BrowserStorage, settings.storage_key.clone())
            } else {
                warn!("localStorage unavailable, layout will not survive a reload");
                Self::new(MemoryStorage::default(), settings.storage_key.clone())
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            info!("Storing layout under: {}", settings.storage_dir.display());
            Self::new(FileStorage::new(&settings.storage_dir), settings.storage_key.clone())
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrite the stored layout.
    pub fn save(&mut self, records: &[PersistedRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string(records)?;
        self.storage.set(&self.key, &json)
    }

    /// Stored layout, or an empty one when the slot is missing or unreadable.
    pub fn load(&self) -> Vec<PersistedRecord> {
        let json = match self.storage.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Could not read stored layout: {}", err);
                return Vec::new();
            }
        };

        if json.trim().is_empty() {
            return Vec::new();
        }

        serde_json::from_str(&json).unwrap_or_else(|err| {
            warn!("Discarding unreadable stored layout: {}", err);
            Vec::new()
        })
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }

    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        self.storage.clear_all()
    }
}
