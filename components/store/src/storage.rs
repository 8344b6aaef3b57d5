//! Storage operations for persisting data to disk

use crate::error::StoreError;
use crate::finite::ensure_finite;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A `Storage` instance manages the data in a single file
///
/// The file is read once in [`Storage::new`]. Every mutation rewrites the
/// whole file before returning, and the file is removed whenever the mapping
/// becomes empty, so the file exists exactly when there is something in it.
///
/// # Example
///
/// ```no_run
/// use lean_store::Storage;
///
/// # fn main() -> Result<(), lean_store::StoreError> {
/// let mut storage = Storage::new("/tmp/lean/config")?;
/// storage.set("default-language", "python")?;
///
/// let reopened = Storage::new("/tmp/lean/config")?;
/// assert_eq!(reopened.get("default-language").and_then(|v| v.as_str()), Some("python"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Storage {
    file: PathBuf,
    data: Map<String, Value>,
}

impl Storage {
    /// Open the store backed by `file`
    ///
    /// A missing file yields an empty store. Nothing is written to disk here.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the file does not contain a JSON
    /// object and [`StoreError::Persistence`] if it exists but cannot be read.
    pub fn new(file: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let file = file.into();
        let data = load(&file)?;

        Ok(Self { file, data })
    }

    /// The path of the backing file
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Get the value assigned to `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Get the value assigned to `key`, or `default` when nothing is assigned
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Get the value assigned to `key` deserialized into `T`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unserializable`] if the stored value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(value) = self.data.get(key) else {
            return Ok(None);
        };

        T::deserialize(value)
            .map(Some)
            .map_err(|source| StoreError::Unserializable {
                key: key.to_string(),
                source,
            })
    }

    /// Whether a value is assigned to `key`
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// All keys currently in the store, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Assign `value` to `key` and write the store to disk
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unserializable`] before touching anything if the
    /// value has no JSON representation. Returns [`StoreError::Persistence`] if
    /// the file cannot be written; the new value is kept in memory regardless.
    pub fn set<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: T,
    ) -> Result<(), StoreError> {
        let key = key.into();
        let unserializable = |source| StoreError::Unserializable {
            key: key.clone(),
            source,
        };

        // to_value would store infinities and NaN as null
        ensure_finite(&value).map_err(unserializable)?;
        let value = serde_json::to_value(value).map_err(unserializable)?;

        self.data.insert(key, value);
        self.save()
    }

    /// Remove `key` and write the store to disk
    ///
    /// Returns whether the key was present. Removing an absent key does no I/O.
    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        if self.data.remove(key).is_none() {
            return Ok(false);
        }

        self.save()?;
        Ok(true)
    }

    /// Remove every key and delete the backing file
    ///
    /// Calling this on a store without a backing file is a no-op.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.data.clear();
        self.save()
    }

    /// Write the data to the backing file, deleting the file if there is no data
    fn save(&self) -> Result<(), StoreError> {
        if self.data.is_empty() {
            return delete(&self.file);
        }

        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::persistence(parent, e))?;
        }

        let contents = to_pretty_json(&self.data).map_err(|e| {
            StoreError::persistence(&self.file, std::io::Error::new(ErrorKind::InvalidData, e))
        })?;

        fs::write(&self.file, contents).map_err(|e| StoreError::persistence(&self.file, e))?;
        log::debug!("Saved {} key(s) to {}", self.data.len(), self.file.display());

        Ok(())
    }
}

fn load(path: &Path) -> Result<Map<String, Value>, StoreError> {
    if !path.exists() {
        log::debug!("No store file at {}, starting empty", path.display());
        return Ok(Map::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| StoreError::persistence(path, e))?;

    let data: Map<String, Value> =
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("Loaded {} key(s) from {}", data.len(), path.display());
    Ok(data)
}

fn delete(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        return Ok(());
    }

    fs::remove_file(path).map_err(|e| StoreError::persistence(path, e))?;
    log::debug!("Deleted empty store file {}", path.display());

    Ok(())
}

/// Pretty-print with 4-space indentation so hand-edited files stay readable
fn to_pretty_json(data: &Map<String, Value>) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)?;

    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
