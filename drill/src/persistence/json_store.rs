use super::PersistenceError;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::path::PathBuf;

/// Single-document JSON persistence store.
///
/// Each logical namespace (sessions, blunders) is one versioned
/// document in one file. Absent or corrupt data decodes to the empty
/// document: loss of history must never block active play.
pub struct JsonStore<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T: Default + Serialize + DeserializeOwned> JsonStore<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    /// Load the document, falling back to the empty one.
    pub fn load(&self) -> T {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Corrupt store file {:?}: {}", self.path, e);
                    T::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => T::default(),
            Err(e) => {
                tracing::warn!("Failed to read store file {:?}: {}", self.path, e);
                T::default()
            }
        }
    }

    /// Write the document, creating parent directories as needed.
    pub fn save(&self, doc: &T) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the backing file entirely.
    pub fn clear(&self) -> Result<(), PersistenceError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
