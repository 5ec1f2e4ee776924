use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serverfind_common::StoreError;
use serverfind_config::write_atomic;
use tokio::sync::RwLock;
use tracing::debug;

use super::PreferenceStore;
use crate::preferences::PreferenceValue;

/// Preferences kept in a TOML file, rewritten atomically on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, PreferenceValue>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                toml::from_str(&contents).map_err(|e| StoreError::Encoding(e.to_string()))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = values.len(), "preference store opened");
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// `<data_dir>/serverfind/preferences.toml`.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        dirs::data_dir()
            .map(|d| d.join("serverfind").join("preferences.toml"))
            .ok_or_else(|| StoreError::PathError("could not determine data directory".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `values` to disk on the blocking pool. Callers hold the write
    /// guard across this so file writes stay ordered.
    async fn persist(&self, values: &BTreeMap<String, PreferenceValue>) -> Result<(), StoreError> {
        let contents =
            toml::to_string_pretty(values).map_err(|e| StoreError::Encoding(e.to_string()))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &contents))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<PreferenceValue>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, entries: &[(&str, PreferenceValue)]) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        let mut next = values.clone();
        for (key, value) in entries {
            next.insert((*key).to_string(), value.clone());
        }
        self.persist(&next).await?;
        *values = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.persist(&next).await?;
        *values = next;
        Ok(())
    }
}
