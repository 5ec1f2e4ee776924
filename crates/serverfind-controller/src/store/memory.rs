use std::collections::HashMap;

use async_trait::async_trait;
use serverfind_common::StoreError;
use tokio::sync::RwLock;

use super::PreferenceStore;
use crate::preferences::PreferenceValue;

/// Process-local store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, PreferenceValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<PreferenceValue>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, entries: &[(&str, PreferenceValue)]) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        for (key, value) in entries {
            values.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set(&[("k", true.into())]).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(PreferenceValue::Bool(true)));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
