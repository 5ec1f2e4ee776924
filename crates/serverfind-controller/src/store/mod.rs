//! Async key-value storage for [`crate::Preferences`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serverfind_common::StoreError;

use crate::preferences::PreferenceValue;

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<PreferenceValue>, StoreError>;

    /// Write several entries at once.
    async fn set(&self, entries: &[(&str, PreferenceValue)]) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
