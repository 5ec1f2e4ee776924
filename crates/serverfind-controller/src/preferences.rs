//! User preferences persisted between sessions.

use serde::{Deserialize, Serialize};
use serverfind_common::StoreError;
use tracing::warn;

use crate::store::PreferenceStore;

pub const KEY_HIGHLIGHT_COLOR: &str = "highlightColor";
pub const KEY_AUTO_SCROLL: &str = "autoScrollEnabled";
pub const KEY_ADVANCED_SEARCH: &str = "advancedSearchEnabled";
pub const KEY_LAST_QUERY: &str = "lastQuery";

/// A stored preference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for PreferenceValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for PreferenceValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PreferenceValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub highlight_color: String,
    pub auto_scroll: bool,
    pub advanced_search: bool,
    pub last_query: Option<String>,
}

impl Preferences {
    /// Preferences of a first run.
    pub fn with_color(default_color: &str) -> Self {
        Self {
            highlight_color: default_color.to_string(),
            auto_scroll: true,
            advanced_search: false,
            last_query: None,
        }
    }

    /// Read every preference from `store`, falling back to the defaults for
    /// missing keys and for values of the wrong type.
    pub async fn load(store: &dyn PreferenceStore, default_color: &str) -> Result<Self, StoreError> {
        let mut prefs = Self::with_color(default_color);

        match store.get(KEY_HIGHLIGHT_COLOR).await? {
            Some(PreferenceValue::Text(color)) => prefs.highlight_color = color,
            Some(other) => ignored(KEY_HIGHLIGHT_COLOR, &other),
            None => {}
        }
        match store.get(KEY_AUTO_SCROLL).await? {
            Some(PreferenceValue::Bool(v)) => prefs.auto_scroll = v,
            Some(other) => ignored(KEY_AUTO_SCROLL, &other),
            None => {}
        }
        match store.get(KEY_ADVANCED_SEARCH).await? {
            Some(PreferenceValue::Bool(v)) => prefs.advanced_search = v,
            Some(other) => ignored(KEY_ADVANCED_SEARCH, &other),
            None => {}
        }
        match store.get(KEY_LAST_QUERY).await? {
            Some(PreferenceValue::Text(q)) if !q.is_empty() => prefs.last_query = Some(q),
            Some(PreferenceValue::Text(_)) | None => {}
            Some(other) => ignored(KEY_LAST_QUERY, &other),
        }

        Ok(prefs)
    }

    /// Every preference as store entries. `lastQuery` is included only when
    /// set.
    pub fn entries(&self) -> Vec<(&'static str, PreferenceValue)> {
        let mut entries = vec![
            (KEY_HIGHLIGHT_COLOR, self.highlight_color.as_str().into()),
            (KEY_AUTO_SCROLL, self.auto_scroll.into()),
            (KEY_ADVANCED_SEARCH, self.advanced_search.into()),
        ];
        if let Some(q) = &self.last_query {
            entries.push((KEY_LAST_QUERY, q.as_str().into()));
        }
        entries
    }
}

fn ignored(key: &str, value: &PreferenceValue) {
    warn!(key, ?value, "ignoring stored preference of the wrong type");
}
