//! serverfind configuration system.
//!
//! TOML-based configuration with validation. Every section has defaults so
//! partial configs work out of the box; the `[sidebar]` selectors are the
//! part most likely to need editing when the chat client changes its markup.

pub mod colors;
pub mod schema;
pub mod selector;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use colors::{normalize_color, parse_color, validate_color};
pub use schema::ServerfindConfig;
pub use selector::{parse_selector, Selector, SelectorTree};
pub use toml_writer::{save_config_to_path, write_atomic};

use serverfind_common::ConfigError;
use std::path::Path;

/// Load config from `path` when given, else from the platform default
/// location, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ServerfindConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ServerfindConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
