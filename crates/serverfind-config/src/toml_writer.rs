//! Write a [`ServerfindConfig`] back to TOML on disk.
//!
//! Writes are atomic (write to `.tmp`, then rename) so a crash mid-write
//! never leaves a truncated file behind.

use std::path::Path;

use serverfind_common::ConfigError;

use crate::schema::ServerfindConfig;

/// Write config to a specific path, creating parent directories.
pub fn save_config_to_path(config: &ServerfindConfig, path: &Path) -> Result<(), ConfigError> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize config to TOML: {e}")))?;

    write_atomic(path, &toml_str).map_err(|e| {
        ConfigError::ParseError(format!("failed to write config to {}: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), "config saved to disk");
    Ok(())
}

/// Replace `path` with `contents` via a sibling `.tmp` file and a rename.
///
/// Falls back to a direct write when the rename fails (e.g. the target is
/// locked on Windows).
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);
    std::fs::write(&tmp_path, contents)?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        tracing::warn!("atomic rename failed ({e}), falling back to direct write");
        std::fs::write(path, contents)?;
        let _ = std::fs::remove_file(&tmp_path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ServerfindConfig::default();
        config.controller.target_host = "ptb.discord.com".into();
        config.highlight.outline_width_px = 3;
        save_config_to_path(&config, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: ServerfindConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.controller.target_host, "ptb.discord.com");
        assert_eq!(parsed.highlight.outline_width_px, 3);
        assert_eq!(parsed.sidebar.root_selector, config.sidebar.root_selector);
    }

    #[test]
    fn save_config_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("config.toml");

        save_config_to_path(&ServerfindConfig::default(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("discord-search-highlight"));
    }

    #[test]
    fn write_atomic_cleans_up_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.toml");

        write_atomic(&path, "a = 1\n").unwrap();
        write_atomic(&path, "a = 2\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a = 2\n");
        assert!(!dir.path().join("prefs.toml.tmp").exists());
    }
}
