//! Loading and saving `config_gui.json`.

use std::fs;
use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Error type for config operations.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error
    Io(std::io::Error),
    /// JSON error
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save the config to disk (pretty JSON, write-then-rename).
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let temp = temp_path(path);
    let json = serde_json::to_string_pretty(config)?;
    fs::write(&temp, json)?;
    fs::rename(&temp, path)?;

    Ok(())
}

/// Load the config from disk.
///
/// Returns defaults if the file doesn't exist or is not a JSON object the
/// settings can be read from. Only a failed read is an error.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        log::info!("Config file not found at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    match serde_json::from_str::<AppConfig>(&contents) {
        Ok(config) => Ok(config),
        Err(e) => {
            log::warn!("Ignoring unreadable config {}: {}", path.display(), e);
            Ok(AppConfig::default())
        }
    }
}

/// Copy a packaged config into place when the user has none yet.
///
/// Best-effort: returns whether a copy was made.
pub fn seed_config(path: &Path, packaged: &Path) -> bool {
    if path.exists() || !packaged.is_file() {
        return false;
    }

    let copy = || -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::copy(packaged, path)?;
        Ok(())
    };
    match copy() {
        Ok(()) => {
            log::info!("Seeded config from {}", packaged.display());
            true
        }
        Err(e) => {
            log::warn!("Could not seed config from {}: {}", packaged.display(), e);
            false
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::types::{Language, Theme};
    use tempfile::tempdir;

    #[test]
    fn save_and_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config_gui.json");
        let config = AppConfig {
            saves_dir: "/games/slots".into(),
            language: Language::En,
            max_backups: 3,
            ..AppConfig::default()
        };

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded, config);
        assert!(!dir.path().join("config_gui.json.tmp").exists());
    }

    #[test]
    fn save_creates_parent_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("noita_launcher").join("config_gui.json");

        save_config(&path, &AppConfig::default()).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn save_keeps_non_ascii() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config_gui.json");
        let config = AppConfig {
            saves_dir: "Сохранения".into(),
            ..AppConfig::default()
        };

        save_config(&path, &config).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Сохранения"));
        assert!(raw.contains("\n  \"saves_dir\""));
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let dir = tempdir().unwrap();
        let loaded = load_config(&dir.path().join("missing.json")).unwrap();

        assert_eq!(loaded.saves_dir, "saves");
        assert!(loaded.confirm_on_delete);
        assert!(loaded.extra.is_empty());
    }

    #[test]
    fn load_corrupt_returns_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config_gui.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.theme, Theme::Light);
        assert_eq!(loaded.max_backups, 0);
    }

    #[test]
    fn load_merges_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config_gui.json");
        fs::write(&path, r#"{"theme": "dark", "extra_key": 1}"#).unwrap();

        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.saves_dir, "saves");
        assert_eq!(loaded.extra["extra_key"], 1);
    }

    #[test]
    fn load_keeps_other_settings_when_one_key_is_mistyped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config_gui.json");
        fs::write(
            &path,
            r#"{"saves_dir": null, "language": "en", "max_backups": 2}"#,
        )
        .unwrap();

        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.saves_dir, "saves");
        assert_eq!(loaded.language, Language::En);
        assert_eq!(loaded.max_backups, 2);
    }

    #[test]
    fn seed_copies_only_when_missing() {
        let dir = tempdir().unwrap();
        let packaged = dir.path().join("packaged.json");
        let path = dir.path().join("user").join("config_gui.json");
        fs::write(&packaged, r#"{"language": "en"}"#).unwrap();

        assert!(seed_config(&path, &packaged));
        assert_eq!(load_config(&path).unwrap().language, Language::En);

        fs::write(&packaged, r#"{"language": "ru"}"#).unwrap();
        assert!(!seed_config(&path, &packaged));
        assert_eq!(load_config(&path).unwrap().language, Language::En);
    }

    #[test]
    fn seed_without_packaged_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config_gui.json");

        assert!(!seed_config(&path, &dir.path().join("nope.json")));
        assert!(!path.exists());
    }
}
