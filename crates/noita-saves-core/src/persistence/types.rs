//! Persisted settings.
//!
//! `config_gui.json` is a flat JSON object. Keys this crate does not know are
//! kept in [`AppConfig::extra`] and written back untouched. Missing keys take
//! their defaults; values of the wrong type for the preference keys fall
//! back to the default instead of rejecting the whole file.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::paths::{default_live_save_path, DEFAULT_EXE_PATH, DEFAULT_SAVES_DIR};
use crate::slots::{RepoConfig, DEFAULT_NAME_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// The game's live save directory (`save00`).
    #[serde(default = "default_noita_save_path", deserialize_with = "lenient_noita_save_path")]
    pub noita_save_path: String,

    /// Executable started by "run with slot".
    #[serde(default = "default_noita_exe_path", deserialize_with = "lenient_noita_exe_path")]
    pub noita_exe_path: String,

    /// Repository root holding one directory per slot.
    #[serde(default = "default_saves_dir", deserialize_with = "lenient_saves_dir")]
    pub saves_dir: String,

    /// strftime-style pattern for generated slot names.
    #[serde(default = "default_save_name_format", deserialize_with = "lenient_save_name_format")]
    pub save_name_format: String,

    #[serde(default, deserialize_with = "lenient")]
    pub theme: Theme,

    #[serde(default, deserialize_with = "lenient")]
    pub language: Language,

    #[serde(default = "default_true", deserialize_with = "lenient_true")]
    pub confirm_on_delete: bool,

    /// Back up the live save before "run with slot".
    #[serde(default, deserialize_with = "lenient")]
    pub auto_backup_on_run: bool,

    /// Back up the live save before loading a slot.
    #[serde(default, deserialize_with = "lenient")]
    pub auto_backup_on_load: bool,

    /// Retention limit for "save current"; 0 keeps everything.
    #[serde(default, deserialize_with = "lenient")]
    pub max_backups: u32,

    /// Unknown keys, preserved across load/save.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// Default value functions
fn default_noita_save_path() -> String {
    default_live_save_path().to_string_lossy().into_owned()
}

fn default_noita_exe_path() -> String {
    DEFAULT_EXE_PATH.to_string()
}

fn default_saves_dir() -> String {
    DEFAULT_SAVES_DIR.to_string()
}

fn default_save_name_format() -> String {
    DEFAULT_NAME_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

/// Deserialize `T`, or `T::default()` if the stored value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// A string key, or `default()` if the stored value is not a string.
fn lenient_string<'de, D>(deserializer: D, default: fn() -> String) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        _ => Ok(default()),
    }
}

fn lenient_noita_save_path<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient_string(d, default_noita_save_path)
}

fn lenient_noita_exe_path<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient_string(d, default_noita_exe_path)
}

fn lenient_saves_dir<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient_string(d, default_saves_dir)
}

fn lenient_save_name_format<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    lenient_string(d, default_save_name_format)
}

fn lenient_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(true))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            noita_save_path: default_noita_save_path(),
            noita_exe_path: default_noita_exe_path(),
            saves_dir: default_saves_dir(),
            save_name_format: default_save_name_format(),
            theme: Theme::default(),
            language: Language::default(),
            confirm_on_delete: true,
            auto_backup_on_run: false,
            auto_backup_on_load: false,
            max_backups: 0,
            extra: serde_json::Map::new(),
        }
    }
}

impl AppConfig {
    pub fn live_save_path(&self) -> PathBuf {
        PathBuf::from(&self.noita_save_path)
    }

    pub fn exe_path(&self) -> PathBuf {
        PathBuf::from(&self.noita_exe_path)
    }

    pub fn saves_dir(&self) -> PathBuf {
        PathBuf::from(&self.saves_dir)
    }

    /// The settings the slot repository works from.
    ///
    /// A blank name format means the default one.
    pub fn repo_config(&self) -> RepoConfig {
        let name_format = match self.save_name_format.trim() {
            "" => default_save_name_format(),
            _ => self.save_name_format.clone(),
        };
        RepoConfig {
            live_save_path: self.live_save_path(),
            saves_dir: self.saves_dir(),
            name_format,
            max_backups: self.max_backups,
        }
    }

    /// Restore the save, executable and slots-folder paths to their defaults.
    pub fn reset_paths(&mut self) {
        self.noita_save_path = default_noita_save_path();
        self.noita_exe_path = default_noita_exe_path();
        self.saves_dir = default_saves_dir();
    }

    /// Restore every non-path setting to its default. Unknown keys are kept.
    pub fn reset_preferences(&mut self) {
        let defaults = Self::default();
        self.save_name_format = defaults.save_name_format;
        self.theme = defaults.theme;
        self.language = defaults.language;
        self.confirm_on_delete = defaults.confirm_on_delete;
        self.auto_backup_on_run = defaults.auto_backup_on_run;
        self.auto_backup_on_load = defaults.auto_backup_on_load;
        self.max_backups = defaults.max_backups;
    }
}
