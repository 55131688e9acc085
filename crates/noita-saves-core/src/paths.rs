//! Well-known locations: home, user data directory and platform defaults.

use std::env;
use std::path::PathBuf;

/// Folder name under the user data root.
pub const APP_DIR_NAME: &str = "noita_launcher";

/// User configuration file name.
pub const CONFIG_FILE_NAME: &str = "config_gui.json";

/// Activity log file name.
pub const LOG_FILE_NAME: &str = "logger.txt";

/// Where the game installs by default.
pub const DEFAULT_EXE_PATH: &str = r"C:\Games\Noita\noita.exe";

/// Slots folder, relative to the working directory unless configured otherwise.
pub const DEFAULT_SAVES_DIR: &str = "saves";

/// Return the user's home directory path.
///
/// Uses HOME on Unix-like systems and USERPROFILE on Windows.
pub fn get_home_dir() -> Result<String, String> {
    if let Ok(home) = env::var("HOME") {
        if !home.is_empty() {
            return Ok(home);
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.is_empty() {
            return Ok(profile);
        }
    }

    Err("Home directory not set".to_string())
}

fn home_or_cwd() -> PathBuf {
    get_home_dir()
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Directory holding the user config and the activity log.
///
/// `%APPDATA%/noita_launcher` when APPDATA is set, `<home>/noita_launcher` otherwise.
pub fn user_data_dir() -> PathBuf {
    let base = env::var_os("APPDATA")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(home_or_cwd);
    base.join(APP_DIR_NAME)
}

pub fn config_file_path() -> PathBuf {
    user_data_dir().join(CONFIG_FILE_NAME)
}

pub fn log_file_path() -> PathBuf {
    user_data_dir().join(LOG_FILE_NAME)
}

/// The game's live save directory on a default Windows install.
pub fn default_live_save_path() -> PathBuf {
    home_or_cwd()
        .join("AppData")
        .join("LocalLow")
        .join("Nolla_Games_Noita")
        .join("save00")
}
