//! Persistence layer for user settings.
//!
//! # File Locations
//!
//! ```text
//! %APPDATA%/noita_launcher/        (or ~/noita_launcher)
//! ├── config_gui.json              # Settings (see AppConfig)
//! └── logger.txt                   # Activity log
//! ```
//!
//! Settings are loaded once at startup, merged over defaults, and saved
//! whole whenever the user changes them. Saves use write-then-rename:
//!
//! 1. Write to `config_gui.json.tmp`
//! 2. Rename to `config_gui.json`

pub mod config;
pub mod types;

pub use config::{load_config, save_config, seed_config, ConfigError};
pub use types::{AppConfig, Language, Theme};
