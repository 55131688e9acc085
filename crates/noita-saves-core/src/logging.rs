//! Activity log for slot operations.
//!
//! Completed operations append one timestamped line to a plain-text file.
//! The front-end's log viewer shows that file verbatim via [`read_log`].
//! Diagnostic logging goes through the `log` facade instead.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use chrono::Utc;

/// Thread-safe handle to an append-only log file.
pub type LogHandle = Arc<Mutex<Option<File>>>;

/// Format current UTC time as ISO 8601 with milliseconds (e.g. 2026-02-04T10:15:30.123Z).
fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Write a timestamped line to the log file (if present).
pub fn log_line(handle: &LogHandle, tag: &str, message: &str) {
    if let Ok(mut guard) = handle.lock() {
        if let Some(ref mut file) = *guard {
            let ts = utc_timestamp();
            let _ = writeln!(file, "[{}] {}: {}", ts, tag, message);
            let _ = file.flush();
        }
    }
}

/// Open (or create) `{log_dir}/{file_name}` for appending and return a shared handle.
///
/// With no directory, or if the file cannot be opened, the handle is inert.
pub fn open_log_file(log_dir: Option<&Path>, file_name: &str) -> LogHandle {
    let file = log_dir.and_then(|dir| {
        let path = dir.join(file_name);
        fs::create_dir_all(dir).ok()?;
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                log::warn!("Cannot open activity log {}: {}", path.display(), e);
                None
            }
        }
    });
    Arc::new(Mutex::new(file))
}

/// A handle that drops every line.
pub fn disabled() -> LogHandle {
    Arc::new(Mutex::new(None))
}

/// What the log viewer should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogContents {
    Missing,
    Text(String),
    Unreadable(String),
}

/// Read the whole activity log for display. Never fails.
pub fn read_log(path: &Path) -> LogContents {
    match fs::read(path) {
        Ok(bytes) => LogContents::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => LogContents::Missing,
        Err(e) => LogContents::Unreadable(e.to_string()),
    }
}
