//! Error taxonomy for slot operations.
//!
//! Every repository, workflow and launch failure ends up as a [`SlotError`].
//! The front-end shows its `Display` text to the user as-is, so messages name
//! the condition and the offending path or slot.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// The configured live save directory does not exist.
    #[error("Save directory not found: {}", .0.display())]
    LiveSaveMissing(PathBuf),

    /// The referenced slot is not present under the repository root.
    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    /// A rename target is already taken.
    #[error("Slot '{0}' already exists")]
    NameConflict(String),

    /// A blank name was given where one is required.
    #[error("Slot name cannot be empty")]
    NameEmpty,

    /// The name is not a single plain directory name (`.`, `..`, `a/b`, ...).
    #[error("Invalid slot name: {0}")]
    InvalidName(String),

    /// The configured game executable does not exist.
    #[error("Game executable not found: {}", .0.display())]
    ExecutableMissing(PathBuf),

    /// The game process could not be started.
    #[error("Failed to start {}: {source}", path.display())]
    LaunchFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The automatic backup taken before a load or run failed.
    #[error("Auto-backup failed: {0}")]
    AutoBackup(Box<SlotError>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl SlotError {
    /// True for generic filesystem failures (permissions, disk full, ...).
    pub fn is_io(&self) -> bool {
        matches!(self, SlotError::Io(_) | SlotError::Walk(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn display_names_the_condition() {
        let err = SlotError::LiveSaveMissing(PathBuf::from("/games/save00"));
        assert_eq!(err.to_string(), "Save directory not found: /games/save00");

        let err = SlotError::NameConflict("run-1".to_string());
        assert_eq!(err.to_string(), "Slot 'run-1' already exists");

        assert_eq!(SlotError::NameEmpty.to_string(), "Slot name cannot be empty");

        let err = SlotError::InvalidName("..".to_string());
        assert_eq!(err.to_string(), "Invalid slot name: ..");
    }

    #[test]
    fn launch_failure_keeps_source() {
        use std::error::Error as _;

        let err = SlotError::LaunchFailure {
            path: PathBuf::from("noita.exe"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("Failed to start noita.exe"));
        assert!(err.source().is_some());
    }

    #[test]
    fn auto_backup_wraps_cause() {
        let inner = SlotError::LiveSaveMissing(PathBuf::from("save00"));
        let err = SlotError::AutoBackup(Box::new(inner));
        assert!(err.to_string().contains("Save directory not found"));
    }

    #[test]
    fn io_classification() {
        let err: SlotError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert!(err.is_io());
        assert!(!SlotError::NameEmpty.is_io());
    }
}
