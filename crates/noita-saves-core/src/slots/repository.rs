//! The slot repository: named backups of the live save directory.
//!
//! Thread-safe: share it behind an `Arc` with background workers. Mutating
//! operations are serialized by an internal lock so overlapping calls on the
//! same root do not interleave their remove/copy steps. Reads do not lock.
//!
//! A slot name must be a single plain directory name. Blank names, `.`,
//! `..` and anything containing a path separator never reach the disk.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::fs_ops::{copy_dir, list_subdirs, modified_time, remove_dir, DeleteOutcome};
use super::naming::{generate_auto_name, generate_name};
use super::retention::{select_evictions, RetentionReport};
use crate::error::SlotError;
use crate::logging::{self, log_line, LogHandle};

/// Removes one evicted slot directory.
type Evictor = fn(&Path) -> io::Result<DeleteOutcome>;

/// The subset of settings the repository works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// The game's active save directory.
    pub live_save_path: PathBuf,
    /// Repository root; every immediate subdirectory is a slot.
    pub saves_dir: PathBuf,
    /// strftime-style pattern for generated names.
    pub name_format: String,
    /// Retention limit for "save current". `0` means unlimited.
    pub max_backups: u32,
}

/// A slot as seen on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotInfo {
    pub name: String,
    pub path: PathBuf,
    pub last_modified: DateTime<Utc>,
}

pub struct SlotRepository {
    config: Mutex<RepoConfig>,
    op_lock: Mutex<()>,
    activity: LogHandle,
    evict: Evictor,
}

impl SlotRepository {
    pub fn new(config: RepoConfig) -> Self {
        Self {
            config: Mutex::new(config),
            op_lock: Mutex::new(()),
            activity: logging::disabled(),
            evict: remove_dir,
        }
    }

    /// Record completed operations in the given activity log.
    pub fn with_activity_log(mut self, handle: LogHandle) -> Self {
        self.activity = handle;
        self
    }

    #[cfg(test)]
    fn with_evictor(mut self, evict: Evictor) -> Self {
        self.evict = evict;
        self
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> RepoConfig {
        self.config.lock().unwrap().clone()
    }

    /// Replace the configuration and make sure the new root exists.
    pub fn reconfigure(&self, config: RepoConfig) -> Result<(), SlotError> {
        let _op = self.begin();
        fs::create_dir_all(&config.saves_dir)?;
        log::info!(
            "Slot repository reconfigured: live={}, root={}, max_backups={}",
            config.live_save_path.display(),
            config.saves_dir.display(),
            config.max_backups
        );
        *self.config.lock().unwrap() = config;
        Ok(())
    }

    /// Name an automatic backup from the configured pattern and the current time.
    pub fn auto_name(&self, prefix: &str) -> String {
        generate_auto_name(prefix, &self.config().name_format, &Local::now())
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Copy the live save directory into a slot, then apply retention.
    ///
    /// A missing or blank name is replaced by one generated from the clock.
    /// An existing slot of the same name is replaced. Returns the slot name.
    pub fn create_backup(&self, name: Option<&str>) -> Result<String, SlotError> {
        let _op = self.begin();
        let config = self.config();

        let name = match name {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => generate_name(&config.name_format, &Local::now()),
        };
        self.copy_live_into(&config, &name)?;
        log_line(&self.activity, "SAVE", &name);

        let report = self.cleanup_retention(&config, self.evict);
        if !report.is_clean() {
            log::warn!(
                "Retention left {} slot(s) in place after failures",
                report.failed.len()
            );
        }
        Ok(name)
    }

    /// Replace an existing slot's contents with the live save. No retention.
    pub fn overwrite_backup(&self, name: &str) -> Result<(), SlotError> {
        let _op = self.begin();
        let config = self.config();

        self.copy_live_into(&config, name)?;
        log_line(&self.activity, "OVERWRITE", name);
        Ok(())
    }

    /// Replace the live save directory with a copy of the slot.
    pub fn restore_backup(&self, name: &str) -> Result<(), SlotError> {
        let _op = self.begin();
        let config = self.config();

        let src = existing_slot(&config.saves_dir, name)?;
        let files = copy_dir(&src, &config.live_save_path)?;
        log::info!(
            "Restored slot '{}' into {} ({} files)",
            name,
            config.live_save_path.display(),
            files
        );
        log_line(&self.activity, "LOAD", name);
        Ok(())
    }

    /// Remove a slot. A slot that is already gone is not an error.
    pub fn delete_backup(&self, name: &str) -> Result<DeleteOutcome, SlotError> {
        let _op = self.begin();
        let config = self.config();

        let path = slot_path(&config.saves_dir, name)?;
        let outcome = remove_dir(&path)?;
        match outcome {
            DeleteOutcome::Removed => log_line(&self.activity, "DELETE", name),
            DeleteOutcome::AlreadyMissing => {
                log::debug!("Delete of missing slot '{}' ignored", name)
            }
        }
        Ok(outcome)
    }

    /// Rename a slot in place. Returns the trimmed new name.
    pub fn rename_backup(&self, old_name: &str, new_name: &str) -> Result<String, SlotError> {
        let new_name = new_name.trim();
        let _op = self.begin();
        let config = self.config();

        let dst = slot_path(&config.saves_dir, new_name)?;
        if dst.exists() {
            return Err(SlotError::NameConflict(new_name.to_string()));
        }
        let src = existing_slot(&config.saves_dir, old_name)?;

        fs::rename(&src, &dst)?;
        log_line(
            &self.activity,
            "RENAME",
            &format!("{} -> {}", old_name, new_name),
        );
        Ok(new_name.to_string())
    }

    /// Slot names in ascending order. A missing root is created.
    pub fn list_slots(&self) -> Result<Vec<String>, SlotError> {
        let root = self.config().saves_dir;
        fs::create_dir_all(&root)?;

        let mut names: Vec<String> = list_subdirs(&root)?
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Slots with their modification times, in name order.
    pub fn slots(&self) -> Result<Vec<SlotInfo>, SlotError> {
        let root = self.config().saves_dir;
        fs::create_dir_all(&root)?;

        let mut slots = Vec::new();
        for (name, path) in list_subdirs(&root)? {
            match modified_time(&path) {
                Ok(time) => slots.push(SlotInfo {
                    name,
                    path,
                    last_modified: time.into(),
                }),
                Err(e) => log::warn!("Cannot read modification time of '{}': {}", name, e),
            }
        }
        slots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(slots)
    }

    pub fn slot_info(&self, name: &str) -> Result<SlotInfo, SlotError> {
        let path = existing_slot(&self.config().saves_dir, name)?;
        let last_modified = modified_time(&path)?.into();
        Ok(SlotInfo {
            name: name.to_string(),
            path,
            last_modified,
        })
    }

    pub fn slot_exists(&self, name: &str) -> bool {
        existing_slot(&self.config().saves_dir, name).is_ok()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Serialize mutating operations. A panic inside a previous operation
    /// does not lock the repository forever.
    fn begin(&self) -> MutexGuard<'_, ()> {
        self.op_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn copy_live_into(&self, config: &RepoConfig, name: &str) -> Result<(), SlotError> {
        let dst = slot_path(&config.saves_dir, name)?;
        if !config.live_save_path.exists() {
            return Err(SlotError::LiveSaveMissing(config.live_save_path.clone()));
        }
        let files = copy_dir(&config.live_save_path, &dst)?;
        log::info!("Backed up {} files into slot '{}'", files, name);
        Ok(())
    }

    /// Evict the oldest slots beyond `max_backups`. Only called after a
    /// successful create; individual failures are reported, not raised.
    fn cleanup_retention<F>(&self, config: &RepoConfig, evict: F) -> RetentionReport
    where
        F: Fn(&Path) -> io::Result<DeleteOutcome>,
    {
        let mut report = RetentionReport::default();
        if config.max_backups == 0 {
            return report;
        }

        let slots = match self.slots() {
            Ok(slots) => slots,
            Err(e) => {
                log::warn!("Retention skipped, cannot list slots: {}", e);
                return report;
            }
        };

        for slot in select_evictions(slots, config.max_backups) {
            match evict(&slot.path) {
                Ok(_) => {
                    log::info!("Retention removed slot '{}'", slot.name);
                    report.removed.push(slot.name);
                }
                Err(e) => {
                    log::warn!("Retention could not remove '{}': {}", slot.name, e);
                    report.failed.push((slot.name, e));
                }
            }
        }

        if !report.removed.is_empty() {
            log_line(&self.activity, "CLEANUP", &report.removed.join(", "));
        }
        report
    }
}

/// `root/name` for a name that is exactly one plain path component.
fn slot_path(root: &Path, name: &str) -> Result<PathBuf, SlotError> {
    if name.trim().is_empty() {
        return Err(SlotError::NameEmpty);
    }
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\']) {
        return Err(SlotError::InvalidName(name.to_string()));
    }
    Ok(root.join(name))
}

/// Path of a slot that exists on disk. Names that cannot be slots are not found.
fn existing_slot(root: &Path, name: &str) -> Result<PathBuf, SlotError> {
    slot_path(root, name)
        .ok()
        .filter(|path| path.is_dir())
        .ok_or_else(|| SlotError::SlotNotFound(name.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
