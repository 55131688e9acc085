//! Composite user actions built from repository operations.
//!
//! These are the units a front-end hands to a [`TaskRunner`](crate::task::TaskRunner):
//! each runs to completion on one worker and returns a single result.

use serde::Serialize;

use crate::error::SlotError;
use crate::launcher::{launch, LaunchConfig};
use crate::persistence::AppConfig;
use crate::slots::{SlotRepository, AUTO_LOAD_PREFIX, AUTO_RUN_PREFIX};

/// Result of loading a slot into the live save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub slot: String,
    /// Name of the backup taken first, if auto-backup on load is enabled.
    pub auto_backup: Option<String>,
}

/// Result of "run with slot".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub slot: String,
    pub auto_backup: Option<String>,
    pub pid: u32,
}

/// Back up the live save under the user-entered name, or a generated one
/// when the input is blank.
pub fn save_current(repo: &SlotRepository, input: &str) -> Result<String, SlotError> {
    let name = input.trim();
    repo.create_backup((!name.is_empty()).then_some(name))
}

/// Restore `slot` into the live save, optionally backing up the live save first.
pub fn load_slot(
    repo: &SlotRepository,
    config: &AppConfig,
    slot: &str,
) -> Result<LoadReport, SlotError> {
    let auto_backup = if config.auto_backup_on_load {
        Some(take_auto_backup(repo, AUTO_LOAD_PREFIX)?)
    } else {
        None
    };
    repo.restore_backup(slot)?;

    Ok(LoadReport {
        slot: slot.to_string(),
        auto_backup,
    })
}

/// Restore `slot` and start the game.
///
/// The executable is checked before anything on disk changes.
pub fn run_with_slot(
    repo: &SlotRepository,
    config: &AppConfig,
    slot: &str,
) -> Result<RunReport, SlotError> {
    let exe = config.exe_path();
    if !exe.is_file() {
        return Err(SlotError::ExecutableMissing(exe));
    }

    let auto_backup = if config.auto_backup_on_run {
        Some(take_auto_backup(repo, AUTO_RUN_PREFIX)?)
    } else {
        None
    };
    repo.restore_backup(slot)?;
    let pid = launch(&LaunchConfig::new(exe))?;

    Ok(RunReport {
        slot: slot.to_string(),
        auto_backup,
        pid,
    })
}

/// Whether the front-end should ask before deleting a slot.
pub fn delete_requires_confirmation(config: &AppConfig) -> bool {
    config.confirm_on_delete
}

fn take_auto_backup(repo: &SlotRepository, prefix: &str) -> Result<String, SlotError> {
    let name = repo.auto_name(prefix);
    repo.create_backup(Some(&name)).map_err(|e| SlotError::AutoBackup(Box::new(e)))
}

// ============================================================================
// TESTS
// ============================================================================
