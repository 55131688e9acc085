//! # noita-saves-core
//!
//! Core slot management for the Noita save manager.
//!
//! This crate is framework-agnostic and can be used by any desktop front-end
//! (Tauri, egui, ...). The front-end owns the windows and dialogs; this crate
//! owns everything that touches disk or spawns processes.
//!
//! ## Key Concepts
//!
//! - **Live save**: the game's active save directory (`save00`)
//! - **Slot**: a named full copy of the live save under the repository root
//! - **Retention**: after "save current", the oldest slots beyond
//!   `max_backups` are evicted
//! - **Task**: a blocking operation run on a worker thread whose single
//!   completion is drained by the interactive thread

pub mod error;
pub mod launcher;
pub mod logging;
pub mod paths;
pub mod persistence;
pub mod slots;
pub mod task;
pub mod workflow;

// Re-export commonly used types
pub use error::SlotError;
pub use persistence::AppConfig;
pub use slots::{RepoConfig, SlotInfo, SlotRepository};
pub use task::{TaskCompletion, TaskFailure, TaskHandle, TaskId, TaskRunner, TaskState};
pub use workflow::{LoadReport, RunReport};
