//! Slot management: named snapshots of the game's live save directory.
//!
//! # Layout
//!
//! ```text
//! saves/                      # repository root (configurable)
//! ├── 2024-03-05_14-07-09/    # one directory per slot, named exactly as the slot
//! ├── before-boss/
//! └── auto_run_2024-03-06_20-00-00/
//! ```
//!
//! Non-directory entries at the root are ignored. The live save directory
//! (`save00`) belongs to the game and is only ever fully replaced.
//!
//! # Modules
//!
//! - [`repository`] - create, restore, overwrite, rename, delete, list
//! - [`naming`] - default names from the clock
//! - [`retention`] - oldest-first eviction after "save current"
//! - [`fs_ops`] - remove-then-copy directory replacement

pub mod fs_ops;
pub mod naming;
pub mod repository;
pub mod retention;

pub use fs_ops::DeleteOutcome;
pub use naming::{
    generate_auto_name, generate_name, AUTO_LOAD_PREFIX, AUTO_RUN_PREFIX, DEFAULT_NAME_FORMAT,
};
pub use repository::{RepoConfig, SlotInfo, SlotRepository};
pub use retention::RetentionReport;
