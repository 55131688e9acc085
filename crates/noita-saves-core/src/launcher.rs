//! Fire-and-forget game launch.
//!
//! The executable is started with no arguments, its working directory set to
//! the executable's parent, and all standard streams discarded. The exit code
//! is never reported; a detached thread only reaps the child so it does not
//! linger as a zombie.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use crate::error::SlotError;

/// Configuration for launching the game.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Path to the game executable
    pub executable: PathBuf,
    /// Working directory; defaults to the executable's parent
    pub working_dir: Option<PathBuf>,
}

impl LaunchConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        let executable = executable.into();
        let working_dir = executable
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Self {
            executable,
            working_dir,
        }
    }

    /// Override the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Start the process and return its pid.
pub fn launch(config: &LaunchConfig) -> Result<u32, SlotError> {
    let mut cmd = Command::new(&config.executable);
    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let mut child = cmd.spawn().map_err(|source| SlotError::LaunchFailure {
        path: config.executable.clone(),
        source,
    })?;
    let pid = child.id();
    log::info!("Launched {} (pid {})", config.executable.display(), pid);

    let reaped = thread::Builder::new()
        .name("game-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => log::debug!("Game process {} exited: {}", pid, status),
            Err(e) => log::debug!("Lost track of game process {}: {}", pid, e),
        });
    if let Err(e) = reaped {
        log::debug!("No reaper thread for pid {}: {}", pid, e);
    }

    Ok(pid)
}
