//! Directory-level primitives shared by backup and restore.
//!
//! Copies are always full replacements: the destination is removed, then the
//! source tree is copied in. A crash in between leaves the destination
//! partial or missing; nothing is rolled back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::SlotError;

/// Result of a best-effort directory removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    AlreadyMissing,
}

/// Replace `dst` with a recursive copy of `src`. Returns the number of files copied.
///
/// Symlinks are followed, so linked content is copied rather than the link.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<u64, SlotError> {
    if dst.exists() {
        fs::remove_dir_all(dst)?;
    }
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Remove a directory tree. A missing directory, including one that vanishes
/// mid-call, is not an error.
pub fn remove_dir(path: &Path) -> io::Result<DeleteOutcome> {
    if !path.exists() {
        return Ok(DeleteOutcome::AlreadyMissing);
    }
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(DeleteOutcome::Removed),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(DeleteOutcome::AlreadyMissing),
        Err(e) => Err(e),
    }
}

/// Immediate subdirectories of `root` as `(name, path)`. Files and entries
/// whose names are not valid UTF-8 are skipped.
pub fn list_subdirs(root: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => out.push((name, path)),
            Err(raw) => log::debug!("Skipping non UTF-8 entry {:?}", raw),
        }
    }
    Ok(out)
}

pub fn modified_time(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn copy_dir_copies_nested_tree() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        write(&src.join("player.xml"), "hp=100");
        write(&src.join("world/chunk_0.bin"), "chunk");
        fs::create_dir_all(src.join("empty")).unwrap();

        let copied = copy_dir(&src, &dst).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("player.xml")).unwrap(), "hp=100");
        assert_eq!(
            fs::read_to_string(dst.join("world/chunk_0.bin")).unwrap(),
            "chunk"
        );
        assert!(dst.join("empty").is_dir());
    }

    #[test]
    fn copy_dir_replaces_instead_of_merging() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        write(&src.join("a.txt"), "new");
        write(&dst.join("a.txt"), "old");
        write(&dst.join("stale.txt"), "left over");

        copy_dir(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
        assert!(!dst.join("stale.txt").exists());
    }

    #[test]
    fn copy_dir_missing_source_fails() {
        let dir = tempdir().unwrap();
        let err = copy_dir(&dir.path().join("nope"), &dir.path().join("dst")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn remove_dir_outcomes() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("slot");
        write(&target.join("f"), "x");

        assert_eq!(remove_dir(&target).unwrap(), DeleteOutcome::Removed);
        assert!(!target.exists());
        assert_eq!(remove_dir(&target).unwrap(), DeleteOutcome::AlreadyMissing);
    }

    #[test]
    fn list_subdirs_skips_files() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        write(&dir.path().join("notes.txt"), "not a slot");

        let mut names: Vec<_> = list_subdirs(dir.path())
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["a", "b"]);
    }
}
