//! Rolling retention for slots created by "save current".

use std::io;

use super::repository::SlotInfo;

/// Outcome of one retention pass. Failures are reported, never propagated.
#[derive(Debug, Default)]
pub struct RetentionReport {
    /// Slots that were evicted, oldest first.
    pub removed: Vec<String>,
    /// Slots that should have been evicted but could not be removed.
    pub failed: Vec<(String, io::Error)>,
}

impl RetentionReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Pick the slots to evict so that at most `max_backups` remain.
///
/// Oldest first by modification time, ties broken by name. `0` means
/// unlimited and never selects anything.
pub fn select_evictions(mut slots: Vec<SlotInfo>, max_backups: u32) -> Vec<SlotInfo> {
    let keep = max_backups as usize;
    if keep == 0 || slots.len() <= keep {
        return Vec::new();
    }

    slots.sort_by(|a, b| {
        a.last_modified
            .cmp(&b.last_modified)
            .then_with(|| a.name.cmp(&b.name))
    });
    let evict = slots.len() - keep;
    slots.truncate(evict);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn slot(name: &str, minute: u32) -> SlotInfo {
        SlotInfo {
            name: name.to_string(),
            path: PathBuf::from("saves").join(name),
            last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap(),
        }
    }

    fn names(slots: &[SlotInfo]) -> Vec<&str> {
        slots.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn unlimited_keeps_everything() {
        let slots = vec![slot("a", 1), slot("b", 2), slot("c", 3)];
        assert!(select_evictions(slots, 0).is_empty());
    }

    #[test]
    fn under_limit_keeps_everything() {
        let slots = vec![slot("a", 1), slot("b", 2)];
        assert!(select_evictions(slots, 2).is_empty());
    }

    #[test]
    fn evicts_oldest_first() {
        let slots = vec![slot("newest", 9), slot("oldest", 1), slot("middle", 5)];
        assert_eq!(names(&select_evictions(slots, 1)), vec!["oldest", "middle"]);
    }

    #[test]
    fn ordering_ignores_names() {
        let slots = vec![slot("a", 3), slot("z", 1), slot("m", 2)];
        assert_eq!(names(&select_evictions(slots, 2)), vec!["z"]);
    }

    #[test]
    fn ties_broken_by_name() {
        let slots = vec![slot("b", 1), slot("a", 1), slot("c", 2)];
        assert_eq!(names(&select_evictions(slots, 1)), vec!["a", "b"]);
    }

    #[test]
    fn report_cleanliness() {
        let mut report = RetentionReport::default();
        assert!(report.is_clean());
        report
            .failed
            .push(("x".into(), io::Error::new(io::ErrorKind::Other, "busy")));
        assert!(!report.is_clean());
    }
}
