//! Default slot names derived from the clock.
//!
//! The pattern is a strftime-style template. Naming never fails: an invalid
//! pattern, a formatting error, or a result that is blank or contains a path
//! separator falls back to [`DEFAULT_NAME_FORMAT`].

use std::fmt::{self, Write as _};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};

/// `YYYY-MM-DD_HH-MM-SS`
pub const DEFAULT_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Prefix for the backup taken before loading a slot.
pub const AUTO_LOAD_PREFIX: &str = "auto_load_";

/// Prefix for the backup taken before launching the game.
pub const AUTO_RUN_PREFIX: &str = "auto_run_";

fn try_format<Tz>(pattern: &str, now: &DateTime<Tz>) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return None;
    }

    let mut out = String::new();
    write!(out, "{}", now.format_with_items(items.iter())).ok()?;

    let usable = !out.trim().is_empty() && !out.contains(['/', '\\']);
    usable.then_some(out)
}

/// Format `now` with `pattern`, falling back to the default pattern.
pub fn generate_name<Tz>(pattern: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    try_format(pattern, now).unwrap_or_else(|| {
        log::warn!("Invalid slot name format {:?}, using default", pattern);
        now.format(DEFAULT_NAME_FORMAT).to_string()
    })
}

/// `prefix` followed by [`generate_name`]. Used for automatic backups.
pub fn generate_auto_name<Tz>(prefix: &str, pattern: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{}{}", prefix, generate_name(pattern, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn default_pattern() {
        assert_eq!(
            generate_name(DEFAULT_NAME_FORMAT, &fixed_time()),
            "2024-03-05_14-07-09"
        );
    }

    #[test]
    fn custom_pattern() {
        assert_eq!(
            generate_name("run %d.%m.%y %Hh", &fixed_time()),
            "run 05.03.24 14h"
        );
    }

    #[test]
    fn literal_pattern_is_kept() {
        assert_eq!(generate_name("quicksave", &fixed_time()), "quicksave");
    }

    #[test]
    fn invalid_pattern_falls_back() {
        assert_eq!(generate_name("%Q%", &fixed_time()), "2024-03-05_14-07-09");
    }

    #[test]
    fn blank_pattern_falls_back() {
        assert_eq!(generate_name("", &fixed_time()), "2024-03-05_14-07-09");
        assert_eq!(generate_name("   ", &fixed_time()), "2024-03-05_14-07-09");
    }

    #[test]
    fn separator_in_result_falls_back() {
        assert_eq!(generate_name("%Y/%m", &fixed_time()), "2024-03-05_14-07-09");
        assert_eq!(generate_name("%D", &fixed_time()), "2024-03-05_14-07-09");
    }

    #[test]
    fn auto_name_has_prefix() {
        assert_eq!(
            generate_auto_name(AUTO_RUN_PREFIX, DEFAULT_NAME_FORMAT, &fixed_time()),
            "auto_run_2024-03-05_14-07-09"
        );
        assert_eq!(
            generate_auto_name(AUTO_LOAD_PREFIX, "bad %Q", &fixed_time()),
            "auto_load_2024-03-05_14-07-09"
        );
    }
}
