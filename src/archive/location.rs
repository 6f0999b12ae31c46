//! Archive location templates.
//!
//! Locations may embed `{date.yyyy}`, `{date.mm}` and `{date.dd}`, which expand
//! to the zero-padded year, month (1-12) and day of month of the backup date.

use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;

/// Expand date placeholders in `template` for `date`
pub fn expand_location(template: &str, date: NaiveDate) -> PathBuf {
    let expanded = template
        .replace("{date.yyyy}", &format!("{:04}", date.year()))
        .replace("{date.mm}", &format!("{:02}", date.month()))
        .replace("{date.dd}", &format!("{:02}", date.day()));
    PathBuf::from(expanded)
}

/// Expand date placeholders using today's local date
pub fn expand_location_today(template: &str) -> PathBuf {
    expand_location(template, chrono::Local::now().date_naive())
}
