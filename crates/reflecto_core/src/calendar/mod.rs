//! Date-scoped view filters over the entry list.
//!
//! Day membership compares the calendar date of `created_at` in the
//! caller's timezone; previous/next navigation compares raw entry
//! timestamps, not days, and jumps to the nearest one.

use crate::model::entry::Entry;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::BTreeSet;

/// Entries whose creation instant falls on `day` in timezone `tz`.
pub fn entries_on_day<'a, Tz: TimeZone>(
    entries: &'a [Entry],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Entry> {
    entries
        .iter()
        .filter(|entry| local_day(entry.created_at, tz) == day)
        .collect()
}

/// Distinct calendar days (in `tz`) holding at least one entry, sorted
/// ascending. Drives day highlighting in a calendar widget.
pub fn days_with_entries<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> BTreeSet<NaiveDate> {
    entries
        .iter()
        .map(|entry| local_day(entry.created_at, tz))
        .collect()
}

/// Nearest entry instant strictly before `selected`, or `None` when no
/// such entry exists and backward navigation is disabled.
pub fn previous_entry_at(entries: &[Entry], selected: DateTime<Utc>) -> Option<DateTime<Utc>> {
    entries
        .iter()
        .map(|entry| entry.created_at)
        .filter(|at| *at < selected)
        .max()
}

/// Nearest entry instant strictly after `selected`, or `None` when no
/// such entry exists and forward navigation is disabled.
pub fn next_entry_at(entries: &[Entry], selected: DateTime<Utc>) -> Option<DateTime<Utc>> {
    entries
        .iter()
        .map(|entry| entry.created_at)
        .filter(|at| *at > selected)
        .min()
}

fn local_day<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}
