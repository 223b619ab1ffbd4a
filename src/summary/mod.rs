/// Daily and weekly time aggregates over completed records.
mod daily;
mod weekly;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local};

use crate::types::TaskRecord;

pub use daily::DailySummary;
pub use weekly::{RollingWindow, deletion_days, entries_on};

/// Label used when a record points at a category that no longer exists.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Time summed under one label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Total {
    pub label: String,
    pub duration: Duration,
}

/// Groups records by `key`, sums their durations as of `now` and orders the
/// groups by descending total. Equal totals keep the order in which their
/// label was first seen.
pub fn totals_by<'a, I, F>(records: I, now: DateTime<Local>, mut key: F) -> Vec<Total>
where
    I: IntoIterator<Item = &'a TaskRecord>,
    F: FnMut(&TaskRecord) -> String,
{
    let mut index = HashMap::<String, usize>::new();
    let mut totals = Vec::<Total>::new();
    for record in records {
        let label = key(record);
        let duration = record.duration(now);
        match index.get(&label) {
            Some(&position) => totals[position].duration += duration,
            None => {
                index.insert(label.clone(), totals.len());
                totals.push(Total { label, duration });
            }
        }
    }
    totals.sort_by(|a, b| b.duration.cmp(&a.duration));
    totals
}
