use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::types::{CategoryId, TaskRecord};

use super::{Total, totals_by};

/// Records of a single calendar day.
pub struct DailySummary<'a> {
    date: NaiveDate,
    records: Vec<&'a TaskRecord>,
}

impl<'a> DailySummary<'a> {
    pub fn new<I>(date: NaiveDate, records: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskRecord>,
    {
        let records = records
            .into_iter()
            .filter(|record| record.start_time.date_naive() == date)
            .collect();
        Self { date, records }
    }

    /// Summary of the calendar day `moment` falls on.
    pub fn for_day_of<I>(moment: DateTime<Local>, records: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskRecord>,
    {
        Self::new(moment.date_naive(), records)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn task_totals(&self, now: DateTime<Local>) -> Vec<Total> {
        totals_by(self.records.iter().copied(), now, |record| record.name.clone())
    }

    pub fn total(&self, now: DateTime<Local>) -> Duration {
        self.records
            .iter()
            .fold(Duration::zero(), |acc, record| acc + record.duration(now))
    }

    /// Category of the first record with this task name.
    pub fn category_of(&self, task_name: &str) -> Option<CategoryId> {
        self.records
            .iter()
            .find(|record| record.name == task_name)
            .map(|record| record.category_id)
    }
}
