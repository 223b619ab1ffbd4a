use chrono::{DateTime, Local, NaiveDate};

use crate::service::WeekGroup;
use crate::types::{Category, TaskRecord};
use crate::week::WeekWindow;

use super::{Total, UNCATEGORIZED, totals_by};

/// How many consecutive weeks a rolling window spans.
pub const WINDOW_WEEKS: usize = 4;

/// Up to four consecutive weekly groups, newest first, starting at a picked week
/// and reaching back toward older weeks.
pub struct RollingWindow<'g, 'a> {
    weeks: &'g [WeekGroup<'a>],
}

impl<'g, 'a> RollingWindow<'g, 'a> {
    /// `groups` must be ordered newest first. `None` when `index` is past the end.
    pub fn select(groups: &'g [WeekGroup<'a>], index: usize) -> Option<Self> {
        if index >= groups.len() {
            return None;
        }
        let end = (index + WINDOW_WEEKS).min(groups.len());
        Some(Self {
            weeks: &groups[index..end],
        })
    }

    pub fn weeks(&self) -> &'g [WeekGroup<'a>] {
        self.weeks
    }

    /// From the start of the oldest week to the end of the newest.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        let newest = self.weeks[0].window;
        let oldest = self.weeks[self.weeks.len() - 1].window;
        (oldest.start(), newest.end())
    }

    pub fn records(&self) -> impl Iterator<Item = &'a TaskRecord> + 'g {
        self.weeks.iter().flat_map(|week| week.records.iter().copied())
    }

    pub fn category_totals(&self, categories: &[Category], now: DateTime<Local>) -> Vec<Total> {
        category_totals(self.records(), categories, now)
    }

    pub fn task_totals(&self, now: DateTime<Local>) -> Vec<Total> {
        totals_by(self.records(), now, |record| record.name.clone())
    }
}

impl WeekGroup<'_> {
    pub fn category_totals(&self, categories: &[Category], now: DateTime<Local>) -> Vec<Total> {
        category_totals(self.records.iter().copied(), categories, now)
    }

    pub fn task_totals(&self, now: DateTime<Local>) -> Vec<Total> {
        totals_by(self.records.iter().copied(), now, |record| record.name.clone())
    }
}

fn category_totals<'a>(
    records: impl IntoIterator<Item = &'a TaskRecord>,
    categories: &[Category],
    now: DateTime<Local>,
) -> Vec<Total> {
    totals_by(records, now, |record| {
        categories
            .iter()
            .find(|category| category.id == record.category_id)
            .map(|category| category.name.clone())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    })
}

/// Distinct start days across all groups, newest first.
pub fn deletion_days(groups: &[WeekGroup<'_>]) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = groups
        .iter()
        .flat_map(|group| group.records.iter())
        .map(|record| record.start_time.date_naive())
        .collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();
    days
}

/// Records started on `day`, latest start first.
pub fn entries_on<'a>(groups: &[WeekGroup<'a>], day: NaiveDate) -> Vec<&'a TaskRecord> {
    let window = WeekWindow::containing(day);
    let mut entries: Vec<&TaskRecord> = groups
        .iter()
        .filter(|group| group.window == window)
        .flat_map(|group| group.records.iter().copied())
        .filter(|record| record.start_time.date_naive() == day)
        .collect();
    entries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    entries
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::clock::FakeClock;
    use crate::service::{MemoryStorage, TaskService};
    use crate::types::TaskId;

    fn at(month: u32, day: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap()
    }

    fn log(id: TaskId, name: &str, category_id: u32, start: DateTime<Local>, minutes: i64) -> TaskRecord {
        let mut task = TaskRecord::started(id, name.into(), category_id, start);
        task.complete_at(start + Duration::minutes(minutes));
        task
    }

    fn service(logs: Vec<TaskRecord>) -> TaskService<MemoryStorage, FakeClock> {
        let storage = MemoryStorage {
            logs,
            ..MemoryStorage::default()
        };
        TaskService::new(storage, FakeClock::at(at(4, 1, 12))).unwrap()
    }

    /// One log per week for six weeks, newest week starting 2024-03-25.
    fn six_weeks() -> TaskService<MemoryStorage, FakeClock> {
        let logs = (0..6)
            .map(|week| log(week + 1, "Weekly", 1, at(2, 20, 9) + Duration::weeks(i64::from(week)), 60))
            .collect();
        service(logs)
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn minutes(totals: &[Total]) -> Vec<(&str, i64)> {
        totals
            .iter()
            .map(|t| (t.label.as_str(), t.duration.num_minutes()))
            .collect()
    }

    #[test]
    fn takes_four_weeks_from_selection() {
        let service = six_weeks();
        let groups = service.weekly_groups();
        assert_eq!(groups.len(), 6);

        let window = RollingWindow::select(&groups, 1).unwrap();
        assert_eq!(window.weeks().len(), 4);
        assert_eq!(window.weeks()[0].window, groups[1].window);
        assert_eq!(window.range(), (date(2, 26), date(3, 24)));
    }

    #[test]
    fn window_shrinks_near_oldest_week() {
        let service = six_weeks();
        let groups = service.weekly_groups();

        let window = RollingWindow::select(&groups, 4).unwrap();
        assert_eq!(window.weeks().len(), 2);
        assert_eq!(window.range(), (date(2, 19), date(3, 3)));
        assert!(RollingWindow::select(&groups, 6).is_none());
    }

    #[test]
    fn aggregates_by_category_and_task() {
        let service = service(vec![
            log(1, "Emails", 1, at(3, 4, 9), 30),
            log(2, "Novel", 2, at(3, 5, 9), 90),
            log(3, "Emails", 1, at(3, 12, 9), 45),
            log(4, "Orphan", 77, at(3, 13, 9), 5),
        ]);
        let groups = service.weekly_groups();
        let window = RollingWindow::select(&groups, 0).unwrap();
        let now = service.now();

        assert_eq!(
            minutes(&window.category_totals(service.categories(), now)),
            vec![("Personal", 90), ("Work", 75), ("Uncategorized", 5)]
        );
        assert_eq!(
            minutes(&window.task_totals(now)),
            vec![("Novel", 90), ("Emails", 75), ("Orphan", 5)]
        );

        let newest = &window.weeks()[0];
        assert_eq!(
            minutes(&newest.task_totals(now)),
            vec![("Emails", 45), ("Orphan", 5)]
        );
        assert_eq!(
            minutes(&newest.category_totals(service.categories(), now)),
            vec![("Work", 45), ("Uncategorized", 5)]
        );
    }

    #[test]
    fn deletion_days_are_distinct_and_descending() {
        let service = service(vec![
            log(1, "A", 1, at(3, 4, 9), 10),
            log(2, "B", 1, at(3, 12, 9), 10),
            log(3, "C", 1, at(3, 4, 15), 10),
        ]);
        let groups = service.weekly_groups();
        assert_eq!(deletion_days(&groups), vec![date(3, 12), date(3, 4)]);
    }

    #[test]
    fn entries_on_day_latest_first() {
        let service = service(vec![
            log(1, "A", 1, at(3, 4, 9), 10),
            log(2, "B", 1, at(3, 12, 9), 10),
            log(3, "C", 1, at(3, 4, 15), 10),
        ]);
        let groups = service.weekly_groups();
        let ids: Vec<_> = entries_on(&groups, date(3, 4)).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(entries_on(&groups, date(3, 5)).is_empty());
    }
}
