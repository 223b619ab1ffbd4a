/// Week buckets used as aggregation keys.
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

/// A Monday-to-Sunday window. Only the start date is stored, so two windows
/// are the same key exactly when they start on the same Monday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// The window of the ISO week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let diff = date.weekday().num_days_from_monday();
        Self {
            start: date - Duration::days(i64::from(diff)),
        }
    }

    /// The window containing the calendar day of `moment`; the time of day is dropped.
    pub fn of(moment: DateTime<Local>) -> Self {
        Self::containing(moment.date_naive())
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end().format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn normalizes_to_monday() {
        let window = WeekWindow::containing(date(2024, 3, 5));
        assert_eq!(window.start(), date(2024, 3, 4));
        assert_eq!(window.end(), date(2024, 3, 10));
    }

    #[test]
    fn monday_and_sunday_stay_in_their_week() {
        assert_eq!(WeekWindow::containing(date(2024, 3, 4)).start(), date(2024, 3, 4));
        assert_eq!(WeekWindow::containing(date(2024, 3, 10)).start(), date(2024, 3, 4));
    }

    #[test]
    fn same_iso_week_is_same_key() {
        let tuesday = WeekWindow::containing(date(2024, 3, 5));
        let sunday = WeekWindow::containing(date(2024, 3, 10));
        let next_monday = WeekWindow::containing(date(2024, 3, 11));

        assert_eq!(tuesday, sunday);
        assert_ne!(tuesday, next_monday);
        assert_ne!(sunday, next_monday);

        let keys: HashSet<_> = [tuesday, sunday, next_monday].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn time_of_day_is_ignored() {
        let morning = Local.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        let evening = Local.with_ymd_and_hms(2024, 3, 5, 20, 0, 0).unwrap();
        assert_eq!(WeekWindow::of(morning), WeekWindow::of(evening));
        assert_eq!(WeekWindow::of(morning).start(), date(2024, 3, 4));
    }

    #[test]
    fn window_crosses_year_boundary() {
        let window = WeekWindow::containing(date(2025, 1, 1));
        assert_eq!(window.start(), date(2024, 12, 30));
        assert_eq!(WeekWindow::containing(date(2025, 1, 5)), window);
        assert_ne!(WeekWindow::containing(date(2025, 1, 6)), window);
    }

    #[test]
    fn label_spans_both_ends() {
        assert_eq!(
            WeekWindow::containing(date(2024, 3, 5)).label(),
            "2024-03-04 to 2024-03-10"
        );
    }
}
