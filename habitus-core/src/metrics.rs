use std::collections::BTreeSet;

use time::{Date, Month, OffsetDateTime};

/// A completed focus interval as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusIntervalRecord {
    pub id: String,
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    pub owner_id: String,
}

/// Number of completed intervals on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCompletionCount {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub interval_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSpan {
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    pub minutes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayMetrics {
    pub intervals: Vec<IntervalSpan>,
    pub total_minutes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthMetrics {
    pub completed_days: BTreeSet<Date>,
    pub total_completed: u64,
}

impl MonthMetrics {
    pub fn is_completed(&self, day: Date) -> bool {
        self.completed_days.contains(&day)
    }
}

/// Whole minutes per interval and their sum, in fetch order.
pub fn compute_day_metrics(records: &[FocusIntervalRecord]) -> DayMetrics {
    let intervals: Vec<IntervalSpan> = records
        .iter()
        .map(|record| IntervalSpan {
            started_at: record.started_at,
            ended_at: record.ended_at,
            minutes: (record.ended_at - record.started_at).whole_minutes().max(0),
        })
        .collect();
    let total_minutes = intervals.iter().map(|span| span.minutes).sum();

    DayMetrics {
        intervals,
        total_minutes,
    }
}

/// Total completed intervals for the month and the set of days that have an entry.
///
/// A day with a zero count still gets marked; only the presence of an entry matters.
pub fn compute_month_metrics(counts: &[DailyCompletionCount]) -> MonthMetrics {
    let mut metrics = MonthMetrics::default();
    for entry in counts {
        metrics.total_completed += u64::from(entry.interval_count);
        match calendar_date(entry.year, entry.month, entry.day) {
            Some(date) => {
                metrics.completed_days.insert(date);
            }
            None => tracing::warn!(
                year = entry.year,
                month = entry.month,
                day = entry.day,
                "ignoring invalid date in month metrics"
            ),
        }
    }
    metrics
}

pub fn calendar_date(year: i32, month: u8, day: u8) -> Option<Date> {
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// A calendar month, used as the selection key for month metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: Month,
}

impl MonthKey {
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Date {
        Date::from_calendar_date(self.year, self.month, 1).unwrap_or(Date::MIN)
    }

    pub fn days(self) -> u8 {
        self.month.length(self.year)
    }

    pub fn next(self) -> Self {
        let month = self.month.next();
        let year = if month == Month::January {
            self.year + 1
        } else {
            self.year
        };
        Self { year, month }
    }

    pub fn previous(self) -> Self {
        let month = self.month.previous();
        let year = if month == Month::December {
            self.year - 1
        } else {
            self.year
        };
        Self { year, month }
    }

    pub fn contains(self, date: Date) -> bool {
        Self::of(date) == self
    }
}

/// Identifies one outstanding day fetch. Only the latest ticket is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayTicket {
    pub day: Date,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTicket {
    pub month: MonthKey,
    generation: u64,
}

/// Selected day and month with their derived metrics.
///
/// Each fetch is issued against a ticket; responses for superseded tickets are
/// dropped so a slow reply can never overwrite a newer selection.
#[derive(Debug, Clone)]
pub struct MetricsBoard {
    selected_day: Date,
    selected_month: MonthKey,
    day_generation: u64,
    month_generation: u64,
    day: DayMetrics,
    month: MonthMetrics,
}

impl MetricsBoard {
    pub fn new(today: Date) -> Self {
        Self {
            selected_day: today,
            selected_month: MonthKey::of(today),
            day_generation: 0,
            month_generation: 0,
            day: DayMetrics::default(),
            month: MonthMetrics::default(),
        }
    }

    pub fn selected_day(&self) -> Date {
        self.selected_day
    }

    pub fn selected_month(&self) -> MonthKey {
        self.selected_month
    }

    pub fn day(&self) -> &DayMetrics {
        &self.day
    }

    pub fn month(&self) -> &MonthMetrics {
        &self.month
    }

    pub fn select_day(&mut self, day: Date) -> DayTicket {
        self.selected_day = day;
        self.reload_day()
    }

    pub fn select_month(&mut self, month: MonthKey) -> MonthTicket {
        self.selected_month = month;
        self.reload_month()
    }

    /// Issue a fresh ticket for the selected day, superseding earlier ones.
    pub fn reload_day(&mut self) -> DayTicket {
        self.day_generation += 1;
        DayTicket {
            day: self.selected_day,
            generation: self.day_generation,
        }
    }

    pub fn reload_month(&mut self) -> MonthTicket {
        self.month_generation += 1;
        MonthTicket {
            month: self.selected_month,
            generation: self.month_generation,
        }
    }

    /// Store day records if `ticket` is still current. Returns whether they were kept.
    pub fn accept_day(&mut self, ticket: DayTicket, records: Vec<FocusIntervalRecord>) -> bool {
        if ticket.generation != self.day_generation {
            tracing::debug!(day = %ticket.day, "discarding superseded day metrics");
            return false;
        }
        self.day = compute_day_metrics(&records);
        true
    }

    pub fn accept_month(
        &mut self,
        ticket: MonthTicket,
        counts: Vec<DailyCompletionCount>,
    ) -> bool {
        if ticket.generation != self.month_generation {
            tracing::debug!(
                year = ticket.month.year,
                month = %ticket.month.month,
                "discarding superseded month metrics"
            );
            return false;
        }
        self.month = compute_month_metrics(&counts);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use time::Duration;

    fn record(id: &str, start: OffsetDateTime, minutes: i64) -> FocusIntervalRecord {
        FocusIntervalRecord {
            id: id.to_string(),
            started_at: start,
            ended_at: start + Duration::minutes(minutes),
            owner_id: "user-1".to_string(),
        }
    }

    fn count(year: i32, month: u8, day: u8, interval_count: u32) -> DailyCompletionCount {
        DailyCompletionCount {
            year,
            month,
            day,
            interval_count,
        }
    }

    #[test]
    fn empty_day_has_no_intervals() {
        let metrics = compute_day_metrics(&[]);
        assert!(metrics.intervals.is_empty());
        assert_eq!(metrics.total_minutes, 0);
    }

    #[test]
    fn single_record_counts_whole_minutes() {
        let metrics = compute_day_metrics(&[record("a", datetime!(2024-03-05 09:00 UTC), 15)]);
        assert_eq!(metrics.total_minutes, 15);
        assert_eq!(metrics.intervals[0].minutes, 15);
    }

    #[test]
    fn partial_minutes_are_truncated_and_order_kept() {
        let late = datetime!(2024-03-05 14:00 UTC);
        let early = datetime!(2024-03-05 09:00 UTC);
        let mut odd = record("b", early, 0);
        odd.ended_at = early + Duration::seconds(10 * 60 + 59);

        let metrics = compute_day_metrics(&[record("a", late, 25), odd]);

        assert_eq!(metrics.total_minutes, 35);
        assert_eq!(metrics.intervals[0].started_at, late);
        assert_eq!(metrics.intervals[1].minutes, 10);
    }

    #[test]
    fn day_metrics_are_idempotent() {
        let records = vec![
            record("a", datetime!(2024-03-05 09:00 UTC), 25),
            record("b", datetime!(2024-03-05 10:00 UTC), 5),
        ];
        assert_eq!(compute_day_metrics(&records), compute_day_metrics(&records));
    }

    #[test]
    fn month_metrics_sum_counts_and_mark_days() {
        let metrics = compute_month_metrics(&[count(2024, 3, 1, 2), count(2024, 3, 5, 3)]);

        assert_eq!(metrics.total_completed, 5);
        assert_eq!(
            metrics.completed_days.iter().copied().collect::<Vec<_>>(),
            vec![date!(2024 - 03 - 01), date!(2024 - 03 - 05)]
        );
    }

    #[test]
    fn zero_count_entry_still_marks_day() {
        let metrics = compute_month_metrics(&[count(2024, 3, 9, 0)]);
        assert_eq!(metrics.total_completed, 0);
        assert!(metrics.is_completed(date!(2024 - 03 - 09)));
    }

    #[test]
    fn invalid_dates_are_counted_but_not_marked() {
        let metrics = compute_month_metrics(&[count(2024, 2, 30, 1), count(2024, 2, 1, 1)]);
        assert_eq!(metrics.total_completed, 2);
        assert_eq!(metrics.completed_days.len(), 1);
    }

    #[test]
    fn month_key_navigation_wraps_years() {
        let december = MonthKey::of(date!(2023 - 12 - 15));
        assert_eq!(december.next(), MonthKey::of(date!(2024 - 01 - 01)));
        assert_eq!(december.next().previous(), december);
        assert_eq!(MonthKey::of(date!(2024 - 02 - 10)).days(), 29);
    }

    #[test]
    fn month_length_follows_leap_years() {
        assert_eq!(MonthKey::of(date!(2023 - 02 - 01)).days(), 28);
        assert_eq!(MonthKey::of(date!(2000 - 02 - 01)).days(), 29);
        assert_eq!(MonthKey::of(date!(1900 - 02 - 01)).days(), 28);
        assert_eq!(MonthKey::of(date!(2024 - 04 - 01)).days(), 30);
        assert_eq!(MonthKey::of(date!(2024 - 12 - 01)).days(), 31);
    }

    #[test]
    fn superseded_day_response_is_discarded() {
        let mut board = MetricsBoard::new(date!(2024 - 03 - 05));
        let first = board.select_day(date!(2024 - 03 - 06));
        let second = board.select_day(date!(2024 - 03 - 07));

        assert!(board.accept_day(second, vec![record("b", datetime!(2024-03-07 09:00 UTC), 5)]));
        assert!(!board.accept_day(first, vec![record("a", datetime!(2024-03-06 09:00 UTC), 50)]));

        assert_eq!(board.day().total_minutes, 5);
        assert_eq!(board.selected_day(), date!(2024 - 03 - 07));
    }

    #[test]
    fn day_selection_leaves_month_ticket_valid() {
        let mut board = MetricsBoard::new(date!(2024 - 03 - 05));
        let month = board.reload_month();
        board.select_day(date!(2024 - 03 - 20));

        assert!(board.accept_month(month, vec![count(2024, 3, 20, 1)]));
        assert_eq!(board.month().total_completed, 1);
    }

    #[test]
    fn month_reselection_discards_older_month() {
        let mut board = MetricsBoard::new(date!(2024 - 03 - 05));
        let march = board.reload_month();
        let april = board.select_month(MonthKey::of(date!(2024 - 04 - 01)));

        assert!(!board.accept_month(march, vec![count(2024, 3, 1, 4)]));
        assert!(board.accept_month(april, vec![count(2024, 4, 2, 1)]));
        assert!(board.month().is_completed(date!(2024 - 04 - 02)));
        assert!(!board.month().is_completed(date!(2024 - 03 - 01)));
    }
}
