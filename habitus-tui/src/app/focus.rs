use habitus_core::{
    CompletedInterval, DailyCompletionCount, DayTicket, DurationKind, FocusIntervalRecord,
    MonthTicket, SessionEvent, Step, TimerMode,
};
use time::{Date, Duration, OffsetDateTime};

use super::App;

impl App {
    pub fn adjust_duration(&mut self, kind: DurationKind, step: Step) {
        self.session.adjust_duration(kind, step);
        self.clear_status();
    }

    /// Enter/Space: start from paused, rest while focusing, focus again while resting.
    /// Returns an interval that must be reported.
    pub fn primary_action(&mut self, now: OffsetDateTime) -> Option<CompletedInterval> {
        match self.session.mode() {
            TimerMode::Paused => {
                self.start_focus(now);
                None
            }
            TimerMode::Focusing => self.switch_to_rest(now),
            TimerMode::Resting => {
                self.resume(now);
                None
            }
        }
    }

    pub fn start_focus(&mut self, now: OffsetDateTime) {
        match self.session.start_focus(now) {
            Ok(()) => self.set_status("Focus started".to_string()),
            Err(e) => self.set_status(format!("Cannot start: {}", e)),
        }
    }

    pub fn switch_to_rest(&mut self, now: OffsetDateTime) -> Option<CompletedInterval> {
        match self.session.switch_to_rest(now) {
            Ok(report) => {
                self.set_status("Rest started".to_string());
                // An interval closed by focus expiry stays pending until confirmed.
                report
                    .or_else(|| self.session.pending_report())
                    .and_then(|interval| self.begin_report(interval))
            }
            Err(e) => {
                self.set_status(format!("Cannot rest: {}", e));
                None
            }
        }
    }

    pub fn resume(&mut self, now: OffsetDateTime) {
        match self.session.resume(now) {
            Ok(()) => self.set_status("Focus started".to_string()),
            Err(e) => self.set_status(format!("Cannot resume: {}", e)),
        }
    }

    pub fn cancel_session(&mut self, now: OffsetDateTime) {
        if self.session.mode() == TimerMode::Paused && !self.session.durations().is_ready() {
            return;
        }
        self.session.cancel(now);
        self.set_status("Session cancelled".to_string());
    }

    /// Poll the countdowns. Returns the interval to report when focus runs out.
    pub fn tick(&mut self, now: OffsetDateTime) -> Option<CompletedInterval> {
        let mut report = None;
        for event in self.session.tick(now) {
            match event {
                SessionEvent::FocusElapsed(interval) => {
                    self.set_status("Focus time is over. Press Enter to rest".to_string());
                    if let Some(interval) = interval {
                        report = self.begin_report(interval);
                    }
                }
                SessionEvent::RestElapsed => {
                    self.set_status("Rest is over. Press Enter to focus again".to_string());
                }
            }
        }
        report
    }

    /// Mark `interval` as on the wire. `None` if it is already being sent.
    pub fn begin_report(&mut self, interval: CompletedInterval) -> Option<CompletedInterval> {
        if is_listed(&self.reporting, &interval) {
            return None;
        }
        self.reporting.push(interval);
        Some(interval)
    }

    /// `r`: send every interval that failed to save, plus the closed interval
    /// the session is still holding. Intervals already on the wire are skipped.
    pub fn retry_report(&mut self) -> Vec<CompletedInterval> {
        let mut candidates = self.failed_reports.clone();
        if let Some(pending) = self.session.pending_report() {
            if !is_listed(&candidates, &pending) {
                candidates.push(pending);
            }
        }
        if candidates.is_empty() {
            self.set_status("Nothing to retry".to_string());
            return Vec::new();
        }

        let retries: Vec<CompletedInterval> = candidates
            .into_iter()
            .filter_map(|interval| self.begin_report(interval))
            .collect();
        if retries.is_empty() {
            self.set_status("Already saving, please wait".to_string());
        } else {
            self.set_status(format!("Retrying {} focus interval(s)...", retries.len()));
        }
        retries
    }

    /// The backend stored `interval`; reload the day and month it affects.
    pub fn report_succeeded(&mut self, interval: CompletedInterval) -> (DayTicket, MonthTicket) {
        unlist(&mut self.reporting, &interval);
        unlist(&mut self.failed_reports, &interval);
        self.session.interval_reported(&interval);
        self.set_status("Focus interval saved".to_string());
        (self.board.reload_day(), self.board.reload_month())
    }

    pub fn report_failed(&mut self, interval: CompletedInterval, message: &str) {
        unlist(&mut self.reporting, &interval);
        if !is_listed(&self.failed_reports, &interval) {
            self.failed_reports.push(interval);
        }
        self.set_status(format!(
            "Error saving focus interval: {}. Press r to retry",
            message
        ));
    }

    /// Failed intervals that are not being resent right now.
    pub fn has_unsaved_reports(&self) -> bool {
        self.failed_reports
            .iter()
            .any(|interval| !is_listed(&self.reporting, interval))
    }

    pub fn shift_day(&mut self, days: i64) -> Option<DayTicket> {
        let day = self
            .board
            .selected_day()
            .checked_add(Duration::days(days))?;
        Some(self.board.select_day(day))
    }

    pub fn shift_month(&mut self, forward: bool) -> MonthTicket {
        let current = self.board.selected_month();
        let month = if forward {
            current.next()
        } else {
            current.previous()
        };
        self.board.select_month(month)
    }

    /// Jump both the day and the calendar back to `today`.
    pub fn select_today(&mut self, today: Date) -> (DayTicket, MonthTicket) {
        let day = self.board.select_day(today);
        let month = self.board.select_month(habitus_core::MonthKey::of(today));
        (day, month)
    }

    pub fn apply_day(&mut self, ticket: DayTicket, records: Vec<FocusIntervalRecord>) {
        if self.board.accept_day(ticket, records) {
            tracing::debug!(day = %ticket.day, "day metrics updated");
        }
    }

    pub fn apply_month(&mut self, ticket: MonthTicket, counts: Vec<DailyCompletionCount>) {
        if self.board.accept_month(ticket, counts) {
            tracing::debug!(
                completed = self.board.month().total_completed,
                "month metrics updated"
            );
        }
    }
}

// Intervals are identified by their start; a retry resends the same instants.
fn is_listed(list: &[CompletedInterval], interval: &CompletedInterval) -> bool {
    list.iter().any(|listed| listed.started_at == interval.started_at)
}

fn unlist(list: &mut Vec<CompletedInterval>, interval: &CompletedInterval) {
    list.retain(|listed| listed.started_at != interval.started_at);
}
