use std::fmt;

use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::countdown::Countdown;
use crate::duration::{add_seconds, format_countdown, DurationConfig, DurationKind, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    #[default]
    Paused,
    Focusing,
    Resting,
}

impl TimerMode {
    pub fn description(self) -> &'static str {
        match self {
            TimerMode::Paused => "Paused",
            TimerMode::Focusing => "Focusing",
            TimerMode::Resting => "Resting",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("focus and rest durations must both be set")]
    DurationsNotSet,
    #[error("cannot {action} while {mode}")]
    InvalidTransition { mode: TimerMode, action: &'static str },
}

/// The focus interval currently running or waiting for its report to be confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveInterval {
    pub started_at: OffsetDateTime,
    /// Set once the interval is closed. Retries re-send the same instants.
    pub ended_at: Option<OffsetDateTime>,
}

impl ActiveInterval {
    fn completed(&self) -> Option<CompletedInterval> {
        self.ended_at.map(|ended_at| CompletedInterval {
            started_at: self.started_at,
            ended_at,
        })
    }
}

/// A closed focus interval ready to be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedInterval {
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
}

/// How long one configured "minute" lasts. Shorten it to verify a session by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    pub minute: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            minute: Duration::minutes(1),
        }
    }
}

impl SessionTiming {
    pub fn from_minute_seconds(seconds: u32) -> Self {
        Self {
            minute: Duration::seconds(i64::from(seconds.max(1))),
        }
    }

    fn expiry(&self, now: OffsetDateTime, minutes: u32) -> OffsetDateTime {
        add_seconds(now, i64::from(minutes) * self.minute.whole_seconds())
    }
}

/// Events produced while polling the countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The focus countdown ran out. Carries the interval to report, if any.
    FocusElapsed(Option<CompletedInterval>),
    RestElapsed,
}

#[derive(Debug, Clone)]
pub struct FocusSession {
    mode: TimerMode,
    durations: DurationConfig,
    active: Option<ActiveInterval>,
    focus: Countdown,
    rest: Countdown,
    timing: SessionTiming,
}

impl Default for FocusSession {
    fn default() -> Self {
        Self::new(SessionTiming::default())
    }
}

impl FocusSession {
    pub fn new(timing: SessionTiming) -> Self {
        Self {
            mode: TimerMode::Paused,
            durations: DurationConfig::default(),
            active: None,
            focus: Countdown::new(),
            rest: Countdown::new(),
            timing,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn durations(&self) -> DurationConfig {
        self.durations
    }

    pub fn active_interval(&self) -> Option<ActiveInterval> {
        self.active
    }

    pub fn can_start(&self) -> bool {
        self.mode == TimerMode::Paused && self.durations.is_ready()
    }

    pub fn adjust_duration(&mut self, kind: DurationKind, step: Step) {
        self.durations.adjust(kind, step);
    }

    pub fn start_focus(&mut self, now: OffsetDateTime) -> Result<(), SessionError> {
        if self.mode != TimerMode::Paused {
            return Err(SessionError::InvalidTransition {
                mode: self.mode,
                action: "start focus",
            });
        }
        self.begin_focus(now)
    }

    /// Leave focus for rest. Returns the interval to report if one was still open.
    pub fn switch_to_rest(
        &mut self,
        now: OffsetDateTime,
    ) -> Result<Option<CompletedInterval>, SessionError> {
        if self.mode != TimerMode::Focusing {
            return Err(SessionError::InvalidTransition {
                mode: self.mode,
                action: "start rest",
            });
        }

        self.focus.pause(now);
        let report = self.close_interval(now);
        self.rest
            .arm(self.timing.expiry(now, self.durations.rest_minutes));
        self.mode = TimerMode::Resting;
        tracing::debug!(rest_minutes = self.durations.rest_minutes, "rest started");
        Ok(report)
    }

    pub fn resume(&mut self, now: OffsetDateTime) -> Result<(), SessionError> {
        if self.mode != TimerMode::Resting {
            return Err(SessionError::InvalidTransition {
                mode: self.mode,
                action: "resume",
            });
        }
        self.begin_focus(now)?;
        self.rest.pause(now);
        Ok(())
    }

    /// Return to `Paused` from any mode, forgetting durations and the open interval.
    pub fn cancel(&mut self, now: OffsetDateTime) {
        self.focus.pause(now);
        self.rest.pause(now);
        self.active = None;
        self.durations.reset();
        self.mode = TimerMode::Paused;
        tracing::debug!("session cancelled");
    }

    /// Poll both countdowns. The inactive one is paused and stays silent.
    pub fn tick(&mut self, now: OffsetDateTime) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.focus.tick(now) && self.mode == TimerMode::Focusing {
            events.push(SessionEvent::FocusElapsed(self.close_interval(now)));
        }
        if self.rest.tick(now) && self.mode == TimerMode::Resting {
            events.push(SessionEvent::RestElapsed);
        }
        events
    }

    /// Confirm that `interval` reached the backend. Clears the active interval
    /// only if it is still the one that was reported.
    pub fn interval_reported(&mut self, interval: &CompletedInterval) -> bool {
        match self.active {
            Some(active) if active.started_at == interval.started_at => {
                self.active = None;
                true
            }
            _ => false,
        }
    }

    /// A closed interval whose report has not been confirmed yet.
    pub fn pending_report(&self) -> Option<CompletedInterval> {
        self.active.and_then(|active| active.completed())
    }

    /// The `MM:SS` text for the current mode.
    pub fn display(&self, now: OffsetDateTime) -> String {
        match self.mode {
            TimerMode::Paused => format_countdown(u64::from(self.durations.focus_minutes), 0),
            TimerMode::Focusing => {
                let (minutes, seconds) = self.focus.remaining_parts(now);
                format_countdown(minutes, seconds)
            }
            TimerMode::Resting => {
                let (minutes, seconds) = self.rest.remaining_parts(now);
                format_countdown(minutes, seconds)
            }
        }
    }

    fn begin_focus(&mut self, now: OffsetDateTime) -> Result<(), SessionError> {
        if !self.durations.is_ready() {
            return Err(SessionError::DurationsNotSet);
        }
        self.active = Some(ActiveInterval {
            started_at: now,
            ended_at: None,
        });
        self.focus
            .arm(self.timing.expiry(now, self.durations.focus_minutes));
        self.mode = TimerMode::Focusing;
        tracing::debug!(
            focus_minutes = self.durations.focus_minutes,
            "focus interval started"
        );
        Ok(())
    }

    fn close_interval(&mut self, now: OffsetDateTime) -> Option<CompletedInterval> {
        let active = self.active.as_mut()?;
        if active.ended_at.is_some() {
            return None;
        }
        active.ended_at = Some(now);
        active.completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2024-03-05 09:00 UTC);

    fn ready_session() -> FocusSession {
        let mut session = FocusSession::default();
        for _ in 0..5 {
            session.adjust_duration(DurationKind::Focus, Step::Increase);
        }
        for _ in 0..2 {
            session.adjust_duration(DurationKind::Rest, Step::Increase);
        }
        session
    }

    #[test]
    fn start_requires_both_durations() {
        let mut session = FocusSession::default();
        session.adjust_duration(DurationKind::Focus, Step::Increase);

        assert_eq!(session.start_focus(T0), Err(SessionError::DurationsNotSet));
        assert_eq!(session.mode(), TimerMode::Paused);
        assert!(session.active_interval().is_none());
    }

    #[test]
    fn start_records_interval_and_arms_focus() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();

        assert_eq!(session.mode(), TimerMode::Focusing);
        assert_eq!(session.active_interval().unwrap().started_at, T0);
        assert_eq!(session.display(T0), "25:00");
        assert_eq!(session.display(T0 + Duration::seconds(90)), "23:30");
    }

    #[test]
    fn expiry_reports_without_changing_mode() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();

        let end = T0 + Duration::minutes(25);
        let events = session.tick(end);

        assert_eq!(
            events,
            vec![SessionEvent::FocusElapsed(Some(CompletedInterval {
                started_at: T0,
                ended_at: end,
            }))]
        );
        assert_eq!(session.mode(), TimerMode::Focusing);
        assert!(session.tick(end + Duration::seconds(1)).is_empty());
    }

    #[test]
    fn switch_to_rest_reports_open_interval_once() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();

        let switch = T0 + Duration::minutes(10);
        let report = session.switch_to_rest(switch).unwrap();

        assert_eq!(
            report,
            Some(CompletedInterval {
                started_at: T0,
                ended_at: switch,
            })
        );
        assert_eq!(session.mode(), TimerMode::Resting);
        assert_eq!(session.display(switch), "04:00");
        assert_eq!(
            session.tick(T0 + Duration::minutes(25)),
            vec![SessionEvent::RestElapsed]
        );
    }

    #[test]
    fn switch_after_expiry_does_not_report_twice() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();
        session.tick(T0 + Duration::minutes(25));

        let report = session.switch_to_rest(T0 + Duration::minutes(26)).unwrap();
        assert_eq!(report, None);
        assert_eq!(
            session.pending_report().map(|i| i.ended_at),
            Some(T0 + Duration::minutes(25))
        );
    }

    #[test]
    fn resume_creates_fresh_interval() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();
        let report = session
            .switch_to_rest(T0 + Duration::minutes(25))
            .unwrap()
            .unwrap();
        session.interval_reported(&report);

        let resumed = T0 + Duration::minutes(35);
        session.resume(resumed).unwrap();

        assert_eq!(session.mode(), TimerMode::Focusing);
        let active = session.active_interval().unwrap();
        assert_eq!(active.started_at, resumed);
        assert_eq!(active.ended_at, None);
    }

    #[test]
    fn late_confirmation_keeps_newer_interval() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();
        let report = session
            .switch_to_rest(T0 + Duration::minutes(25))
            .unwrap()
            .unwrap();
        session.resume(T0 + Duration::minutes(35)).unwrap();

        assert!(!session.interval_reported(&report));
        assert_eq!(
            session.active_interval().unwrap().started_at,
            T0 + Duration::minutes(35)
        );
    }

    #[test]
    fn cancel_resets_everything_from_any_mode() {
        for transitions in 0..3 {
            let mut session = ready_session();
            if transitions >= 1 {
                session.start_focus(T0).unwrap();
            }
            if transitions >= 2 {
                session.switch_to_rest(T0 + Duration::minutes(5)).unwrap();
            }

            session.cancel(T0 + Duration::minutes(6));

            assert_eq!(session.mode(), TimerMode::Paused);
            assert_eq!(session.durations(), DurationConfig::new(0, 0));
            assert!(session.active_interval().is_none());
            assert!(session.tick(T0 + Duration::hours(2)).is_empty());
        }
    }

    #[test]
    fn invalid_transitions_leave_state_untouched() {
        let mut session = ready_session();
        assert!(matches!(
            session.switch_to_rest(T0),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.resume(T0),
            Err(SessionError::InvalidTransition { .. })
        ));

        session.start_focus(T0).unwrap();
        assert!(matches!(
            session.start_focus(T0),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert_eq!(session.active_interval().unwrap().started_at, T0);
    }

    #[test]
    fn resume_is_guarded_by_durations() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();
        session.switch_to_rest(T0 + Duration::minutes(1)).unwrap();
        for _ in 0..5 {
            session.adjust_duration(DurationKind::Focus, Step::Decrease);
        }

        assert_eq!(
            session.resume(T0 + Duration::minutes(2)),
            Err(SessionError::DurationsNotSet)
        );
        assert_eq!(session.mode(), TimerMode::Resting);
    }

    #[test]
    fn short_minutes_shrink_the_countdown() {
        let mut session = FocusSession::new(SessionTiming::from_minute_seconds(1));
        session.adjust_duration(DurationKind::Focus, Step::Increase);
        session.adjust_duration(DurationKind::Rest, Step::Increase);
        session.start_focus(T0).unwrap();

        assert_eq!(session.display(T0), "00:05");
        assert_eq!(session.tick(T0 + Duration::seconds(5)).len(), 1);
    }

    #[test]
    fn rest_expiry_is_announced_without_mode_change() {
        let mut session = ready_session();
        session.start_focus(T0).unwrap();
        session.switch_to_rest(T0).unwrap();

        let events = session.tick(T0 + Duration::minutes(4));
        assert_eq!(events, vec![SessionEvent::RestElapsed]);
        assert_eq!(session.mode(), TimerMode::Resting);
    }

    #[test]
    fn paused_display_shows_planned_focus() {
        let session = ready_session();
        assert_eq!(session.display(T0), "25:00");
    }
}
