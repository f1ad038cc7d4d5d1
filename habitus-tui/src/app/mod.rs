use habitus_core::{
    CompletedInterval, FocusSession, Habit, HabitMonthSummary, MetricsBoard, MonthKey,
    SessionTiming,
};
use time::{Date, OffsetDateTime};

use crate::config::HabitusConfig;

mod focus;
mod habits;
mod state;
pub use habits::HabitMetricsRequest;
pub use state::{ExitReason, TextInput, View};

pub struct App {
    pub running: bool,
    pub exit_reason: ExitReason,
    pub status_message: Option<String>,
    pub current_view: View,

    // Focus screen
    pub session: FocusSession,
    pub board: MetricsBoard,
    /// Intervals whose reports are currently on the wire.
    pub reporting: Vec<CompletedInterval>,
    /// Intervals the backend refused to store; `r` sends them again.
    pub failed_reports: Vec<CompletedInterval>,

    // Habits screen
    pub habits: Vec<Habit>,
    pub habit_index: usize,
    pub selected_habit_id: Option<String>,
    pub habit_metrics: Option<Habit>,
    pub habit_summary: Option<HabitMonthSummary>,
    pub habit_month: MonthKey,
    habit_metrics_generation: u64,
    /// Some(_) while the user is typing a new habit name.
    pub habit_name_input: Option<TextInput>,

    // Loading indicator
    pub in_flight: usize,
    pub throbber_state: throbber_widgets_tui::ThrobberState,
}

impl App {
    pub fn new(cfg: &HabitusConfig, today: Date) -> Self {
        Self {
            running: true,
            exit_reason: ExitReason::Quit,
            status_message: None,
            current_view: View::Focus,
            session: FocusSession::new(SessionTiming::from_minute_seconds(cfg.minute_seconds)),
            board: MetricsBoard::new(today),
            reporting: Vec::new(),
            failed_reports: Vec::new(),
            habits: Vec::new(),
            habit_index: 0,
            selected_habit_id: None,
            habit_metrics: None,
            habit_summary: None,
            habit_month: MonthKey::of(today),
            habit_metrics_generation: 0,
            habit_name_input: None,
            in_flight: 0,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn navigate_to(&mut self, view: View) {
        self.current_view = view;
        self.clear_status();
    }

    pub fn toggle_view(&mut self) {
        let next = match self.current_view {
            View::Focus => View::Habits,
            View::Habits => View::Focus,
        };
        self.navigate_to(next);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn request_started(&mut self) {
        self.in_flight += 1;
    }

    pub fn request_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// The API no longer accepts our token. Stop every countdown and leave the
    /// event loop so the user can log in again.
    pub fn expire_session(&mut self, now: OffsetDateTime) {
        tracing::warn!("session expired, returning to login");
        self.session.cancel(now);
        self.reporting.clear();
        self.exit_reason = ExitReason::AuthExpired;
        self.running = false;
    }

    /// Status line text when no explicit message is set.
    pub fn contextual_status(&self) -> String {
        match self.current_view {
            View::Focus => {
                if self.has_unsaved_reports() {
                    "Focus interval not saved yet. Press r to retry".to_string()
                } else if self.session.can_start() {
                    "Ready. Press Enter to start focusing".to_string()
                } else {
                    self.session.mode().description().to_string()
                }
            }
            View::Habits => match &self.habit_name_input {
                Some(_) => "Type a name and press Enter to create the habit".to_string(),
                None if self.habits.is_empty() => "No habits yet. Press a to add one".to_string(),
                None => "Space toggles today, Enter shows the month".to_string(),
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn test_app() -> App {
    use time::macros::date;

    App::new(&HabitusConfig::default(), date!(2024 - 03 - 20))
}
