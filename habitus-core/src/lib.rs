//! Focus-session timer and metrics for Habitus.
//!
//! Everything here is pure: callers pass the current instant in, and network or
//! terminal concerns live in `habitus-tui`.

pub mod countdown;
pub mod duration;
pub mod habits;
pub mod metrics;
pub mod session;

pub use countdown::Countdown;
pub use duration::{add_seconds, format_countdown, DurationConfig, DurationKind, Step};
pub use habits::{Habit, HabitMonthSummary};
pub use metrics::{
    compute_day_metrics, compute_month_metrics, DailyCompletionCount, DayMetrics, DayTicket,
    FocusIntervalRecord, IntervalSpan, MetricsBoard, MonthKey, MonthMetrics, MonthTicket,
};
pub use session::{
    ActiveInterval, CompletedInterval, FocusSession, SessionError, SessionEvent, SessionTiming,
    TimerMode,
};
