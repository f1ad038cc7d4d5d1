use crate::api::ApiError;
use crate::app::HabitMetricsRequest;
use habitus_core::{
    CompletedInterval, DailyCompletionCount, DayTicket, FocusIntervalRecord, Habit, MonthTicket,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Work queued by key handlers and by finished background requests.
///
/// Request variants spawn an API call; the matching `*Finished`/`*Loaded`
/// variant carries its result back to the event loop.
#[derive(Debug)]
pub(super) enum Action {
    ReportInterval(CompletedInterval),
    LoadDay(DayTicket),
    LoadMonth(MonthTicket),
    LoadHabits,
    CreateHabit { name: String },
    ToggleHabit { id: String },
    DeleteHabit { id: String },
    LoadHabitMetrics(HabitMetricsRequest),

    ReportFinished {
        interval: CompletedInterval,
        result: Result<(), ApiError>,
    },
    DayLoaded {
        ticket: DayTicket,
        result: Result<Vec<FocusIntervalRecord>, ApiError>,
    },
    MonthLoaded {
        ticket: MonthTicket,
        result: Result<Vec<DailyCompletionCount>, ApiError>,
    },
    HabitsLoaded {
        result: Result<Vec<Habit>, ApiError>,
    },
    HabitCreated {
        result: Result<(), ApiError>,
    },
    HabitToggled {
        id: String,
        result: Result<(), ApiError>,
    },
    HabitDeleted {
        id: String,
        result: Result<(), ApiError>,
    },
    HabitMetricsLoaded {
        request: HabitMetricsRequest,
        result: Result<Habit, ApiError>,
    },
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}

pub(super) fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}
