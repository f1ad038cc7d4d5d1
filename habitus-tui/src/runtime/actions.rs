use crate::api::{ApiClient, ApiError};
use crate::app::App;
use crate::time_utils;
use std::future::Future;

use super::action_queue::{enqueue_action, Action, ActionTx};

pub(super) fn run_action(action: Action, app: &mut App, client: &ApiClient, action_tx: &ActionTx) {
    match action {
        Action::ReportInterval(interval) => {
            tracing::info!(
                started_at = %interval.started_at,
                ended_at = %interval.ended_at,
                "reporting focus interval"
            );
            spawn_request(app, client, action_tx, move |client| async move {
                Action::ReportFinished {
                    interval,
                    result: client.report_focus_time(interval).await,
                }
            });
        }
        Action::LoadDay(ticket) => {
            spawn_request(app, client, action_tx, move |client| async move {
                Action::DayLoaded {
                    ticket,
                    result: client.focus_times(ticket.day).await,
                }
            });
        }
        Action::LoadMonth(ticket) => {
            spawn_request(app, client, action_tx, move |client| async move {
                Action::MonthLoaded {
                    ticket,
                    result: client.focus_metrics(ticket.month).await,
                }
            });
        }
        Action::LoadHabits => {
            spawn_request(app, client, action_tx, |client| async move {
                Action::HabitsLoaded {
                    result: client.habits().await,
                }
            });
        }
        Action::CreateHabit { name } => {
            spawn_request(app, client, action_tx, move |client| async move {
                Action::HabitCreated {
                    result: client.create_habit(&name).await,
                }
            });
        }
        Action::ToggleHabit { id } => {
            spawn_request(app, client, action_tx, move |client| async move {
                let result = client.toggle_habit(&id).await;
                Action::HabitToggled { id, result }
            });
        }
        Action::DeleteHabit { id } => {
            spawn_request(app, client, action_tx, move |client| async move {
                let result = client.delete_habit(&id).await;
                Action::HabitDeleted { id, result }
            });
        }
        Action::LoadHabitMetrics(request) => {
            spawn_request(app, client, action_tx, move |client| async move {
                let result = client.habit_metrics(&request.id, request.month).await;
                Action::HabitMetricsLoaded { request, result }
            });
        }

        Action::ReportFinished { interval, result } => {
            app.request_finished();
            match result {
                Ok(()) => {
                    let (day, month) = app.report_succeeded(interval);
                    enqueue_action(action_tx, Action::LoadDay(day));
                    enqueue_action(action_tx, Action::LoadMonth(month));
                }
                Err(e) if e.is_auth_expired() => handle_api_error(app, client, "saving focus", &e),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to report focus interval");
                    app.report_failed(interval, &e.to_string());
                }
            }
        }
        Action::DayLoaded { ticket, result } => {
            app.request_finished();
            match result {
                Ok(records) => app.apply_day(ticket, records),
                Err(e) => handle_api_error(app, client, "loading day", &e),
            }
        }
        Action::MonthLoaded { ticket, result } => {
            app.request_finished();
            match result {
                Ok(counts) => app.apply_month(ticket, counts),
                Err(e) => handle_api_error(app, client, "loading month", &e),
            }
        }
        Action::HabitsLoaded { result } => {
            app.request_finished();
            match result {
                Ok(habits) => app.set_habits(habits),
                Err(e) => handle_api_error(app, client, "loading habits", &e),
            }
        }
        Action::HabitCreated { result } => {
            app.request_finished();
            match result {
                Ok(()) => {
                    app.set_status("Habit created".to_string());
                    enqueue_action(action_tx, Action::LoadHabits);
                }
                Err(e) => handle_api_error(app, client, "creating habit", &e),
            }
        }
        Action::HabitToggled { id, result } => {
            app.request_finished();
            match result {
                Ok(()) => {
                    enqueue_action(action_tx, Action::LoadHabits);
                    if let Some(request) = app.habit_toggled(&id) {
                        enqueue_action(action_tx, Action::LoadHabitMetrics(request));
                    }
                }
                Err(e) => handle_api_error(app, client, "toggling habit", &e),
            }
        }
        Action::HabitDeleted { id, result } => {
            app.request_finished();
            match result {
                Ok(()) => {
                    app.habit_deleted(&id);
                    enqueue_action(action_tx, Action::LoadHabits);
                }
                Err(e) => handle_api_error(app, client, "deleting habit", &e),
            }
        }
        Action::HabitMetricsLoaded { request, result } => {
            app.request_finished();
            match result {
                Ok(habit) => {
                    app.apply_habit_metrics(&request, habit);
                }
                Err(e) => handle_api_error(app, client, "loading habit metrics", &e),
            }
        }
    }
}

/// Run one API call on the tokio runtime and post its result back to the queue.
fn spawn_request<F, Fut>(app: &mut App, client: &ApiClient, action_tx: &ActionTx, request: F)
where
    F: FnOnce(ApiClient) -> Fut,
    Fut: Future<Output = Action> + Send + 'static,
{
    app.request_started();
    let future = request(client.clone());
    let action_tx = action_tx.clone();
    tokio::spawn(async move {
        enqueue_action(&action_tx, future.await);
    });
}

/// Auth expiry clears the stored session and stops the app. Anything else is
/// logged and shown in the status line with state left as it was.
fn handle_api_error(app: &mut App, client: &ApiClient, what: &str, err: &ApiError) {
    if err.is_auth_expired() {
        if let Err(e) = client.session().logout() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
        app.expire_session(time_utils::now());
        return;
    }
    tracing::warn!(error = %err, "{} failed", what);
    app.set_status(format!("Error {}: {}", what, err));
}
