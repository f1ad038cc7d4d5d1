use crate::app::App;
use crate::time_utils;
use crossterm::event::{KeyCode, KeyEvent};
use habitus_core::{DurationKind, Step};

use super::super::action_queue::{enqueue_action, Action, ActionTx};

pub(super) fn handle_focus_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let now = time_utils::now();
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Tab => app.toggle_view(),

        // Durations
        KeyCode::Char('+') | KeyCode::Char('=') => {
            app.adjust_duration(DurationKind::Focus, Step::Increase)
        }
        KeyCode::Char('-') => app.adjust_duration(DurationKind::Focus, Step::Decrease),
        KeyCode::Char('>') | KeyCode::Char('.') => {
            app.adjust_duration(DurationKind::Rest, Step::Increase)
        }
        KeyCode::Char('<') | KeyCode::Char(',') => {
            app.adjust_duration(DurationKind::Rest, Step::Decrease)
        }

        // Session
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(interval) = app.primary_action(now) {
                enqueue_action(action_tx, Action::ReportInterval(interval));
            }
        }
        KeyCode::Char('c') | KeyCode::Esc => app.cancel_session(now),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            for interval in app.retry_report() {
                enqueue_action(action_tx, Action::ReportInterval(interval));
            }
        }

        // Calendar
        KeyCode::Left | KeyCode::Char('h') => shift_day(app, action_tx, -1),
        KeyCode::Right | KeyCode::Char('l') => shift_day(app, action_tx, 1),
        KeyCode::Up | KeyCode::Char('k') => shift_day(app, action_tx, -7),
        KeyCode::Down | KeyCode::Char('j') => shift_day(app, action_tx, 7),
        KeyCode::Char('n') | KeyCode::Char('N') => {
            let ticket = app.shift_month(true);
            enqueue_action(action_tx, Action::LoadMonth(ticket));
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            let ticket = app.shift_month(false);
            enqueue_action(action_tx, Action::LoadMonth(ticket));
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            let (day, month) = app.select_today(time_utils::today());
            enqueue_action(action_tx, Action::LoadDay(day));
            enqueue_action(action_tx, Action::LoadMonth(month));
        }
        _ => {}
    }
}

fn shift_day(app: &mut App, action_tx: &ActionTx, days: i64) {
    if let Some(ticket) = app.shift_day(days) {
        enqueue_action(action_tx, Action::LoadDay(ticket));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{test_app, View};
    use crossterm::event::KeyModifiers;
    use habitus_core::TimerMode;

    use super::super::super::action_queue::channel;

    fn press(app: &mut App, code: KeyCode) -> Vec<Action> {
        let (tx, mut rx) = channel();
        handle_focus_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        let mut actions = Vec::new();
        while let Ok(action) = rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    #[test]
    fn duration_keys_step_and_clamp() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('<'));
        press(&mut app, KeyCode::Char('>'));

        let durations = app.session.durations();
        assert_eq!(durations.focus_minutes, 5);
        assert_eq!(durations.rest_minutes, 2);
    }

    #[test]
    fn enter_without_durations_queues_nothing() {
        let mut app = test_app();
        assert!(press(&mut app, KeyCode::Enter).is_empty());
        assert_eq!(app.session.mode(), TimerMode::Paused);
    }

    #[test]
    fn switching_to_rest_queues_one_report() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Char('>'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.mode(), TimerMode::Focusing);

        let actions = press(&mut app, KeyCode::Char(' '));
        assert!(matches!(actions.as_slice(), [Action::ReportInterval(_)]));
        assert_eq!(app.session.mode(), TimerMode::Resting);

        // Retrying while the report is in flight sends nothing new.
        assert!(press(&mut app, KeyCode::Char('r')).is_empty());
    }

    #[test]
    fn calendar_keys_load_only_their_granularity() {
        let mut app = test_app();
        assert!(matches!(
            press(&mut app, KeyCode::Char('h')).as_slice(),
            [Action::LoadDay(_)]
        ));
        assert!(matches!(
            press(&mut app, KeyCode::Char('n')).as_slice(),
            [Action::LoadMonth(_)]
        ));
        assert!(matches!(
            press(&mut app, KeyCode::Char('t')).as_slice(),
            [Action::LoadDay(_), Action::LoadMonth(_)]
        ));
    }

    #[test]
    fn tab_switches_to_habits() {
        let mut app = test_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Habits);
    }
}
