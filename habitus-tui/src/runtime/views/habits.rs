use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{enqueue_action, Action, ActionTx};

pub(super) fn handle_habits_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.habit_name_input.is_some() {
        handle_name_input_key(key, app, action_tx);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Tab => app.toggle_view(),
        KeyCode::Down | KeyCode::Char('j') => app.habit_next(),
        KeyCode::Up | KeyCode::Char('k') => app.habit_previous(),
        KeyCode::Char('a') | KeyCode::Char('A') => app.begin_habit_name(),
        KeyCode::Char(' ') => {
            if let Some(id) = app.highlighted_habit_id() {
                enqueue_action(action_tx, Action::ToggleHabit { id });
            }
        }
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            if let Some(id) = app.highlighted_habit_id() {
                enqueue_action(action_tx, Action::DeleteHabit { id });
            }
        }
        KeyCode::Enter => {
            if let Some(request) = app.select_highlighted_habit() {
                enqueue_action(action_tx, Action::LoadHabitMetrics(request));
            }
        }
        KeyCode::Esc => app.deselect_habit(),
        KeyCode::Char('n') | KeyCode::Char('N') => shift_month(app, action_tx, true),
        KeyCode::Char('p') | KeyCode::Char('P') => shift_month(app, action_tx, false),
        _ => {}
    }
}

fn handle_name_input_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Enter => {
            if let Some(name) = app.submit_habit_name() {
                enqueue_action(action_tx, Action::CreateHabit { name });
            }
        }
        KeyCode::Esc => app.cancel_habit_name(),
        KeyCode::Backspace => {
            if let Some(input) = app.habit_name_input_mut() {
                input.backspace();
            }
        }
        KeyCode::Left => {
            if let Some(input) = app.habit_name_input_mut() {
                input.move_left();
            }
        }
        KeyCode::Right => {
            if let Some(input) = app.habit_name_input_mut() {
                input.move_right();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(input) = app.habit_name_input_mut() {
                input.insert(c);
            }
        }
        _ => {}
    }
}

fn shift_month(app: &mut App, action_tx: &ActionTx, forward: bool) {
    if let Some(request) = app.shift_habit_month(forward) {
        enqueue_action(action_tx, Action::LoadHabitMetrics(request));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use habitus_core::Habit;

    use super::super::super::action_queue::channel;

    fn press(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_habits_key(KeyEvent::new(code, KeyModifiers::NONE), app, &tx);
        rx.try_recv().ok()
    }

    fn app_with_habit() -> App {
        let mut app = test_app();
        app.set_habits(vec![Habit {
            id: "h1".to_string(),
            name: "Read".to_string(),
            completed_dates: Vec::new(),
        }]);
        app
    }

    #[test]
    fn typing_a_name_creates_habit() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        for c in " Walk ".chars() {
            assert!(press(&mut app, KeyCode::Char(c)).is_none());
        }

        match press(&mut app, KeyCode::Enter) {
            Some(Action::CreateHabit { name }) => assert_eq!(name, "Walk"),
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(app.habit_name_input.is_none());
    }

    #[test]
    fn q_is_text_while_naming() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.habit_name_input.as_ref().map(|i| i.value.as_str()), Some("q"));
    }

    #[test]
    fn space_and_d_target_highlighted_habit() {
        let mut app = app_with_habit();
        match press(&mut app, KeyCode::Char(' ')) {
            Some(Action::ToggleHabit { id }) => assert_eq!(id, "h1"),
            other => panic!("unexpected action: {other:?}"),
        }
        match press(&mut app, KeyCode::Char('d')) {
            Some(Action::DeleteHabit { id }) => assert_eq!(id, "h1"),
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn month_keys_only_load_when_a_habit_is_shown() {
        let mut app = app_with_habit();
        assert!(press(&mut app, KeyCode::Char('n')).is_none());

        assert!(matches!(
            press(&mut app, KeyCode::Enter),
            Some(Action::LoadHabitMetrics(_))
        ));
        assert!(matches!(
            press(&mut app, KeyCode::Char('p')),
            Some(Action::LoadHabitMetrics(_))
        ));
    }
}
