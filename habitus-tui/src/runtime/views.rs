use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::ActionTx;

mod focus;
mod habits;

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    // Ctrl+C quits from anywhere, including text input
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.current_view {
        View::Focus => focus::handle_focus_key(key, app, action_tx),
        View::Habits => habits::handle_habits_key(key, app, action_tx),
    }
}
