use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

mod calendar;
mod focus_view;
mod habits_view;
pub(super) mod utils;
pub(super) mod widgets;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(frame.area());

    widgets::render_header(frame, root[0], app);

    let body = root[1];
    match app.current_view {
        View::Focus => focus_view::render_focus_view(frame, app, body),
        View::Habits => habits_view::render_habits_view(frame, app, body),
    }
}
