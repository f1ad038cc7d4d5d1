use super::*;
use crate::time_utils;

use super::calendar::{calendar_lines, month_title};
use super::utils::{centered_rect, key_hints};
use super::widgets::{render_controls, render_status};

pub fn render_habits_view(frame: &mut Frame, app: &App, body: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3), // Status
            Constraint::Length(4), // Controls
        ])
        .split(body);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_habit_list(frame, panels[0], app);
    render_habit_metrics(frame, panels[1], app);
    render_status(frame, rows[1], app);
    render_habit_controls(frame, rows[2]);

    if let Some(input) = &app.habit_name_input {
        render_name_dialog(frame, input);
    }
}

fn render_habit_list(frame: &mut Frame, area: Rect, app: &App) {
    let today = time_utils::today();
    let items: Vec<ListItem> = app
        .habits
        .iter()
        .map(|habit| {
            let done = habit.is_completed_on(today);
            let (mark, mark_style) = if done {
                ("[x] ", Style::default().fg(Color::Green))
            } else {
                ("[ ] ", Style::default().fg(Color::DarkGray))
            };
            let name_style = if app.selected_habit_id.as_deref() == Some(habit.id.as_str()) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, mark_style),
                Span::styled(habit.name.clone(), name_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Habits ")
                .padding(Padding::horizontal(1)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.habits.is_empty() {
        state.select(Some(app.habit_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_habit_metrics(frame: &mut Frame, area: Rect, app: &App) {
    let Some(habit) = app.selected_habit() else {
        let hint = Paragraph::new(Span::styled(
            "Press Enter on a habit to see its month",
            Style::default().fg(Color::DarkGray),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Month ")
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(hint, area);
        return;
    };

    let completed = app
        .habit_metrics
        .as_ref()
        .map(|metrics| metrics.completed_dates.as_slice())
        .unwrap_or(&[]);
    let mut lines = calendar_lines(
        app.habit_month,
        |day| completed.contains(&day),
        None,
        time_utils::today(),
    );
    lines.push(Line::from(""));
    lines.push(match &app.habit_summary {
        Some(summary) => Line::from(vec![
            Span::styled("Completed: ", Style::default().fg(Color::Yellow)),
            Span::styled(summary.ratio_label(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  ({})", summary.percentage_label()),
                Style::default().fg(Color::Green),
            ),
        ]),
        None => Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        )),
    });

    let title = format!(" {} -{}", habit.name, month_title(app.habit_month));
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_name_dialog(frame: &mut Frame, input: &crate::app::TextInput) {
    let area = centered_rect(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let (before, after) = input.split_at_cursor();
    let line = Line::from(vec![
        Span::styled(before.to_string(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::Yellow)),
        Span::styled(after.to_string(), Style::default().fg(Color::White)),
    ]);

    let dialog = Paragraph::new(vec![line]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(Span::styled(
                " New habit ",
                Style::default().fg(Color::Yellow),
            ))
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(dialog, area);
}

fn render_habit_controls(frame: &mut Frame, area: Rect) {
    let line1 = key_hints(&[
        ("j/k", "Navigate"),
        ("Space", "Toggle today"),
        ("A", "Add"),
        ("D", "Delete"),
    ]);
    let line2 = key_hints(&[
        ("Enter", "Show month"),
        ("Esc", "Hide month"),
        ("N/P", "Month"),
        ("Tab", "Focus"),
        ("Q", "Quit"),
    ]);
    render_controls(frame, area, vec![Line::from(line1), Line::from(line2)]);
}
