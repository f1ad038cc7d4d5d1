use super::*;
use crate::time_utils::{self, format_clock};
use habitus_core::{DurationKind, TimerMode};

use super::calendar::{calendar_lines, month_title};
use super::utils::{format_minutes, key_hints};
use super::widgets::{mode_color, render_controls, render_large_time, render_status};

pub fn render_focus_view(frame: &mut Frame, app: &App, body: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Countdown
            Constraint::Length(3),  // Durations
            Constraint::Min(0),
            Constraint::Length(3), // Status
            Constraint::Length(4), // Controls (2 rows)
        ])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Calendar
            Constraint::Min(5),     // Selected day
        ])
        .split(columns[1]);

    render_countdown(frame, left[0], app);
    render_durations(frame, left[1], app);
    render_status(frame, left[3], app);
    render_focus_controls(frame, left[4]);
    render_calendar(frame, right[0], app);
    render_day(frame, right[1], app);
}

fn render_countdown(frame: &mut Frame, area: Rect, app: &App) {
    let mode = app.session.mode();
    let color = mode_color(mode);

    let mut lines = vec![Line::from("")];
    lines.extend(render_large_time(
        &app.session.display(time_utils::now()),
        color,
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        mode.description(),
        Style::default().fg(color),
    )));

    let border_style = if mode == TimerMode::Paused {
        Style::default()
    } else {
        Style::default().fg(color)
    };

    let timer = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Timer ")
            .border_style(border_style),
    );
    frame.render_widget(timer, area);
}

fn render_durations(frame: &mut Frame, area: Rect, app: &App) {
    let durations = app.session.durations();
    let value_style = |kind: DurationKind| {
        if durations.minutes(kind) == 0 {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        }
    };

    let line = Line::from(vec![
        Span::styled("Focus: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            durations.label(DurationKind::Focus),
            value_style(DurationKind::Focus),
        ),
        Span::styled("   Rest: ", Style::default().fg(Color::Yellow)),
        Span::styled(
            durations.label(DurationKind::Rest),
            value_style(DurationKind::Rest),
        ),
    ]);

    let border_style = if app.session.can_start() {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Durations ")
            .border_style(border_style)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_calendar(frame: &mut Frame, area: Rect, app: &App) {
    let month = app.board.selected_month();
    let metrics = app.board.month();
    let lines = calendar_lines(
        month,
        |day| metrics.is_completed(day),
        Some(app.board.selected_day()),
        time_utils::today(),
    );

    let title = Line::from(vec![
        Span::raw(month_title(month)),
        Span::styled(
            format!("- {} intervals ", metrics.total_completed),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_day(frame: &mut Frame, area: Rect, app: &App) {
    let metrics = app.board.day();
    let day = app.board.selected_day();

    let items: Vec<ListItem> = if metrics.intervals.is_empty() {
        vec![ListItem::new(Span::styled(
            "No focus intervals",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        metrics
            .intervals
            .iter()
            .map(|span| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(
                            "{} - {}",
                            format_clock(span.started_at),
                            format_clock(span.ended_at)
                        ),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format_minutes(span.minutes),
                        Style::default().fg(Color::Magenta),
                    ),
                ]))
            })
            .collect()
    };

    let title = Line::from(vec![
        Span::raw(format!(" {} ", day)),
        Span::styled(
            format!("- {} focused ", format_minutes(metrics.total_minutes)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(list, area);
}

fn render_focus_controls(frame: &mut Frame, area: Rect) {
    let line1 = key_hints(&[
        ("Enter/Space", "Start / Rest / Resume"),
        ("C/Esc", "Cancel"),
        ("R", "Retry save"),
        ("+/-", "Focus"),
        ("</>", "Rest"),
    ]);
    let line2 = key_hints(&[
        ("h/j/k/l", "Day"),
        ("N/P", "Month"),
        ("T", "Today"),
        ("Tab", "Habits"),
        ("Q", "Quit"),
    ]);
    render_controls(frame, area, vec![Line::from(line1), Line::from(line2)]);
}
