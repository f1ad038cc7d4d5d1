use super::*;
use habitus_core::TimerMode;

pub fn render_header(frame: &mut Frame, area: Rect, app: &mut App) {
    // 1 blank row, 1 content row, 2-char horizontal padding
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let content_row = rows[1];
    let area = Rect {
        x: content_row.x + 2,
        y: content_row.y,
        width: content_row.width.saturating_sub(4),
        height: content_row.height,
    };

    const LABEL: &str = " Habitus";
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2 + LABEL.len() as u16),
            Constraint::Min(0),
        ])
        .split(area);

    // Throbber spins while requests are outstanding
    let throbber_area = Rect {
        x: cols[0].x + 1,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(2),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading() {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(LABEL, Style::default().fg(Color::Yellow))),
        label_area,
    );

    let muted = Style::default().fg(Color::DarkGray);
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                label,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
        } else {
            Span::styled(label, muted)
        }
    };
    let mut spans = vec![
        Span::styled(" | ", muted),
        tab("Focus", app.current_view == View::Focus),
        Span::raw("  "),
        tab("Habits", app.current_view == View::Habits),
    ];
    if app.session.mode() != TimerMode::Paused {
        spans.push(Span::styled(" | ", muted));
        spans.push(Span::styled(
            app.session.mode().description(),
            Style::default().fg(mode_color(app.session.mode())),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), cols[1]);
}

pub fn mode_color(mode: TimerMode) -> Color {
    match mode {
        TimerMode::Paused => Color::White,
        TimerMode::Focusing => Color::Green,
        TimerMode::Resting => Color::Cyan,
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let contextual_status = app.contextual_status();
    let status_text = app.status_message.as_deref().unwrap_or(&contextual_status);

    let status_lower = status_text.to_lowercase();
    let is_error = status_lower.contains("error")
        || status_lower.contains("cannot")
        || status_lower.contains("not saved")
        || status_lower.contains("cancelled");
    let is_success = status_lower.contains("saved")
        || status_lower.contains("started")
        || status_lower.contains("created")
        || status_lower.contains("deleted");

    let (border_style, text_color) = if is_error {
        (Style::default().fg(Color::Red), Color::Red)
    } else if is_success {
        (Style::default().fg(Color::Green), Color::Green)
    } else {
        (Style::default().fg(Color::White), Color::White)
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(text_color))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .border_style(border_style)
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(status, area);
}

pub fn render_controls(frame: &mut Frame, area: Rect, lines: Vec<Line<'_>>) {
    let controls = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::from(vec![Span::styled(
                " Controls ",
                Style::default().fg(Color::DarkGray),
            )]))
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(controls, area);
}

/// Digit patterns (5x5 grid, 1 = filled, 0 = empty)
const DIGIT_SIZE: usize = 5;

#[rustfmt::skip]
const DIGITS: [[u8; DIGIT_SIZE * DIGIT_SIZE]; 10] = [
    [1,1,1,1,1, 1,1,0,1,1, 1,1,0,1,1, 1,1,0,1,1, 1,1,1,1,1],
    [0,0,0,1,1, 0,0,0,1,1, 0,0,0,1,1, 0,0,0,1,1, 0,0,0,1,1],
    [1,1,1,1,1, 0,0,0,1,1, 1,1,1,1,1, 1,1,0,0,0, 1,1,1,1,1],
    [1,1,1,1,1, 0,0,0,1,1, 1,1,1,1,1, 0,0,0,1,1, 1,1,1,1,1],
    [1,1,0,1,1, 1,1,0,1,1, 1,1,1,1,1, 0,0,0,1,1, 0,0,0,1,1],
    [1,1,1,1,1, 1,1,0,0,0, 1,1,1,1,1, 0,0,0,1,1, 1,1,1,1,1],
    [1,1,1,1,1, 1,1,0,0,0, 1,1,1,1,1, 1,1,0,1,1, 1,1,1,1,1],
    [1,1,1,1,1, 0,0,0,1,1, 0,0,0,1,1, 0,0,0,1,1, 0,0,0,1,1],
    [1,1,1,1,1, 1,1,0,1,1, 1,1,1,1,1, 1,1,0,1,1, 1,1,1,1,1],
    [1,1,1,1,1, 1,1,0,1,1, 1,1,1,1,1, 0,0,0,1,1, 1,1,1,1,1],
];

/// Render an `MM:SS` string as large block digits.
pub fn render_large_time(time_str: &str, color: Color) -> Vec<Line<'static>> {
    let mut rows = vec![String::new(); DIGIT_SIZE];

    for ch in time_str.chars() {
        if ch == ':' {
            for (row, line) in rows.iter_mut().enumerate() {
                line.push_str(if row == 1 || row == 3 { " ██  " } else { "     " });
            }
        } else if let Some(digit) = ch.to_digit(10) {
            let pattern = &DIGITS[digit as usize];
            for (row, line) in rows.iter_mut().enumerate() {
                for col in 0..DIGIT_SIZE {
                    line.push(if pattern[row * DIGIT_SIZE + col] == 1 {
                        '█'
                    } else {
                        ' '
                    });
                }
                line.push(' ');
            }
        }
    }

    rows.into_iter()
        .map(|line| {
            Line::from(Span::styled(
                line,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        })
        .collect()
}
