use super::*;
use habitus_core::MonthKey;
use time::{Date, Duration, Weekday};

const WEEKDAYS: &str = " Mo Tu We Th Fr Sa Su";

/// Month grid, Monday first. Marked days are green, `selected` is reversed and
/// `today` is underlined.
pub fn calendar_lines(
    month: MonthKey,
    is_marked: impl Fn(Date) -> bool,
    selected: Option<Date>,
    today: Date,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        WEEKDAYS,
        Style::default().fg(Color::DarkGray),
    ))];

    let first = month.first_day();
    let lead = first.weekday().number_days_from_monday() as usize;
    let mut week: Vec<Span<'static>> = vec![Span::raw("   "); lead];

    for offset in 0..i64::from(month.days()) {
        let day = first + Duration::days(offset);
        let mut style = if is_marked(day) {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        if day == today {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if Some(day) == selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        week.push(Span::raw(" "));
        week.push(Span::styled(format!("{:>2}", day.day()), style));

        if day.weekday() == Weekday::Sunday || offset + 1 == i64::from(month.days()) {
            lines.push(Line::from(std::mem::take(&mut week)));
        }
    }

    lines
}

pub fn month_title(month: MonthKey) -> String {
    format!(" {} {} ", month.month, month.year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn march_2024_starts_on_friday() {
        let month = MonthKey::of(date!(2024 - 03 - 01));
        let lines = calendar_lines(month, |_| false, None, date!(2024 - 03 - 20));

        // Header plus five week rows (Fri 1st .. Sun 31st)
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1].to_string(), "              1  2  3");
        assert_eq!(lines[5].to_string(), " 25 26 27 28 29 30 31");
    }

    #[test]
    fn marked_days_are_green() {
        let month = MonthKey::of(date!(2024 - 03 - 01));
        let marked = date!(2024 - 03 - 04);
        let lines = calendar_lines(month, |d| d == marked, None, date!(2024 - 03 - 20));

        // Monday 4th is the first cell of the second week row
        let cell = &lines[2].spans[1];
        assert_eq!(cell.content, " 4");
        assert_eq!(cell.style.fg, Some(Color::Green));
    }
}
