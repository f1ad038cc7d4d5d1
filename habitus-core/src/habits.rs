use time::Date;

use crate::metrics::MonthKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub completed_dates: Vec<Date>,
}

impl Habit {
    pub fn is_completed_on(&self, day: Date) -> bool {
        self.completed_dates.contains(&day)
    }
}

/// How much of a month a habit was completed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitMonthSummary {
    pub completed_days: usize,
    pub days_in_month: u8,
    pub percentage: u32,
}

impl HabitMonthSummary {
    /// Only dates inside `month` count; duplicates are ignored.
    pub fn compute(completed_dates: &[Date], month: MonthKey) -> Self {
        let mut days: Vec<Date> = completed_dates
            .iter()
            .copied()
            .filter(|date| month.contains(*date))
            .collect();
        days.sort();
        days.dedup();

        let days_in_month = month.days();
        let percentage =
            ((days.len() as f64 / f64::from(days_in_month)) * 100.0).round() as u32;

        Self {
            completed_days: days.len(),
            days_in_month,
            percentage,
        }
    }

    /// `"completed / days"`, e.g. `"3 / 30"`.
    pub fn ratio_label(&self) -> String {
        format!("{} / {}", self.completed_days, self.days_in_month)
    }

    pub fn percentage_label(&self) -> String {
        format!("{}%", self.percentage)
    }
}
