use habitus_core::{Habit, HabitMonthSummary, MonthKey};

use super::{App, TextInput};

/// One outstanding `GET /habits/:id/metrics`. Only the latest one is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitMetricsRequest {
    pub id: String,
    pub month: MonthKey,
    generation: u64,
}

impl App {
    pub fn set_habits(&mut self, habits: Vec<Habit>) {
        self.habits = habits;
        if self.habit_index >= self.habits.len() {
            self.habit_index = self.habits.len().saturating_sub(1);
        }
        if let Some(id) = &self.selected_habit_id {
            if !self.habits.iter().any(|habit| &habit.id == id) {
                self.deselect_habit();
            }
        }
    }

    pub fn highlighted_habit(&self) -> Option<&Habit> {
        self.habits.get(self.habit_index)
    }

    pub fn selected_habit(&self) -> Option<&Habit> {
        let id = self.selected_habit_id.as_ref()?;
        self.habits.iter().find(|habit| &habit.id == id)
    }

    pub fn habit_next(&mut self) {
        if self.habit_index + 1 < self.habits.len() {
            self.habit_index += 1;
        }
    }

    pub fn habit_previous(&mut self) {
        self.habit_index = self.habit_index.saturating_sub(1);
    }

    pub fn begin_habit_name(&mut self) {
        self.habit_name_input = Some(TextInput::new());
        self.clear_status();
    }

    pub fn cancel_habit_name(&mut self) {
        self.habit_name_input = None;
    }

    pub fn habit_name_input_mut(&mut self) -> Option<&mut TextInput> {
        self.habit_name_input.as_mut()
    }

    /// Finish typing. Returns the trimmed name, or `None` (input kept open) if it is blank.
    pub fn submit_habit_name(&mut self) -> Option<String> {
        let name = self.habit_name_input.as_ref()?.value.trim().to_string();
        if name.is_empty() {
            self.set_status("Habit name cannot be empty".to_string());
            return None;
        }
        self.habit_name_input = None;
        Some(name)
    }

    /// Id of the highlighted habit for a toggle or delete.
    pub fn highlighted_habit_id(&mut self) -> Option<String> {
        match self.highlighted_habit() {
            Some(habit) => Some(habit.id.clone()),
            None => {
                self.set_status("No habit selected".to_string());
                None
            }
        }
    }

    /// Today's completion of `id` flipped. Reload its metrics if it is the one shown.
    pub fn habit_toggled(&mut self, id: &str) -> Option<HabitMetricsRequest> {
        if self.selected_habit_id.as_deref() == Some(id) {
            self.reload_habit_metrics()
        } else {
            None
        }
    }

    pub fn habit_deleted(&mut self, id: &str) {
        if self.selected_habit_id.as_deref() == Some(id) {
            self.deselect_habit();
        }
        self.set_status("Habit deleted".to_string());
    }

    pub fn select_highlighted_habit(&mut self) -> Option<HabitMetricsRequest> {
        let id = self.highlighted_habit()?.id.clone();
        if self.selected_habit_id.as_deref() != Some(id.as_str()) {
            self.habit_metrics = None;
            self.habit_summary = None;
        }
        self.selected_habit_id = Some(id);
        self.reload_habit_metrics()
    }

    pub fn deselect_habit(&mut self) {
        self.selected_habit_id = None;
        self.habit_metrics = None;
        self.habit_summary = None;
        // Late responses for the old selection must not land.
        self.habit_metrics_generation += 1;
    }

    pub fn shift_habit_month(&mut self, forward: bool) -> Option<HabitMetricsRequest> {
        self.habit_month = if forward {
            self.habit_month.next()
        } else {
            self.habit_month.previous()
        };
        self.reload_habit_metrics()
    }

    pub fn reload_habit_metrics(&mut self) -> Option<HabitMetricsRequest> {
        let id = self.selected_habit_id.clone()?;
        self.habit_metrics_generation += 1;
        Some(HabitMetricsRequest {
            id,
            month: self.habit_month,
            generation: self.habit_metrics_generation,
        })
    }

    /// Store metrics if `request` is still the latest. Returns whether they were kept.
    pub fn apply_habit_metrics(&mut self, request: &HabitMetricsRequest, habit: Habit) -> bool {
        if request.generation != self.habit_metrics_generation {
            tracing::debug!(habit = %request.id, "discarding superseded habit metrics");
            return false;
        }
        self.habit_summary = Some(HabitMonthSummary::compute(
            &habit.completed_dates,
            request.month,
        ));
        self.habit_metrics = Some(habit);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_app;
    use super::*;
    use time::macros::date;

    fn habit(id: &str, dates: Vec<time::Date>) -> Habit {
        Habit {
            id: id.to_string(),
            name: format!("Habit {}", id),
            completed_dates: dates,
        }
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut app = test_app();
        app.begin_habit_name();
        for c in "   ".chars() {
            app.habit_name_input_mut().unwrap().insert(c);
        }
        assert_eq!(app.submit_habit_name(), None);
        assert!(app.habit_name_input.is_some());

        app.habit_name_input_mut().unwrap().insert('x');
        assert_eq!(app.submit_habit_name().as_deref(), Some("x"));
        assert!(app.habit_name_input.is_none());
    }

    #[test]
    fn metrics_summary_uses_viewed_month() {
        let mut app = test_app();
        app.set_habits(vec![habit("a", vec![])]);
        app.habit_month = MonthKey::of(date!(2024 - 04 - 01));

        let request = app.select_highlighted_habit().unwrap();
        let metrics = habit(
            "a",
            vec![date!(2024 - 04 - 01), date!(2024 - 04 - 02), date!(2024 - 04 - 03)],
        );
        assert!(app.apply_habit_metrics(&request, metrics));

        let summary = app.habit_summary.unwrap();
        assert_eq!(summary.ratio_label(), "3 / 30");
        assert_eq!(summary.percentage_label(), "10%");
    }

    #[test]
    fn superseded_metrics_are_dropped() {
        let mut app = test_app();
        app.set_habits(vec![habit("a", vec![])]);
        let first = app.select_highlighted_habit().unwrap();
        let second = app.shift_habit_month(false).unwrap();

        assert!(!app.apply_habit_metrics(&first, habit("a", vec![])));
        assert!(app.apply_habit_metrics(&second, habit("a", vec![])));
        assert_eq!(second.month, MonthKey::of(date!(2024 - 02 - 01)));
    }

    #[test]
    fn deleting_the_selected_habit_clears_selection() {
        let mut app = test_app();
        app.set_habits(vec![habit("a", vec![]), habit("b", vec![])]);
        app.habit_next();
        let request = app.select_highlighted_habit().unwrap();
        assert_eq!(request.id, "b");

        app.habit_deleted("a");
        assert_eq!(app.selected_habit_id.as_deref(), Some("b"));

        app.habit_deleted("b");
        assert_eq!(app.selected_habit_id, None);
        assert!(!app.apply_habit_metrics(&request, habit("b", vec![])));
    }

    #[test]
    fn toggling_only_reloads_the_shown_habit() {
        let mut app = test_app();
        app.set_habits(vec![habit("a", vec![]), habit("b", vec![])]);
        app.select_highlighted_habit();

        assert_eq!(app.habit_toggled("b"), None);
        assert_eq!(app.habit_toggled("a").map(|r| r.id), Some("a".to_string()));
    }

    #[test]
    fn shrinking_list_clamps_highlight() {
        let mut app = test_app();
        app.set_habits(vec![habit("a", vec![]), habit("b", vec![])]);
        app.habit_next();
        app.set_habits(vec![habit("a", vec![])]);
        assert_eq!(app.highlighted_habit().map(|h| h.id.as_str()), Some("a"));
    }
}
