use habitus_core::{
    CompletedInterval, DailyCompletionCount, FocusIntervalRecord, Habit, MonthKey,
};
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use time::{Date, Duration, OffsetDateTime};

use super::error::ApiError;
use crate::time_utils::{local_date, start_of_day};

const DEV_USER_ID: &str = "dev-user";

/// Failure the dev backend should answer with instead of data.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevFailure {
    AuthExpired,
    ServerError,
}

#[derive(Debug, Default)]
struct DevStore {
    focus_times: Vec<FocusIntervalRecord>,
    habits: Vec<Habit>,
    next_id: u64,
    failure: Option<DevFailure>,
    #[cfg_attr(not(test), allow(dead_code))]
    reported: Vec<CompletedInterval>,
}

impl DevStore {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// In-memory stand-in for the API, used by `habitus dev` and by tests.
#[derive(Debug, Clone, Default)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

impl DevBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with a few days of focus history and two habits.
    pub fn seeded(today: Date) -> Self {
        let backend = Self::new();
        {
            let mut store = backend.lock();
            for days_ago in [0_i64, 1, 3, 8] {
                let day = today - Duration::days(days_ago);
                if !MonthKey::of(today).contains(day) {
                    continue;
                }
                let morning = start_of_day(day) + Duration::hours(9);
                for (offset, minutes) in [(0, 25), (35, 25)] {
                    let started_at = morning + Duration::minutes(offset);
                    let id = store.next_id("focus");
                    store.focus_times.push(FocusIntervalRecord {
                        id,
                        started_at,
                        ended_at: started_at + Duration::minutes(minutes),
                        owner_id: DEV_USER_ID.to_string(),
                    });
                }
            }
            for (name, done_days) in [("Read 20 pages", vec![0_i64, 1, 2]), ("Stretch", vec![1])] {
                let id = store.next_id("habit");
                store.habits.push(Habit {
                    id,
                    name: name.to_string(),
                    completed_dates: done_days
                        .into_iter()
                        .map(|d| today - Duration::days(d))
                        .collect(),
                });
            }
        }
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DevStore> {
        self.store.lock().expect("dev store lock poisoned")
    }

    /// Make every following call fail until [`DevBackend::clear_failure`].
    #[cfg(test)]
    pub fn fail_with(&self, failure: DevFailure) {
        self.lock().failure = Some(failure);
    }

    #[cfg(test)]
    pub fn clear_failure(&self) {
        self.lock().failure = None;
    }

    /// Intervals accepted through `POST /focus-time`, in order.
    #[cfg(test)]
    pub fn reported(&self) -> Vec<CompletedInterval> {
        self.lock().reported.clone()
    }

    fn check(&self, call: &str) -> Result<(), ApiError> {
        match self.lock().failure {
            None => Ok(()),
            Some(DevFailure::AuthExpired) => Err(ApiError::AuthExpired),
            Some(DevFailure::ServerError) => Err(ApiError::from_response(
                call,
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
            )),
        }
    }

    pub fn report_focus_time(&self, interval: CompletedInterval) -> Result<(), ApiError> {
        self.check("POST /focus-time")?;
        let mut store = self.lock();
        let id = store.next_id("focus");
        store.focus_times.push(FocusIntervalRecord {
            id,
            started_at: interval.started_at,
            ended_at: interval.ended_at,
            owner_id: DEV_USER_ID.to_string(),
        });
        store.reported.push(interval);
        Ok(())
    }

    pub fn focus_times(&self, day: Date) -> Result<Vec<FocusIntervalRecord>, ApiError> {
        self.check("GET /focus-time")?;
        Ok(self
            .lock()
            .focus_times
            .iter()
            .filter(|record| local_date(record.started_at) == day)
            .cloned()
            .collect())
    }

    pub fn focus_metrics(&self, month: MonthKey) -> Result<Vec<DailyCompletionCount>, ApiError> {
        self.check("GET /focus-time/metrics")?;
        let mut per_day: BTreeMap<Date, u32> = BTreeMap::new();
        for record in &self.lock().focus_times {
            let day = local_date(record.started_at);
            if month.contains(day) {
                *per_day.entry(day).or_default() += 1;
            }
        }
        Ok(per_day
            .into_iter()
            .map(|(day, interval_count)| DailyCompletionCount {
                year: day.year(),
                month: day.month() as u8,
                day: day.day(),
                interval_count,
            })
            .collect())
    }

    pub fn habits(&self) -> Result<Vec<Habit>, ApiError> {
        self.check("GET /habits")?;
        Ok(self.lock().habits.clone())
    }

    pub fn create_habit(&self, name: &str) -> Result<(), ApiError> {
        self.check("POST /habits")?;
        let mut store = self.lock();
        let id = store.next_id("habit");
        store.habits.push(Habit {
            id,
            name: name.to_string(),
            completed_dates: Vec::new(),
        });
        Ok(())
    }

    pub fn toggle_habit(&self, id: &str, now: OffsetDateTime) -> Result<(), ApiError> {
        self.check("PATCH /habits/:id/toggle")?;
        let today = local_date(now);
        let mut store = self.lock();
        let habit = store
            .habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| not_found("PATCH /habits/:id/toggle"))?;
        if habit.is_completed_on(today) {
            habit.completed_dates.retain(|d| *d != today);
        } else {
            habit.completed_dates.push(today);
        }
        Ok(())
    }

    pub fn delete_habit(&self, id: &str) -> Result<(), ApiError> {
        self.check("DELETE /habits/:id")?;
        self.lock().habits.retain(|habit| habit.id != id);
        Ok(())
    }

    pub fn habit_metrics(&self, id: &str, month: MonthKey) -> Result<Habit, ApiError> {
        self.check("GET /habits/:id/metrics")?;
        let store = self.lock();
        let habit = store
            .habits
            .iter()
            .find(|habit| habit.id == id)
            .ok_or_else(|| not_found("GET /habits/:id/metrics"))?;
        Ok(Habit {
            completed_dates: habit
                .completed_dates
                .iter()
                .copied()
                .filter(|d| month.contains(*d))
                .collect(),
            ..habit.clone()
        })
    }
}

fn not_found(call: &str) -> ApiError {
    ApiError::from_response(call, StatusCode::NOT_FOUND, Some("Habit not found".to_string()))
}
