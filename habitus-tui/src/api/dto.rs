use habitus_core::{DailyCompletionCount, FocusIntervalRecord, Habit};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::time_utils::{local_date, parse_instant};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusTimeDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time_from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub time_to: OffsetDateTime,
    #[serde(default)]
    pub user_id: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub created_at: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl From<FocusTimeDto> for FocusIntervalRecord {
    fn from(dto: FocusTimeDto) -> Self {
        Self {
            id: dto.id,
            started_at: dto.time_from,
            ended_at: dto.time_to,
            owner_id: dto.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FocusMetricDto {
    #[serde(rename = "_id")]
    pub id: (i32, u8, u8),
    pub count: u32,
}

impl From<FocusMetricDto> for DailyCompletionCount {
    fn from(dto: FocusMetricDto) -> Self {
        let (year, month, day) = dto.id;
        Self {
            year,
            month,
            day,
            interval_count: dto.count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFocusTimeRequest {
    pub time_from: String,
    pub time_to: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRedirectDto {
    pub redirect_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub completed_dates: Vec<String>,
}

/// `GET /habits/:id/metrics` has the same shape as a habit.
pub type HabitMetricsDto = HabitDto;

impl From<HabitDto> for Habit {
    fn from(dto: HabitDto) -> Self {
        let completed_dates = dto
            .completed_dates
            .iter()
            .filter_map(|raw| match parse_instant(raw) {
                Ok(dt) => Some(local_date(dt)),
                Err(e) => {
                    tracing::warn!(habit = %dto.id, "skipping completed date: {:#}", e);
                    None
                }
            })
            .collect();
        Self {
            id: dto.id,
            name: dto.name,
            completed_dates,
        }
    }
}

#[derive(Serialize)]
pub struct CreateHabitRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
