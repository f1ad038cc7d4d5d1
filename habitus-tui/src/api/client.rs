use habitus_core::{CompletedInterval, DailyCompletionCount, FocusIntervalRecord, Habit, MonthKey};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use time::{Date, OffsetDateTime};

use super::dev_backend::DevBackend;
use super::dto::{
    AuthRedirectDto, CreateHabitRequest, ErrorBody, FocusMetricDto, FocusTimeDto, HabitDto,
    HabitMetricsDto, ReportFocusTimeRequest,
};
use super::error::ApiError;
use crate::session_store::SessionService;
use crate::time_utils::{format_instant, start_of_day};
use crate::types::UserData;

/// REST client for the Habitus API. Attaches the stored bearer token to every call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: SessionService,
    dev_backend: Option<DevBackend>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionService) -> Result<Self, ApiError> {
        // A trailing slash makes `Url::join` append to the path instead of replacing it.
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| ApiError::Invalid(format!("API URL {}: {}", base_url, e)))?;
        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Invalid(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            session,
            dev_backend: None,
        })
    }

    pub fn dev(session: SessionService, backend: DevBackend) -> Self {
        Self {
            client: Client::new(),
            base_url: Url::parse("http://localhost/").expect("static URL is valid"),
            session,
            dev_backend: Some(backend),
        }
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Invalid(format!("URL for {}: {}", path, e)))
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|source| ApiError::Transport {
            call: call_name.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .unwrap_or_default()
            .message;
        let err = ApiError::from_response(call_name, status, message);
        tracing::warn!(call = call_name, %status, "request failed: {}", err);
        Err(err)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(request, call_name).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            call: call_name.to_string(),
            message: e.to_string(),
        })
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<(), ApiError> {
        let response = self.send(request, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    fn date_param(instant: OffsetDateTime) -> Result<String, ApiError> {
        format_instant(instant).map_err(|e| ApiError::Invalid(e.to_string()))
    }

    /// Where to send the browser to start the OAuth flow.
    pub async fn auth_url(&self) -> Result<String, ApiError> {
        if self.dev_backend.is_some() {
            return Ok("http://localhost/dev-login".to_string());
        }

        let dto: AuthRedirectDto = self
            .get_json(self.client.get(self.endpoint("auth")?), "GET /auth")
            .await?;
        Ok(dto.redirect_url)
    }

    /// Trade the provider's authorization code for a signed-in user.
    pub async fn exchange_code(&self, code: &str) -> Result<UserData, ApiError> {
        if self.dev_backend.is_some() {
            return Ok(UserData {
                avatar_url: String::new(),
                id: "dev-user".to_string(),
                name: "Dev User".to_string(),
                token: format!("dev-{}", code),
            });
        }

        self.get_json(
            self.client
                .get(self.endpoint("auth/callback")?)
                .query(&[("code", code)]),
            "GET /auth/callback",
        )
        .await
    }

    pub async fn report_focus_time(&self, interval: CompletedInterval) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.report_focus_time(interval);
        }

        let body = ReportFocusTimeRequest {
            time_from: Self::date_param(interval.started_at)?,
            time_to: Self::date_param(interval.ended_at)?,
        };
        self.send_without_body(
            self.client.post(self.endpoint("focus-time")?).json(&body),
            "POST /focus-time",
        )
        .await
    }

    pub async fn focus_times(&self, day: Date) -> Result<Vec<FocusIntervalRecord>, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.focus_times(day);
        }

        let date = Self::date_param(start_of_day(day))?;
        let dtos: Vec<FocusTimeDto> = self
            .get_json(
                self.client
                    .get(self.endpoint("focus-time")?)
                    .query(&[("date", &date)]),
                "GET /focus-time",
            )
            .await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn focus_metrics(
        &self,
        month: MonthKey,
    ) -> Result<Vec<DailyCompletionCount>, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.focus_metrics(month);
        }

        let date = Self::date_param(start_of_day(month.first_day()))?;
        let dtos: Vec<FocusMetricDto> = self
            .get_json(
                self.client
                    .get(self.endpoint("focus-time/metrics")?)
                    .query(&[("date", &date)]),
                "GET /focus-time/metrics",
            )
            .await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn habits(&self) -> Result<Vec<Habit>, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.habits();
        }

        let dtos: Vec<HabitDto> = self
            .get_json(self.client.get(self.endpoint("habits")?), "GET /habits")
            .await?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }

    pub async fn create_habit(&self, name: &str) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.create_habit(name);
        }

        self.send_without_body(
            self.client
                .post(self.endpoint("habits")?)
                .json(&CreateHabitRequest { name }),
            "POST /habits",
        )
        .await
    }

    pub async fn toggle_habit(&self, id: &str) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.toggle_habit(id, OffsetDateTime::now_utc());
        }

        self.send_without_body(
            self.client.patch(self.endpoint(&format!(
                "habits/{}/toggle",
                urlencoding::encode(id)
            ))?),
            "PATCH /habits/:id/toggle",
        )
        .await
    }

    pub async fn delete_habit(&self, id: &str) -> Result<(), ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.delete_habit(id);
        }

        self.send_without_body(
            self.client
                .delete(self.endpoint(&format!("habits/{}", urlencoding::encode(id)))?),
            "DELETE /habits/:id",
        )
        .await
    }

    pub async fn habit_metrics(&self, id: &str, month: MonthKey) -> Result<Habit, ApiError> {
        if let Some(dev) = &self.dev_backend {
            return dev.habit_metrics(id, month);
        }

        let date = Self::date_param(start_of_day(month.first_day()))?;
        let dto: HabitMetricsDto = self
            .get_json(
                self.client
                    .get(self.endpoint(&format!(
                        "habits/{}/metrics",
                        urlencoding::encode(id)
                    ))?)
                    .query(&[("date", &date)]),
                "GET /habits/:id/metrics",
            )
            .await?;
        Ok(dto.into())
    }
}
