// ABOUTME: HTTP session source for the upstream training API
// ABOUTME: Fetches the monthly calendar window and per-session training details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Remote Session Source
//!
//! Every upstream response is wrapped in an envelope `{code, msg, data}` where `code == 0`
//! means success. The calendar is requested one month at a time; months that fail are
//! logged and skipped so one bad month does not hide the rest of the history.

use crate::calendar::{completed_stubs, month_window, CalendarDay};
use crate::http_client::shared_client;
use crate::SessionSource;
use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::join_all;
use liftlog_core::constants::fetch::{
    CALENDAR_MONTH_PATH, DEFAULT_API_BASE_URL, DEVICE_TYPE, TRAINING_DETAIL_PATH,
    UPSTREAM_OK_CODE,
};
use liftlog_core::constants::service_names::TRAINING_API;
use liftlog_core::errors::{AppError, AppResult};
use liftlog_core::models::{SessionId, SessionStub, TrainingDetail};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Response wrapper used by every upstream endpoint
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Payload of a successful response, which may legitimately be empty
    fn into_optional_data(self, what: &str) -> AppResult<Option<T>> {
        if let Some(code) = self.code.filter(|code| *code != UPSTREAM_OK_CODE) {
            let msg = self.msg.unwrap_or_default();
            return Err(AppError::external_service(
                TRAINING_API,
                format!("{what} returned code {code}: {msg}"),
            ));
        }
        Ok(self.data)
    }

    fn into_data(self, what: &str) -> AppResult<T> {
        self.into_optional_data(what)?
            .ok_or_else(|| AppError::external_service(TRAINING_API, format!("{what} carried no data")))
    }
}

/// Session source backed by the upstream training API
#[derive(Clone)]
pub struct HttpSessionSource {
    base_url: String,
    token: String,
    client: Client,
}

impl HttpSessionSource {
    /// Create a source for `base_url` authenticating with `token`
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: token.into(),
            client: shared_client().clone(),
        }
    }

    /// Source for the default upstream host
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(DEFAULT_API_BASE_URL, token)
    }

    async fn get_envelope<T>(
        &self,
        user_id: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<ApiEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("App_user_id", user_id)
            .header("Token", &self.token)
            .header("Timestamp", Utc::now().timestamp_millis().to_string())
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::upstream_auth(format!(
                "training API rejected credentials ({status})"
            ))
            .with_user_id(user_id));
        }
        if !status.is_success() {
            return Err(AppError::external_service(
                TRAINING_API,
                format!("{path} failed with status {status}"),
            ));
        }

        Ok(response.json().await?)
    }

    async fn fetch_month(&self, user_id: &str, month: &str) -> AppResult<Vec<CalendarDay>> {
        let query = [
            ("date", month.to_owned()),
            ("selectedDeviceType", DEVICE_TYPE.to_string()),
        ];
        let envelope = self
            .get_envelope::<Vec<CalendarDay>>(user_id, CALENDAR_MONTH_PATH, &query)
            .await?;
        Ok(envelope.into_optional_data(month)?.unwrap_or_default())
    }
}

#[async_trait]
impl SessionSource for HttpSessionSource {
    fn name(&self) -> &'static str {
        TRAINING_API
    }

    #[instrument(skip_all, fields(user.id = %user_id, months = months))]
    async fn fetch_calendar_window(&self, user_id: &str, months: u32) -> AppResult<Vec<SessionStub>> {
        let month_keys = month_window(Utc::now().date_naive(), months);
        if month_keys.is_empty() {
            return Ok(Vec::new());
        }

        let results = join_all(
            month_keys
                .iter()
                .map(|month| self.fetch_month(user_id, month)),
        )
        .await;

        let mut days = Vec::new();
        let mut failures = 0_usize;
        let mut last_error = None;
        for (month, result) in month_keys.iter().zip(results) {
            match result {
                Ok(month_days) => days.extend(month_days),
                Err(e) => {
                    warn!(month = %month, error = %e, "Calendar month fetch failed, skipping");
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if failures == month_keys.len() {
            let message = last_error.map_or_else(String::new, |e| e.to_string());
            return Err(AppError::upstream_unavailable(format!(
                "could not load the training calendar: {message}"
            ))
            .with_user_id(user_id));
        }

        let stubs = completed_stubs(days);
        debug!(
            months = month_keys.len(),
            failed_months = failures,
            completed = stubs.len(),
            "Loaded training calendar"
        );
        Ok(stubs)
    }

    #[instrument(skip_all, fields(user.id = %user_id, session.id = %session_id))]
    async fn fetch_training_detail(
        &self,
        user_id: &str,
        session_id: &SessionId,
    ) -> AppResult<TrainingDetail> {
        let path = format!("{TRAINING_DETAIL_PATH}/{session_id}");
        self.get_envelope::<TrainingDetail>(user_id, &path, &[])
            .await
            .and_then(|envelope| envelope.into_data(&path))
            .map_err(|e| e.with_resource_id(session_id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog_core::errors::ErrorCode;

    #[test]
    fn test_envelope_with_error_code_is_rejected() {
        let envelope: ApiEnvelope<TrainingDetail> =
            serde_json::from_str(r#"{"code": 401, "msg": "token expired", "data": null}"#).unwrap();
        let error = envelope.into_data("detail").unwrap_err();
        assert_eq!(error.code, ErrorCode::ExternalServiceError);
        assert!(error.message.contains("token expired"));
    }

    #[test]
    fn test_envelope_without_data_is_an_error() {
        let envelope: ApiEnvelope<TrainingDetail> =
            serde_json::from_str(r#"{"code": 0, "msg": "ok"}"#).unwrap();
        assert!(envelope.into_data("detail").is_err());
    }

    #[test]
    fn test_envelope_data_is_returned() {
        let envelope: ApiEnvelope<TrainingDetail> = serde_json::from_str(
            r#"{"code": 0, "data": {"cttActionLibraryTrainingInfoList": [
                {"actionLibraryName": "Squat", "finishedReps": [{"capacity": 400, "finishedCount": 8}]}
            ]}}"#,
        )
        .unwrap();
        let detail = envelope.into_data("detail").unwrap();
        assert_eq!(detail.exercises().len(), 1);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let source = HttpSessionSource::new("https://api.example.test/", "token");
        assert_eq!(source.base_url, "https://api.example.test");
    }
}
