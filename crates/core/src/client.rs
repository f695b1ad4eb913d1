use crate::config::Settings;
use crate::domain::form::FormInput;
use crate::domain::projection::ProjectionResponse;
use anyhow::Context;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const PROJECTION_PATH: &str = "/investment_projection";

/// How a submission can fail, from the point of view of the person reading
/// the error panel.
#[derive(Debug)]
pub enum ProjectionError {
    /// The request never produced an HTTP response.
    Network { detail: String },
    /// The service answered with a non-success status.
    RequestFailed { status: u16, detail: Option<String> },
    /// A success response missing the expected top-level fields, or one that
    /// is not JSON at all.
    MalformedResponse { detail: String },
}

impl ProjectionError {
    /// Text for the error panel. Server-provided detail is passed through;
    /// everything else gets a generic description.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Could not reach the projection service. Check your connection and try again."
                    .to_string()
            }
            Self::RequestFailed { status, detail } => detail.clone().unwrap_or_else(|| {
                format!("The projection service rejected the request (HTTP {status}).")
            }),
            Self::MalformedResponse { .. } => {
                "The projection service returned an unexpected response.".to_string()
            }
        }
    }
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network { detail } => write!(f, "network error: {detail}"),
            Self::RequestFailed {
                status,
                detail: Some(detail),
            } => write!(f, "request failed (HTTP {status}): {detail}"),
            Self::RequestFailed {
                status,
                detail: None,
            } => write!(f, "request failed (HTTP {status})"),
            Self::MalformedResponse { detail } => write!(f, "malformed response: {detail}"),
        }
    }
}

impl std::error::Error for ProjectionError {}

#[async_trait::async_trait]
pub trait ProjectionApi: Send + Sync {
    async fn fetch_projection(
        &self,
        form: &FormInput,
    ) -> Result<ProjectionResponse, ProjectionError>;
}

#[derive(Debug, Clone)]
pub struct HttpProjectionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProjectionClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.require_projection_base_url()?.to_string();
        let timeout_secs = settings
            .projection_timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build projection http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PROJECTION_PATH)
    }
}

#[async_trait::async_trait]
impl ProjectionApi for HttpProjectionClient {
    /// One submission is one request: no retries, a single await point.
    async fn fetch_projection(
        &self,
        form: &FormInput,
    ) -> Result<ProjectionResponse, ProjectionError> {
        let res = self
            .http
            .post(self.url())
            .json(form)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "projection request failed before a response arrived");
                ProjectionError::Network {
                    detail: err.to_string(),
                }
            })?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(|err| ProjectionError::Network {
            detail: format!("failed to read response body: {err}"),
        })?;

        interpret_response(status, &body)
    }
}

/// Maps a status/body pair onto the error taxonomy. Pure, so the mapping is
/// testable without a live server.
///
/// Non-success statuses surface the body's `detail` string when there is
/// one. Success bodies must be JSON carrying `results` and `summary`; the
/// optional top-level fields default during the typed parse.
pub fn interpret_response(
    status: u16,
    body: &str,
) -> Result<ProjectionResponse, ProjectionError> {
    if !(200..300).contains(&status) {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string));
        return Err(ProjectionError::RequestFailed { status, detail });
    }

    let raw = serde_json::from_str::<Value>(body).map_err(|err| {
        ProjectionError::MalformedResponse {
            detail: format!("body is not valid JSON: {err}"),
        }
    })?;

    for field in ["results", "summary"] {
        if raw.get(field).is_none() {
            return Err(ProjectionError::MalformedResponse {
                detail: format!("missing `{field}` field"),
            });
        }
    }

    serde_json::from_value::<ProjectionResponse>(raw).map_err(|err| {
        ProjectionError::MalformedResponse {
            detail: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_body() -> String {
        json!({
            "results": [
                {
                    "age": 31,
                    "investment_amount": 150_000.0,
                    "inflation_adjusted": 141_000.0,
                    "monthly_investment": 10_000.0
                }
            ],
            "summary": {
                "total_value": 150_000.0,
                "inflation_adjusted_value": 141_000.0,
                "total_contributions": 120_000.0,
                "total_return": 30_000.0,
                "return_on_investment": 25.0,
                "years_to_retirement": 29,
                "retirement_year_value": 150_000.0,
                "final_monthly_income": 500.0,
                "safe_withdrawal_rate": 0.04
            }
        })
        .to_string()
    }

    #[test]
    fn success_body_parses() {
        let parsed = interpret_response(200, &success_body()).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.summary.years_to_retirement, 29);
    }

    #[test]
    fn non_success_carries_server_detail() {
        let err = interpret_response(400, r#"{"detail": "bad age"}"#).unwrap_err();
        match &err {
            ProjectionError::RequestFailed { status, detail } => {
                assert_eq!(*status, 400);
                assert_eq!(detail.as_deref(), Some("bad age"));
            }
            other => panic!("unexpected variant: {other}"),
        }
        assert_eq!(err.user_message(), "bad age");
    }

    #[test]
    fn non_success_without_detail_gets_generic_message() {
        let err = interpret_response(502, "upstream exploded").unwrap_err();
        match &err {
            ProjectionError::RequestFailed { status, detail } => {
                assert_eq!(*status, 502);
                assert!(detail.is_none());
            }
            other => panic!("unexpected variant: {other}"),
        }
        assert!(err.user_message().contains("502"));
    }

    #[test]
    fn missing_top_level_field_is_malformed() {
        let err = interpret_response(200, r#"{"results": []}"#).unwrap_err();
        match err {
            ProjectionError::MalformedResponse { detail } => {
                assert!(detail.contains("summary"), "detail was: {detail}");
            }
            other => panic!("unexpected variant: {other}"),
        }
    }

    #[test]
    fn non_json_success_body_is_malformed() {
        let err = interpret_response(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, ProjectionError::MalformedResponse { .. }));
    }
}
