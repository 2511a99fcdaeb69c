//! HTTP client for the intake service.
//!
//! Submissions are checked locally with the same rules the server applies,
//! so obviously broken forms never leave the machine. That check is only
//! advisory: the server re-validates with its own clock and its answer wins.

use std::time::Duration;

use chrono::NaiveDate;
use intake_types::api::{DesignRequestInput, ErrorResponse, PortfolioResponse, SubmitResponse};
use intake_types::{FieldErrors, PortfolioItem, validate};
use reqwest::StatusCode;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The local pre-check failed; nothing was sent.
    #[error("request is invalid: {0}")]
    Invalid(FieldErrors),

    /// The server rejected the fields.
    #[error("server rejected request: {0}")]
    Rejected(FieldErrors),

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Field errors from either side, if that is what went wrong.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) | Self::Rejected(errors) => Some(errors),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntakeClient {
    http: reqwest::Client,
    base_url: String,
}

impl IntakeClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Submits using the local calendar date for the pre-check.
    pub async fn submit(&self, input: &DesignRequestInput) -> Result<SubmitResponse, ClientError> {
        self.submit_on(input, chrono::Local::now().date_naive()).await
    }

    pub async fn submit_on(
        &self,
        input: &DesignRequestInput,
        today: NaiveDate,
    ) -> Result<SubmitResponse, ClientError> {
        validate(input, today).map_err(|errors| {
            debug!(%errors, "Pre-check failed, not sending");
            ClientError::Invalid(errors)
        })?;

        let response = self
            .http
            .post(format!("{}/api/requests", self.base_url))
            .json(input)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<SubmitResponse>().await?);
        }

        Err(error_from(status, response.json::<ErrorResponse>().await.ok()))
    }

    pub async fn portfolio(&self) -> Result<Vec<PortfolioItem>, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/portfolio", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from(status, response.json::<ErrorResponse>().await.ok()));
        }

        Ok(response.json::<PortfolioResponse>().await?.items)
    }
}

fn error_from(status: StatusCode, body: Option<ErrorResponse>) -> ClientError {
    match body {
        Some(ErrorResponse {
            fields: Some(fields),
            ..
        }) if status == StatusCode::BAD_REQUEST => ClientError::Rejected(fields),
        Some(body) => ClientError::Server {
            status: status.as_u16(),
            message: body.error,
        },
        None => ClientError::Server {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        },
    }
}

/// One-line confirmation for the submitter. Storage success is the headline,
/// the notification is an annotation.
pub fn summarize(response: &SubmitResponse) -> String {
    format!(
        "Request #{} received (notification: {})",
        response.id, response.notification_status
    )
}
