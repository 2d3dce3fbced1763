use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ResendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Clone)]
pub struct ResendClientParams {
    pub api_key: String,
    pub from: String,
    pub timeout: Duration,
}

pub const RESEND_EMAILS_API_URL: &str = "https://api.resend.com/emails";

/// Transactional email sender. Callers decide whether delivery blocks
/// anything; this client only performs one bounded HTTP call.
#[derive(Clone)]
pub struct ResendClient {
    params: ResendClientParams,
    client: reqwest::Client,
}

impl ResendClient {
    pub fn new(params: ResendClientParams) -> Self {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { params, client }
    }

    /// Sends one HTML email and returns the provider message id.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<String, ResendError> {
        let body = SendEmailBody {
            from: &self.params.from,
            to: [to],
            subject,
            html,
        };

        let response = self
            .client
            .post(RESEND_EMAILS_API_URL)
            .bearer_auth(&self.params.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ResendError::Api { status, message });
        }

        let sent: SendEmailResponse = response.json().await?;
        debug!(to, id = %sent.id, "email accepted by provider");
        Ok(sent.id)
    }
}
