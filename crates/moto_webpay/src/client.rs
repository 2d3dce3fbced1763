use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum WebpayError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// A freshly created transaction: the caller redirects the customer to
/// `url` with the `token` to complete the payment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatedTransaction {
    pub token: String,
    pub url: String,
}

/// Result of committing a transaction after the customer returns.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommittedTransaction {
    pub status: String,
    pub buy_order: String,
    pub amount: f64,
    pub authorization_code: Option<String>,
    pub response_code: Option<i32>,
}

#[derive(Serialize)]
struct CreateTransactionBody<'a> {
    buy_order: &'a str,
    session_id: &'a str,
    amount: i64,
    return_url: &'a str,
}

pub const WEBPAY_INTEGRATION_BASE_URL: &str = "https://webpay3gint.transbank.cl";
pub const WEBPAY_PRODUCTION_BASE_URL: &str = "https://webpay3g.transbank.cl";

const TRANSACTIONS_API_PATH: &str = "/rswebpaytransaction/api/webpay/v1.2/transactions";

#[derive(Clone)]
pub struct WebpayClientParams {
    pub base_url: String,
    pub commerce_code: String,
    pub api_key: String,
    pub return_url: String,
    pub timeout: Duration,
}

/// Webpay Plus REST client, covering the create/commit pair the checkout
/// flow needs.
#[derive(Clone)]
pub struct WebpayClient {
    params: WebpayClientParams,
    client: reqwest::Client,
}

impl WebpayClient {
    pub fn new(params: WebpayClientParams) -> Self {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { params, client }
    }

    pub async fn create(
        &self,
        buy_order: &str,
        session_id: &str,
        amount: i64,
    ) -> Result<CreatedTransaction, WebpayError> {
        let body = CreateTransactionBody {
            buy_order,
            session_id,
            amount,
            return_url: &self.params.return_url,
        };

        let response = self
            .client
            .post(format!("{}{}", self.params.base_url, TRANSACTIONS_API_PATH))
            .header("Tbk-Api-Key-Id", &self.params.commerce_code)
            .header("Tbk-Api-Key-Secret", &self.params.api_key)
            .json(&body)
            .send()
            .await?;

        let created: CreatedTransaction = self.handle_response(response).await?;
        debug!(buy_order, token = %created.token, "created payment transaction");
        Ok(created)
    }

    pub async fn commit(&self, token: &str) -> Result<CommittedTransaction, WebpayError> {
        let response = self
            .client
            .put(format!(
                "{}{}/{}",
                self.params.base_url, TRANSACTIONS_API_PATH, token
            ))
            .header("Tbk-Api-Key-Id", &self.params.commerce_code)
            .header("Tbk-Api-Key-Secret", &self.params.api_key)
            .send()
            .await?;

        let committed: CommittedTransaction = self.handle_response(response).await?;
        debug!(
            buy_order = %committed.buy_order,
            status = %committed.status,
            "committed payment transaction"
        );
        Ok(committed)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WebpayError> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(WebpayError::Api { status, message })
        }
    }
}
