use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use moto_pricing::aggregator::Quote;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::quote::email;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct SendQuoteBody {
    pub customer: Customer,
    pub quote: Quote,
}

#[derive(Serialize, JsonSchema)]
pub struct SendQuoteResponse {
    pub queued: bool,
}

/// Emails the quote to the customer, with an internal copy when one is
/// configured. Dispatch is fire-and-forget: the response never waits on
/// delivery and a failed send is logged, not surfaced.
pub async fn send_quote_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendQuoteBody>,
) -> Result<Json<SendQuoteResponse>, ApiError> {
    let Some(mailer) = state.mailer.clone() else {
        return Err(ApiError::ServiceUnavailable(
            "email notifications are not configured".to_string(),
        ));
    };

    let to = body.customer.email.trim().to_string();
    if to.is_empty() {
        return Err(ApiError::BadRequest(
            "customer email must not be empty".to_string(),
        ));
    }

    let subject = format!("Your Moto Express quote to {}", destination_line(&body.quote));
    let html = email::render_quote(&body.customer, &body.quote);
    let internal_copy = state.internal_copy.clone();

    tokio::spawn(async move {
        if let Err(send_error) = mailer.send(&to, &subject, &html).await {
            error!(error = %send_error, %to, "failed to send quote email");
        }

        if let Some(copy) = internal_copy {
            let copy_subject = format!("[copy] {subject}");
            if let Err(send_error) = mailer.send(&copy, &copy_subject, &html).await {
                error!(error = %send_error, to = %copy, "failed to send internal quote copy");
            }
        }
    });

    Ok(Json(SendQuoteResponse { queued: true }))
}

fn destination_line(quote: &Quote) -> String {
    quote
        .legs
        .last()
        .map(|leg| leg.to.clone())
        .unwrap_or_else(|| quote.origin.clone())
}
