use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use moto_pricing::aggregator::{Quote, QuoteError, aggregate};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize, JsonSchema)]
pub struct QuoteRequestBody {
    pub origin: String,
    pub destinations: Vec<String>,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

pub async fn quote_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QuoteRequestBody>,
) -> Result<Json<Quote>, ApiError> {
    let config = state.config.snapshot();

    let quote = aggregate(
        &config,
        &state.directions,
        &body.origin,
        &body.destinations,
        body.coupon_code.as_deref(),
    )
    .await
    .map_err(|error| {
        if let QuoteError::DistanceUnavailable { .. } = &error {
            tracing::error!(error = ?error, "routing provider unavailable");
        }
        ApiError::from(error)
    })?;

    Ok(Json(quote))
}
