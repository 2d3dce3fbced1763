use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use moto_webpay::CommittedTransaction;

use crate::{error::ApiError, state::AppState};

pub async fn commit_payment_handler(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<CommittedTransaction>, ApiError> {
    let committed = state.webpay.commit(&token).await?;
    Ok(Json(committed))
}
