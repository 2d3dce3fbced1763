use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use moto_webpay::CreatedTransaction;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize, JsonSchema)]
pub struct CreatePaymentBody {
    pub amount: i64,
    #[serde(default)]
    pub session_id: Option<String>,
}

pub async fn create_payment_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreatePaymentBody>,
) -> Result<Json<CreatedTransaction>, ApiError> {
    if body.amount <= 0 {
        return Err(ApiError::BadRequest(
            "amount must be a positive number of pesos".to_string(),
        ));
    }

    let buy_order = new_buy_order();
    let session_id = body
        .session_id
        .unwrap_or_else(|| format!("session-{}", Uuid::new_v4().simple()));

    let created = state
        .webpay
        .create(&buy_order, &session_id, body.amount)
        .await?;

    Ok(Json(created))
}

// Webpay caps buy_order at 26 characters.
fn new_buy_order() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("O-{}", &id[..24])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_order_fits_webpay_limit() {
        let buy_order = new_buy_order();
        assert!(buy_order.len() <= 26);
        assert!(buy_order.starts_with("O-"));
    }
}
