use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use moto_pricing::config::{TariffConfig, TariffUpdate};
use tracing::info;

use crate::state::AppState;

/// Partial update: a new surcharge and/or coupon entries merged into the
/// book. Subsequent quotes see the new snapshot immediately.
pub async fn update_tariff_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<TariffUpdate>,
) -> Json<TariffConfig> {
    let updated = state.config.apply(update);
    info!(
        surcharge = updated.tariff.surcharge.points(),
        coupons = updated.tariff.coupons.len(),
        "tariff updated"
    );
    Json(updated.tariff.clone())
}
