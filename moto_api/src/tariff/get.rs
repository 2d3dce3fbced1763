use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use moto_pricing::config::TariffConfig;

use crate::state::AppState;

pub async fn get_tariff_handler(State(state): State<Arc<AppState>>) -> Json<TariffConfig> {
    Json(state.config.snapshot().tariff.clone())
}
