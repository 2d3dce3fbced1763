use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use moto_pricing::aggregator::QuoteError;
use moto_webpay::WebpayError;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Serialize, JsonSchema)]
pub struct ErrorBody {
    error: String,
}

pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
    ServiceUnavailable(String),
    InternalServerError(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::InternalServerError(error.to_string())
    }
}

impl From<QuoteError> for ApiError {
    fn from(error: QuoteError) -> Self {
        match &error {
            QuoteError::InvalidInput(_) | QuoteError::Pricing(_) => {
                ApiError::BadRequest(error.to_string())
            }
            QuoteError::DistanceUnavailable { .. } => ApiError::BadGateway(error.to_string()),
        }
    }
}

impl From<WebpayError> for ApiError {
    fn from(error: WebpayError) -> Self {
        match &error {
            WebpayError::Api { status: 404, .. } => {
                ApiError::NotFound("payment transaction not found".to_string())
            }
            _ => ApiError::BadGateway(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message),
            ApiError::ServiceUnavailable(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::InternalServerError(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
