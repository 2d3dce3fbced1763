use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("routing failed with status: {0}")]
    Provider(String),

    #[error("no routes returned")]
    NoRoutes,
}

/// One alternative route offered by the provider, with the per-leg
/// distance and duration already summed.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub summary: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<ApiRoute>,
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct ApiRoute {
    #[serde(default)]
    summary: String,
    legs: Vec<ApiLeg>,
}

#[derive(Deserialize)]
struct ApiLeg {
    distance: ApiValue,
    duration: ApiValue,
}

/// Google wraps every measure as `{ "text": "8.5 km", "value": 8500 }`;
/// only the numeric value matters here.
#[derive(Deserialize)]
struct ApiValue {
    value: f64,
}

pub struct GoogleDirectionsClientParams {
    pub api_key: String,
    pub region: String,
    pub timeout: Duration,
}

pub const GOOGLE_DIRECTIONS_API_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

pub struct GoogleDirectionsClient {
    params: GoogleDirectionsClientParams,
    client: reqwest::Client,
}

impl GoogleDirectionsClient {
    pub fn new(params: GoogleDirectionsClientParams) -> Self {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { params, client }
    }

    /// Fetches all alternative driving routes between two addresses.
    pub async fn fetch_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<RouteCandidate>, DirectionsError> {
        let response = self
            .client
            .get(GOOGLE_DIRECTIONS_API_URL)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("mode", "driving"),
                ("alternatives", "true"),
                ("region", self.params.region.as_str()),
                ("key", self.params.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(strip_url)?;

        let body = self.handle_response(response).await?;

        match body.status.as_str() {
            "OK" => {
                let candidates: Vec<RouteCandidate> =
                    body.routes.into_iter().map(candidate).collect();
                if candidates.is_empty() {
                    Err(DirectionsError::NoRoutes)
                } else {
                    Ok(candidates)
                }
            }
            "ZERO_RESULTS" => Err(DirectionsError::NoRoutes),
            other => {
                let message = body.error_message.unwrap_or_default();
                Err(DirectionsError::Provider(format!("{other} {message}")))
            }
        }
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<DirectionsResponse, DirectionsError> {
        if response.status().is_success() {
            response.json().await.map_err(strip_url)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(DirectionsError::Api { status, message })
        }
    }
}

fn candidate(route: ApiRoute) -> RouteCandidate {
    RouteCandidate {
        summary: route.summary,
        distance_meters: route.legs.iter().map(|leg| leg.distance.value).sum(),
        duration_seconds: route.legs.iter().map(|leg| leg.duration.value).sum(),
    }
}

// The request URL carries the API key as a query parameter; strip the URL
// from transport errors so the key cannot reach logs or callers.
fn strip_url(error: reqwest::Error) -> DirectionsError {
    DirectionsError::Request(error.without_url())
}
