mod docs;
mod error;
mod payment;
mod quote;
mod state;
mod tariff;

use std::sync::Arc;
use std::time::Duration;

use crate::docs::docs_routes;
use crate::payment::{commit_payment_handler, create_payment_handler};
use crate::quote::{quote_handler, send_quote_handler};
use crate::state::AppState;
use crate::tariff::{get_tariff_handler, update_tariff_handler};
use aide::openapi::OpenApi;
use aide::transform::TransformOpenApi;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Extension, serve};
use moto_directions::{DistanceClient, GoogleDirectionsClientParams};
use moto_pricing::config::ConfigStore;
use moto_resend::{ResendClient, ResendClientParams};
use moto_webpay::{WEBPAY_INTEGRATION_BASE_URL, WebpayClient, WebpayClientParams};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{Level, info, warn};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::from_filename("./.env.local").ok();
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    aide::generate::on_error(|error| tracing::error!("{}", error));
    aide::generate::extract_schemas(true);

    let state = Arc::new(app_state());

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(Any)
        .allow_headers(Any);

    let mut api = OpenApi::default();

    let app = aide::axum::ApiRouter::new()
        .nest_api_service("/docs", docs_routes(state.clone()))
        .route("/quote", post(quote_handler))
        .route("/quote/send", post(send_quote_handler))
        .route("/tariff", get(get_tariff_handler).put(update_tariff_handler))
        .route("/payment", post(create_payment_handler))
        .route("/payment/{token}/commit", post(commit_payment_handler))
        .finish_api_with(&mut api, api_docs);

    if std::env::args().any(|a| a == "--generate-openapi") {
        use std::fs::File;
        use std::io::Write;

        let mut file = File::create("schemas/openapi.json").unwrap();
        let spec = serde_json::to_string_pretty(&api).unwrap();
        file.write_all(spec.as_bytes()).unwrap();
        info!("OpenAPI specification has been written to openapi.json");
        return;
    }

    let app = app
        .layer(ServiceBuilder::new().layer(cors_layer))
        .layer(Extension(Arc::new(api)))
        .with_state(state);

    let port: u16 = env_or("PORT", "8080")
        .parse()
        .expect("PORT must be a number");

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();

    info!("listening on port {port}");
    serve(listener, app).await.unwrap();
}

fn app_state() -> AppState {
    let config = ConfigStore::open(env_or("MOTO_CONFIG", "./config/tariff.json"));

    let directions = DistanceClient::new(GoogleDirectionsClientParams {
        api_key: std::env::var("GOOGLE_MAPS_API_KEY").expect("GOOGLE_MAPS_API_KEY must be set"),
        region: env_or("GOOGLE_REGION", "cl"),
        timeout: PROVIDER_TIMEOUT,
    });

    let mailer = std::env::var("RESEND_API_KEY").ok().map(|api_key| {
        ResendClient::new(ResendClientParams {
            api_key,
            from: env_or("MAIL_FROM", "no-reply@motoexpress.cl"),
            timeout: PROVIDER_TIMEOUT,
        })
    });
    if mailer.is_none() {
        warn!("RESEND_API_KEY not set, quote emails are disabled");
    }

    let webpay = WebpayClient::new(WebpayClientParams {
        base_url: env_or("WEBPAY_BASE_URL", WEBPAY_INTEGRATION_BASE_URL),
        commerce_code: env_or("WEBPAY_COMMERCE_CODE", "597055555532"),
        api_key: env_or(
            "WEBPAY_API_KEY",
            "579B532A7440BB0C9079DED94D31EA1615BACEB56610332264630D42D0A36B1C",
        ),
        return_url: env_or("WEBPAY_RETURN_URL", "https://motoexpress.cl/payment/result"),
        timeout: PROVIDER_TIMEOUT,
    });

    AppState {
        config,
        directions,
        mailer,
        internal_copy: std::env::var("INTERNAL_QUOTE_EMAIL").ok(),
        webpay,
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
    api.title("Moto Express Open API")
}
