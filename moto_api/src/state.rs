use moto_directions::DistanceClient;
use moto_pricing::config::ConfigStore;
use moto_resend::ResendClient;
use moto_webpay::WebpayClient;

pub struct AppState {
    pub config: ConfigStore,
    pub directions: DistanceClient,
    pub mailer: Option<ResendClient>,
    pub internal_copy: Option<String>,
    pub webpay: WebpayClient,
}
