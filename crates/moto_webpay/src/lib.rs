pub mod client;

pub use client::{
    CommittedTransaction, CreatedTransaction, WebpayClient, WebpayClientParams, WebpayError,
    WEBPAY_INTEGRATION_BASE_URL, WEBPAY_PRODUCTION_BASE_URL,
};
