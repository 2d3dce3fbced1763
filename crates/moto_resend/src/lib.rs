pub mod client;

pub use client::{ResendClient, ResendClientParams, ResendError};
