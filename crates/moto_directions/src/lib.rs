pub mod distance_client;
pub mod google_api;

pub use distance_client::DistanceClient;
pub use google_api::{GoogleDirectionsClientParams, GOOGLE_DIRECTIONS_API_URL};
