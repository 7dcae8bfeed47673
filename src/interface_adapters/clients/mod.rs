// The clients defined here are reqwest clients for external services.

mod admin_api;

pub use admin_api::{ADMIN_KEY_HEADER, AdminApiClient};
