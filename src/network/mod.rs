// Re-export network modules
pub mod api_client;
pub mod config;

pub use api_client::ApiClient;
pub use config::{api_config, init_api_config, ApiConfig};
