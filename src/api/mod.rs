// API Module - REST API Server for fpscope

pub mod config;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export commonly used types
pub use config::{ApiConfig, Permission};
pub use server::ApiServer;
pub use state::AppState;

/// API module version
pub const API_VERSION: &str = "1.0.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version() {
        assert!(!API_VERSION.is_empty());
    }
}
