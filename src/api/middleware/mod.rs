// Middleware Module

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{authenticate, check_permission, AuthExtension};
pub use cors::{cors_layer, cors_layer_with_origins};
pub use logging::logging_layer;
