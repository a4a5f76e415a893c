// Authentication Middleware

use crate::api::{
    config::{ApiConfig, Permission},
    models::error::ApiError,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authentication extension inserted into request
#[derive(Debug, Clone)]
pub struct AuthExtension {
    pub permission: Permission,
}

/// Authentication middleware
///
/// Does nothing when no API keys are configured.
pub async fn authenticate(
    State(config): State<Arc<ApiConfig>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !config.requires_auth() {
        return Ok(next.run(req).await);
    }

    // Skip authentication for health endpoint
    let path = req.uri().path();
    if path == "/api/v1/health" || path == "/health" {
        return Ok(next.run(req).await);
    }

    // Skip for Swagger UI
    if path.starts_with("/api/docs") {
        return Ok(next.run(req).await);
    }

    let api_key = req
        .headers()
        .get("X-API-Key")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing X-API-Key header".to_string()))?;

    let permission = config
        .validate_key(api_key)
        .ok_or_else(|| ApiError::Unauthorized("Invalid API key".to_string()))?;

    req.extensions_mut().insert(AuthExtension { permission });

    Ok(next.run(req).await)
}

/// Check if user has required permission
pub fn check_permission(required: Permission, user_permission: Permission) -> Result<(), ApiError> {
    let allowed = match required {
        Permission::ReadOnly => true,
        Permission::Ingest => user_permission == Permission::Ingest,
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Insufficient permissions".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_permission() {
        assert!(check_permission(Permission::ReadOnly, Permission::ReadOnly).is_ok());
        assert!(check_permission(Permission::ReadOnly, Permission::Ingest).is_ok());
        assert!(check_permission(Permission::Ingest, Permission::Ingest).is_ok());
        assert!(check_permission(Permission::Ingest, Permission::ReadOnly).is_err());
    }
}
