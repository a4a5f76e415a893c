// API Server Implementation

use crate::api::{config::ApiConfig, middleware, routes, state::AppState};
use crate::db::config::CaptureConfig;
use crate::db::traits::ObservationStore;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tracing::info;

/// API Server
pub struct ApiServer {
    config: ApiConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create new API server
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn ObservationStore>,
        capture: &CaptureConfig,
    ) -> Self {
        let state = Arc::new(AppState::new(config.clone(), store, capture));

        Self { config, state }
    }

    /// Build the router
    pub fn build_router(&self) -> Router {
        let api_routes = Router::new()
            // Lookup routes
            .route("/search/ja3", get(routes::search::search_ja3))
            .route("/search/h2", get(routes::search::search_h2))
            .route("/search/peetprint", get(routes::search::search_peetprint))
            .route("/search/user-agent", get(routes::search::search_user_agent))
            .route("/search/:dimension", get(routes::search::search_dimension))
            // Write path
            .route("/observations", post(routes::observations::submit_observation))
            // Stats routes
            .route("/stats", get(routes::stats::get_stats))
            // Health check
            .route("/health", get(routes::health::health_check));

        let router = Router::new()
            .nest("/api/v1", api_routes)
            // Also support /health at root level
            .route("/health", get(routes::health::health_check))
            .merge(self.swagger_routes())
            .layer(axum_middleware::from_fn_with_state(
                self.state.config.clone(),
                middleware::authenticate,
            ))
            .layer(DefaultBodyLimit::max(self.config.max_body_size))
            .layer(CompressionLayer::new())
            .layer(middleware::logging_layer());

        let router = if self.config.enable_cors {
            if self.config.cors_origins.is_empty() {
                router.layer(middleware::cors_layer())
            } else {
                router.layer(middleware::cors_layer_with_origins(
                    self.config.cors_origins.clone(),
                ))
            }
        } else {
            router
        };

        router.with_state(self.state.clone())
    }

    /// Build Swagger UI routes
    fn swagger_routes(&self) -> Router<Arc<AppState>> {
        if self.config.enable_swagger {
            use utoipa::OpenApi;
            use utoipa_swagger_ui::SwaggerUi;

            let openapi = crate::api::openapi::ApiDoc::openapi();

            Router::new().merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi))
        } else {
            Router::new()
        }
    }

    /// Run the server
    pub async fn run(self) -> Result<()> {
        let app = self.build_router();

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("fpscope API server listening on {}", addr);
        if self.config.enable_swagger {
            info!("OpenAPI documentation available at: http://{}/api/docs", addr);
        }
        info!("Health check endpoint: http://{}/health", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Get the application state
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }
}
