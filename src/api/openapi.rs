// OpenAPI Documentation

use crate::api::{
    models::{
        error::ApiErrorResponse,
        response::{HealthResponse, StatsResponse},
    },
    routes,
};
use crate::correlation::Correlation;
use crate::fingerprint::CapturedRequest;
use crate::ingest::IngestOutcome;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        routes::search::search_ja3,
        routes::search::search_h2,
        routes::search::search_peetprint,
        routes::search::search_user_agent,
        routes::search::search_dimension,
        routes::observations::submit_observation,
        routes::stats::get_stats,
        routes::health::health_check,
    ),
    components(
        schemas(
            // Request models
            CapturedRequest,

            // Response models
            Correlation,
            IngestOutcome,
            HealthResponse,
            StatsResponse,

            // Error model
            ApiErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "search", description = "Fingerprint and user-agent correlation lookups"),
        (name = "observations", description = "Captured request ingestion"),
        (name = "stats", description = "Observation statistics"),
        (name = "health", description = "Health check"),
    ),
    info(
        title = "fpscope API",
        version = "1.0.0",
        description = r#"
# fpscope REST API

Records the TLS (JA3), HTTP/2 (Akamai) and composite (PeetPrint) fingerprints
of captured client requests together with the declared user agent, and answers
"which other values co-occur with this one?".

## Lookups

`GET /api/v1/search/{ja3|h2|peetprint|user-agent}?by=<value>` returns, for each
other dimension, the ten most frequent co-occurring values:

```json
{
  "ja3": "771,4865-4866,...",
  "h2_fps": { "1:65536;2:0;...": 12, "-": 3 },
  "peet_prints": { "abcxyz": 15 },
  "user_agents": { "Mozilla/5.0 ...": 15 }
}
```

## Authentication

When API keys are configured, every endpoint except `/health` requires an
`X-API-Key` header, and `POST /api/v1/observations` requires a key with
`Ingest` permission.
"#,
        license(
            name = "GPL-3.0",
            url = "https://www.gnu.org/licenses/gpl-3.0.en.html"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_search_paths() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = json["paths"].as_object().unwrap();

        assert!(paths.contains_key("/api/v1/search/ja3"));
        assert!(paths.contains_key("/api/v1/search/{dimension}"));
        assert!(paths.contains_key("/api/v1/observations"));
    }
}
