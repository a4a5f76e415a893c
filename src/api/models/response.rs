// API Response Models

use crate::correlation::Correlation;
use serde::{Deserialize, Serialize};
use utoipa::openapi::schema::{ObjectBuilder, Schema, SchemaType};
use utoipa::openapi::RefOr;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// API version
    pub version: String,

    /// Uptime in seconds
    pub uptime_seconds: u64,

    /// Record store status
    pub database: String,
}

/// Statistics response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    /// Stored observations, -1 when the store could not be counted
    pub total_requests: i64,
}

impl<'s> ToSchema<'s> for Correlation {
    fn schema() -> (&'s str, RefOr<Schema>) {
        let object = ObjectBuilder::new()
            .schema_type(SchemaType::Object)
            .description(Some(
                "Queried value under its dimension key (ja3, h2_fp, peet_print, useragent) and, \
                 for each other dimension, a value -> count map under its plural key \
                 (ja3s, h2_fps, peet_prints, user_agents), highest count first",
            ))
            .build();
        ("Correlation", RefOr::T(Schema::Object(object)))
    }
}
