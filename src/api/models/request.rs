// API Request Models

use crate::fingerprint::CapturedRequest;
use serde::{Deserialize, Serialize};
use utoipa::openapi::schema::{ObjectBuilder, Schema, SchemaType};
use utoipa::openapi::RefOr;
use utoipa::{IntoParams, ToSchema};

/// Query string of the lookup endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Value to look up; user-agent values may be percent-encoded
    #[serde(default)]
    pub by: String,
}

impl<'s> ToSchema<'s> for CapturedRequest {
    fn schema() -> (&'s str, RefOr<Schema>) {
        let object = ObjectBuilder::new()
            .schema_type(SchemaType::Object)
            .description(Some(
                "Request descriptor from the capturing server: ip, http_version, user_agent, \
                 tls {ja3, peetprint, ...} and optional http2 {akamai_fingerprint, ...}",
            ))
            .build();
        ("CapturedRequest", RefOr::T(Schema::Object(object)))
    }
}
