// Observation Model
// One recorded client fingerprint signature

use crate::fingerprint::{CapturedRequest, Dimension};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Observation record in database. Never updated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Observation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_id: Option<i64>,
    pub user_agent: String,
    pub tls_fingerprint: String,
    pub http2_fingerprint: String,
    pub composite_fingerprint: String,
    pub source_address: Option<String>,
    pub raw_payload: String,
    /// Seconds since the Unix epoch, set when the row is inserted
    pub observed_at: i64,
}

impl Observation {
    /// Create new observation from its four dimension values
    pub fn new(
        user_agent: impl Into<String>,
        tls_fingerprint: impl Into<String>,
        http2_fingerprint: impl Into<String>,
        composite_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            observation_id: None,
            user_agent: user_agent.into(),
            tls_fingerprint: tls_fingerprint.into(),
            http2_fingerprint: http2_fingerprint.into(),
            composite_fingerprint: composite_fingerprint.into(),
            source_address: None,
            raw_payload: String::new(),
            observed_at: 0,
        }
    }

    /// Build an unstamped observation from a captured request.
    ///
    /// The source address is left empty; admission decides whether it is kept.
    pub fn from_capture(capture: &CapturedRequest) -> crate::Result<Self> {
        Ok(Self::new(
            capture.user_agent.clone(),
            capture.tls.ja3.clone(),
            capture.http2_fingerprint(),
            capture.tls.peetprint.clone(),
        )
        .with_raw_payload(capture.to_json()?))
    }

    /// Set raw payload
    pub fn with_raw_payload(mut self, raw_payload: String) -> Self {
        self.raw_payload = raw_payload;
        self
    }

    /// Set observation timestamp
    pub fn stamped_at(mut self, timestamp: i64) -> Self {
        self.observed_at = timestamp;
        self
    }

    /// Value recorded for a dimension
    pub fn value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Tls => &self.tls_fingerprint,
            Dimension::Http2 => &self.http2_fingerprint,
            Dimension::Composite => &self.composite_fingerprint,
            Dimension::UserAgent => &self.user_agent,
        }
    }
}
