// Ingestion Module
// Write path: capture -> admission filter -> dedup gate -> record store

pub mod dedup;
pub mod filter;

pub use dedup::DedupGate;
pub use filter::{strip_port, AdmissionDecision, IngestionFilter};

use crate::db::models::Observation;
use crate::db::traits::ObservationStore;
use crate::fingerprint::CapturedRequest;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// What happened to one captured request on the write path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Stored under the given observation ID
    Stored { observation_id: i64 },

    /// The user-agent was already recorded
    Duplicate,

    /// The admission filter refused the user-agent
    Rejected { reason: String },

    /// A store operation failed; the request is still considered processed
    Failed { error: String },
}

/// Runs captured requests through admission, dedup and insertion
pub struct ObservationIngestor {
    filter: IngestionFilter,
    dedup: DedupGate,
    store: Arc<dyn ObservationStore>,
}

impl ObservationIngestor {
    pub fn new(store: Arc<dyn ObservationStore>, filter: IngestionFilter) -> Self {
        Self {
            filter,
            dedup: DedupGate::new(store.clone()),
            store,
        }
    }

    /// Admission filter in use
    pub fn filter(&self) -> &IngestionFilter {
        &self.filter
    }

    /// Process one capture, propagating store failures.
    ///
    /// Errors from the dedup check or the insert concern this capture only.
    pub async fn ingest(&self, capture: &CapturedRequest) -> crate::Result<IngestOutcome> {
        let user_agent = capture.user_agent.as_str();
        let mut observation = Observation::from_capture(capture)?;

        let decision = self.filter.admit(&mut observation, user_agent, &capture.ip);
        match decision {
            AdmissionDecision::RejectedEmpty => {
                debug!("Rejected capture with empty user-agent");
                return Ok(IngestOutcome::Rejected {
                    reason: "empty user-agent".to_string(),
                });
            }
            AdmissionDecision::RejectedProhibited(substring) => {
                debug!("Rejected user-agent {:?} (matched {:?})", user_agent, substring);
                return Ok(IngestOutcome::Rejected {
                    reason: format!("user-agent matches prohibited substring {:?}", substring),
                });
            }
            AdmissionDecision::Admitted | AdmissionDecision::AdmittedByOverride => {}
        }

        if !self.dedup.should_insert(user_agent).await? {
            debug!("Record already exists for user-agent {:?}", user_agent);
            return Ok(IngestOutcome::Duplicate);
        }

        let observation = observation.stamped_at(Utc::now().timestamp());
        let observation_id = self.store.insert_one(&observation).await?;
        info!("Saved observation {} for user-agent {:?}", observation_id, user_agent);

        Ok(IngestOutcome::Stored { observation_id })
    }

    /// Process one capture, logging and absorbing store failures
    pub async fn record(&self, capture: &CapturedRequest) -> IngestOutcome {
        match self.ingest(capture).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    "Failed to record capture for user-agent {:?}: {}",
                    capture.user_agent, e
                );
                IngestOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryObservationStore;
    use crate::fingerprint::{Http2Details, TlsDetails};
    use crate::fingerprint::Dimension;

    fn capture(user_agent: &str, ja3: &str) -> CapturedRequest {
        CapturedRequest {
            ip: "198.51.100.20:50000".to_string(),
            http_version: "h2".to_string(),
            user_agent: user_agent.to_string(),
            tls: TlsDetails {
                ja3: ja3.to_string(),
                peetprint: "peet".to_string(),
                ..Default::default()
            },
            http2: Some(Http2Details {
                akamai_fingerprint: "1:65536;2:0".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn ingestor(store: Arc<InMemoryObservationStore>, log_ips: bool) -> ObservationIngestor {
        ObservationIngestor::new(store, IngestionFilter::new(log_ips))
    }

    #[tokio::test]
    async fn test_stores_admitted_capture() {
        let store = Arc::new(InMemoryObservationStore::new());
        let ingestor = ingestor(store.clone(), true);

        let outcome = ingestor.ingest(&capture("Chrome/118", "771,4865")).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Stored { observation_id: 1 });

        let stored = store.snapshot().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].http2_fingerprint, "1:65536;2:0");
        assert_eq!(stored[0].source_address.as_deref(), Some("198.51.100.20"));
        assert!(stored[0].observed_at > 0);
    }

    #[tokio::test]
    async fn test_rejected_capture_not_stored() {
        let store = Arc::new(InMemoryObservationStore::new());
        let ingestor = ingestor(store.clone(), false);

        let outcome = ingestor.ingest(&capture("curl/7.68.0", "771")).await.unwrap();
        assert!(matches!(outcome, IngestOutcome::Rejected { .. }));

        let outcome = ingestor.ingest(&capture("", "771")).await.unwrap();
        assert!(matches!(outcome, IngestOutcome::Rejected { .. }));

        assert_eq!(store.count_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_user_agent_keeps_first() {
        let store = Arc::new(InMemoryObservationStore::new());
        let ingestor = ingestor(store.clone(), false);

        ingestor.ingest(&capture("Chrome/118", "first")).await.unwrap();
        let outcome = ingestor.ingest(&capture("Chrome/118", "second")).await.unwrap();

        assert_eq!(outcome, IngestOutcome::Duplicate);
        assert_eq!(store.count_all().await.unwrap(), 1);
        assert!(store.find_all(Dimension::Tls, "second").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dedup_failure_aborts_only_this_insert() {
        let store = Arc::new(InMemoryObservationStore::new());
        let ingestor = ingestor(store.clone(), false);

        store.fail_reads(true);
        assert!(ingestor.ingest(&capture("Chrome/118", "a")).await.is_err());

        store.fail_reads(false);
        let outcome = ingestor.ingest(&capture("Chrome/118", "a")).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Stored { observation_id: 1 });
    }

    #[tokio::test]
    async fn test_record_absorbs_write_failure() {
        let store = Arc::new(InMemoryObservationStore::new());
        let ingestor = ingestor(store.clone(), false);

        store.fail_writes(true);
        let outcome = ingestor.record(&capture("Chrome/118", "a")).await;

        assert!(matches!(outcome, IngestOutcome::Failed { .. }));
        assert_eq!(store.count_all().await.unwrap(), 0);
    }
}
