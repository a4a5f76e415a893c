// Correlation Engine Tests
// Write path followed by lookups against the in-memory record store

use fpscope::db::{InMemoryObservationStore, Observation, ObservationStore};
use fpscope::fingerprint::{CapturedRequest, Dimension};
use fpscope::ingest::{IngestOutcome, IngestionFilter, ObservationIngestor};
use fpscope::CorrelationEngine;
use std::sync::Arc;

const CHROME_CAPTURE: &str = r#"{
    "ip": "198.51.100.4:51820",
    "http_version": "h2",
    "user_agent": "Chrome/118",
    "tls": { "ja3": "771,4865-4866,...", "ja3_hash": "aa", "peetprint": "abcxyz", "peetprint_hash": "bb" },
    "http2": { "akamai_fingerprint": "1:65536;2:0;...", "akamai_fingerprint_hash": "cc" }
}"#;

const MOZILLA_CAPTURE: &str = r#"{
    "ip": "198.51.100.5:40000",
    "http_version": "http/1.1",
    "user_agent": "Mozilla/5.0",
    "tls": { "ja3": "771,4865-4866,...", "peetprint": "abcxyz" }
}"#;

async fn ingest_all(store: Arc<InMemoryObservationStore>, payloads: &[&str]) -> Vec<IngestOutcome> {
    let ingestor = ObservationIngestor::new(store, IngestionFilter::new(false));
    let mut outcomes = Vec::new();
    for payload in payloads {
        let capture = CapturedRequest::from_json(payload).unwrap();
        outcomes.push(ingestor.record(&capture).await);
    }
    outcomes
}

#[tokio::test]
async fn test_end_to_end_lookup_by_tls() {
    let store = Arc::new(InMemoryObservationStore::new());
    let outcomes = ingest_all(store.clone(), &[CHROME_CAPTURE, MOZILLA_CAPTURE]).await;
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, IngestOutcome::Stored { .. })));

    let engine = CorrelationEngine::new(store);
    let result = engine.by_tls_fingerprint("771,4865-4866,...").await;

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "ja3": "771,4865-4866,...",
            "h2_fps": { "1:65536;2:0;...": 1, "-": 1 },
            "peet_prints": { "abcxyz": 2 },
            "user_agents": { "Chrome/118": 1, "Mozilla/5.0": 1 }
        })
    );
}

#[tokio::test]
async fn test_lookup_by_encoded_user_agent() {
    let store = Arc::new(InMemoryObservationStore::new());
    ingest_all(store.clone(), &[CHROME_CAPTURE, MOZILLA_CAPTURE]).await;

    let engine = CorrelationEngine::new(store);
    let result = engine.by_user_agent("Mozilla%2F5.0").await;

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["ja3s"]["771,4865-4866,..."], 1);
    assert_eq!(json["h2_fps"]["-"], 1);
    assert_eq!(json["peet_prints"]["abcxyz"], 1);
}

#[tokio::test]
async fn test_duplicate_user_agent_keeps_first_fingerprints() {
    let store = Arc::new(InMemoryObservationStore::new());
    let changed = CHROME_CAPTURE.replace("abcxyz", "changed");
    let outcomes = ingest_all(store.clone(), &[CHROME_CAPTURE, &changed]).await;

    assert_eq!(outcomes[1], IngestOutcome::Duplicate);

    let engine = CorrelationEngine::new(store);
    assert!(engine.by_composite_fingerprint("changed").await.is_empty());
    assert_eq!(engine.count_all().await, 1);
}

#[tokio::test]
async fn test_top_k_ranking_and_truncation() {
    let store = Arc::new(InMemoryObservationStore::new());
    // 12 distinct user agents; "ua-common-*" share one composite value
    for i in 0..12 {
        let composite = if i < 5 { "common" } else { "rare" };
        store
            .insert_one(&Observation::new(format!("ua-{:02}", i), "tls", "-", composite))
            .await
            .unwrap();
    }

    let engine = CorrelationEngine::new(store);
    let result = engine.by_tls_fingerprint("tls").await;

    let user_agents = result.related(Dimension::UserAgent).unwrap();
    assert_eq!(user_agents.len(), 10);
    // Equal counts fall back to ascending value order
    assert_eq!(user_agents.entries()[0].0, "ua-00");
    assert_eq!(user_agents.entries()[9].0, "ua-09");

    let composites = result.related(Dimension::Composite).unwrap();
    assert_eq!(composites.entries()[0], ("rare".to_string(), 7));
    assert_eq!(composites.entries()[1], ("common".to_string(), 5));
}

#[tokio::test]
async fn test_write_failure_is_absorbed() {
    let store = Arc::new(InMemoryObservationStore::new());
    store.fail_writes(true);

    let outcomes = ingest_all(store.clone(), &[CHROME_CAPTURE]).await;
    assert!(matches!(outcomes[0], IngestOutcome::Failed { .. }));

    store.fail_writes(false);
    let outcomes = ingest_all(store.clone(), &[CHROME_CAPTURE]).await;
    assert!(matches!(outcomes[0], IngestOutcome::Stored { .. }));
}

#[tokio::test]
async fn test_dedup_read_failure_skips_only_that_capture() {
    let store = Arc::new(InMemoryObservationStore::new());
    store.fail_reads(true);

    let outcomes = ingest_all(store.clone(), &[CHROME_CAPTURE]).await;
    assert!(matches!(outcomes[0], IngestOutcome::Failed { .. }));
    assert!(store.snapshot().await.is_empty());

    store.fail_reads(false);
    let outcomes = ingest_all(store.clone(), &[MOZILLA_CAPTURE]).await;
    assert!(matches!(outcomes[0], IngestOutcome::Stored { .. }));
}
