// API State Management

use crate::api::config::ApiConfig;
use crate::correlation::CorrelationEngine;
use crate::db::config::CaptureConfig;
use crate::db::traits::ObservationStore;
use crate::ingest::{IngestionFilter, ObservationIngestor};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
pub struct AppState {
    /// API configuration
    pub config: Arc<ApiConfig>,

    /// Record store shared by both paths
    pub store: Arc<dyn ObservationStore>,

    /// Read path
    pub engine: CorrelationEngine,

    /// Write path
    pub ingestor: ObservationIngestor,

    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: ApiConfig, store: Arc<dyn ObservationStore>, capture: &CaptureConfig) -> Self {
        Self {
            config: Arc::new(config),
            engine: CorrelationEngine::with_top_k(store.clone(), capture.top_k),
            ingestor: ObservationIngestor::new(store.clone(), IngestionFilter::new(capture.log_ips)),
            store,
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
