// Database Traits
// Defines the record store interface for observations

use crate::db::models::Observation;
use crate::fingerprint::Dimension;
use async_trait::async_trait;

/// Append-only observation store
///
/// Every component that reads or writes observations receives one of these
/// by construction.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Durably append one observation and return its ID
    async fn insert_one(&self, observation: &Observation) -> crate::Result<i64>;

    /// All observations whose `dimension` value equals `value` exactly, in no
    /// particular order
    async fn find_all(&self, dimension: Dimension, value: &str)
        -> crate::Result<Vec<Observation>>;

    /// Whether at least one observation has `value` in `dimension`
    async fn any_match(&self, dimension: Dimension, value: &str) -> crate::Result<bool> {
        Ok(!self.find_all(dimension, value).await?.is_empty())
    }

    /// Total number of stored observations
    async fn count_all(&self) -> crate::Result<i64>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> crate::Result<()> {
        self.count_all().await.map(|_| ())
    }
}
