// In-Memory Observation Store
// Process-local store for tests and database-less runs

use crate::db::models::Observation;
use crate::db::traits::ObservationStore;
use crate::fingerprint::Dimension;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory observation store
#[derive(Default)]
pub struct InMemoryObservationStore {
    observations: RwLock<Vec<Observation>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryObservationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read (find, exists, count) fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent insert fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of everything stored so far, in insertion order
    pub async fn snapshot(&self) -> Vec<Observation> {
        self.observations.read().await.clone()
    }

    fn check_reads(&self) -> crate::Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(crate::CorrelationError::DatabaseError(
                "in-memory store read failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ObservationStore for InMemoryObservationStore {
    async fn insert_one(&self, observation: &Observation) -> crate::Result<i64> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(crate::CorrelationError::DatabaseError(
                "in-memory store write failure".to_string(),
            ));
        }

        let mut observations = self.observations.write().await;
        let id = observations.len() as i64 + 1;
        let mut stored = observation.clone();
        stored.observation_id = Some(id);
        observations.push(stored);

        Ok(id)
    }

    async fn find_all(
        &self,
        dimension: Dimension,
        value: &str,
    ) -> crate::Result<Vec<Observation>> {
        self.check_reads()?;

        let observations = self.observations.read().await;
        Ok(observations
            .iter()
            .filter(|obs| obs.value(dimension) == value)
            .cloned()
            .collect())
    }

    async fn any_match(&self, dimension: Dimension, value: &str) -> crate::Result<bool> {
        self.check_reads()?;

        let observations = self.observations.read().await;
        Ok(observations.iter().any(|obs| obs.value(dimension) == value))
    }

    async fn count_all(&self) -> crate::Result<i64> {
        self.check_reads()?;
        Ok(self.observations.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryObservationStore::new();

        let first = store
            .insert_one(&Observation::new("a", "t", "h", "c"))
            .await
            .unwrap();
        let second = store
            .insert_one(&Observation::new("b", "t", "h", "c"))
            .await
            .unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(store.count_all().await.unwrap(), 2);
        assert_eq!(store.find_all(Dimension::Tls, "t").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryObservationStore::new();

        store.fail_writes(true);
        assert!(store
            .insert_one(&Observation::new("a", "t", "h", "c"))
            .await
            .is_err());

        store.fail_reads(true);
        assert!(store.count_all().await.is_err());
        assert!(store.find_all(Dimension::Tls, "t").await.is_err());
        assert!(store.any_match(Dimension::UserAgent, "a").await.is_err());

        store.fail_reads(false);
        assert_eq!(store.count_all().await.unwrap(), 0);
    }
}
