// Dedup Gate
// Suppresses observations whose user-agent has already been recorded

use crate::db::traits::ObservationStore;
use crate::fingerprint::Dimension;
use std::sync::Arc;

/// First-seen-wins gate keyed on the user-agent string alone.
///
/// A later request reusing a recorded user-agent is discarded even when its
/// fingerprints differ, so one user-agent never maps to more than one stored
/// observation.
pub struct DedupGate {
    store: Arc<dyn ObservationStore>,
}

impl DedupGate {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self { store }
    }

    /// True when no stored observation carries exactly this user-agent.
    ///
    /// A failed existence check is returned to the caller and only aborts the
    /// current insertion.
    pub async fn should_insert(&self, user_agent: &str) -> crate::Result<bool> {
        let exists = self
            .store
            .any_match(Dimension::UserAgent, user_agent)
            .await?;
        Ok(!exists)
    }
}
