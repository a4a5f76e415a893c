// Aggregator
// Exact co-occurrence counting over matching observations

use crate::db::models::Observation;
use crate::db::traits::ObservationStore;
use crate::fingerprint::Dimension;
use std::collections::HashMap;
use std::sync::Arc;

/// Untruncated counts for the three dimensions other than the queried one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    queried: Dimension,
    counts: [(Dimension, HashMap<String, u64>); 3],
}

impl FrequencyTable {
    /// Empty table for a queried dimension
    pub fn empty(queried: Dimension) -> Self {
        let [a, b, c] = queried.others();
        Self {
            queried,
            counts: [
                (a, HashMap::new()),
                (b, HashMap::new()),
                (c, HashMap::new()),
            ],
        }
    }

    /// Count every other-dimension value of each observation.
    ///
    /// Every value is a bucket, including the `-` HTTP/2 sentinel and empty
    /// strings.
    pub fn from_observations<'a>(
        queried: Dimension,
        observations: impl IntoIterator<Item = &'a Observation>,
    ) -> Self {
        let mut table = Self::empty(queried);
        for observation in observations {
            for (dimension, counts) in table.counts.iter_mut() {
                *counts
                    .entry(observation.value(*dimension).to_string())
                    .or_insert(0) += 1;
            }
        }
        table
    }

    pub fn queried(&self) -> Dimension {
        self.queried
    }

    /// Counts for one of the other dimensions
    pub fn counts(&self, dimension: Dimension) -> Option<&HashMap<String, u64>> {
        self.counts
            .iter()
            .find(|(candidate, _)| *candidate == dimension)
            .map(|(_, counts)| counts)
    }

    /// Consume into (dimension, counts) pairs in storage column order
    pub fn into_parts(self) -> [(Dimension, HashMap<String, u64>); 3] {
        self.counts
    }
}

/// Builds frequency tables from the record store
pub struct Aggregator {
    store: Arc<dyn ObservationStore>,
}

impl Aggregator {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self { store }
    }

    /// Fetch every observation with `value` in `dimension` and count the rest
    pub async fn aggregate(&self, dimension: Dimension, value: &str) -> crate::Result<FrequencyTable> {
        let observations = self.store.find_all(dimension, value).await?;
        Ok(FrequencyTable::from_observations(dimension, &observations))
    }
}
