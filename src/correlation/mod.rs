// Correlation Module
// Read path: lookup value -> record store -> aggregator -> top-k -> result

pub mod aggregator;
pub mod top_k;

pub use aggregator::{Aggregator, FrequencyTable};
pub use top_k::{top_k, RankedCounts};

use crate::db::traits::ObservationStore;
use crate::fingerprint::Dimension;
use percent_encoding::percent_decode_str;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, warn};

/// Entries kept per frequency map unless configured otherwise
pub const DEFAULT_TOP_K: usize = 10;

/// Result of a lookup: the queried value plus one ranked map per other
/// dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    pub dimension: Dimension,
    pub value: String,
    related: [(Dimension, RankedCounts); 3],
}

impl Correlation {
    /// Result with three empty maps
    pub fn empty(dimension: Dimension, value: impl Into<String>) -> Self {
        let [a, b, c] = dimension.others();
        Self {
            dimension,
            value: value.into(),
            related: [
                (a, RankedCounts::default()),
                (b, RankedCounts::default()),
                (c, RankedCounts::default()),
            ],
        }
    }

    /// Truncate each map of a frequency table to `k` entries
    pub fn from_table(value: impl Into<String>, table: FrequencyTable, k: usize) -> Self {
        let dimension = table.queried();
        let [(a, a_counts), (b, b_counts), (c, c_counts)] = table.into_parts();
        Self {
            dimension,
            value: value.into(),
            related: [
                (a, top_k(a_counts, k)),
                (b, top_k(b_counts, k)),
                (c, top_k(c_counts, k)),
            ],
        }
    }

    /// Ranked map for another dimension; `None` for the queried dimension
    pub fn related(&self, dimension: Dimension) -> Option<&RankedCounts> {
        self.related
            .iter()
            .find(|(candidate, _)| *candidate == dimension)
            .map(|(_, counts)| counts)
    }

    /// (dimension, ranked map) pairs in storage column order
    pub fn related_maps(&self) -> impl Iterator<Item = (Dimension, &RankedCounts)> {
        self.related.iter().map(|(dimension, counts)| (*dimension, counts))
    }

    /// True when no observation matched
    pub fn is_empty(&self) -> bool {
        self.related.iter().all(|(_, counts)| counts.is_empty())
    }
}

impl Serialize for Correlation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(self.dimension.value_key(), &self.value)?;
        for (dimension, counts) in &self.related {
            map.serialize_entry(dimension.counts_key(), counts)?;
        }
        map.end()
    }
}

/// Query router over the record store
pub struct CorrelationEngine {
    store: Arc<dyn ObservationStore>,
    aggregator: Aggregator,
    top_k: usize,
}

impl CorrelationEngine {
    pub fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self::with_top_k(store, DEFAULT_TOP_K)
    }

    pub fn with_top_k(store: Arc<dyn ObservationStore>, top_k: usize) -> Self {
        Self {
            aggregator: Aggregator::new(store.clone()),
            store,
            top_k,
        }
    }

    /// Entries kept per map
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Cross-tabulate `value` in `dimension` against the other three.
    ///
    /// A failed store read is logged and yields empty maps.
    pub async fn correlate(&self, dimension: Dimension, value: &str) -> Correlation {
        match self.aggregator.aggregate(dimension, value).await {
            Ok(table) => Correlation::from_table(value, table, self.top_k),
            Err(e) => {
                warn!("Error querying observations by {} = {:?}: {}", dimension, value, e);
                Correlation::empty(dimension, value)
            }
        }
    }

    /// Look up by a caller-supplied value. User-agent values arrive
    /// percent-encoded and are decoded first; an undecodable value yields an
    /// empty result carrying the raw input.
    pub async fn lookup(&self, dimension: Dimension, raw_value: &str) -> Correlation {
        match dimension {
            Dimension::UserAgent => match query_unescape(raw_value) {
                Ok(decoded) => {
                    debug!("Decoded user-agent lookup {:?} -> {:?}", raw_value, decoded);
                    let mut correlation = self.correlate(dimension, &decoded).await;
                    correlation.value = raw_value.to_string();
                    correlation
                }
                Err(e) => {
                    debug!("Undecodable user-agent lookup {:?}: {}", raw_value, e);
                    Correlation::empty(dimension, raw_value)
                }
            },
            _ => self.correlate(dimension, raw_value).await,
        }
    }

    pub async fn by_tls_fingerprint(&self, value: &str) -> Correlation {
        self.lookup(Dimension::Tls, value).await
    }

    pub async fn by_http2_fingerprint(&self, value: &str) -> Correlation {
        self.lookup(Dimension::Http2, value).await
    }

    pub async fn by_composite_fingerprint(&self, value: &str) -> Correlation {
        self.lookup(Dimension::Composite, value).await
    }

    pub async fn by_user_agent(&self, value: &str) -> Correlation {
        self.lookup(Dimension::UserAgent, value).await
    }

    /// Total stored observations, or -1 when the store cannot count
    pub async fn count_all(&self) -> i64 {
        match self.store.count_all().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count observations: {}", e);
                -1
            }
        }
    }
}

/// Decode a query-string component: `+` is a space and every `%` must start
/// a two-digit hex escape. The decoded bytes must be UTF-8.
pub fn query_unescape(input: &str) -> crate::Result<String> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(crate::CorrelationError::DecodeError {
                    message: format!(
                        "invalid URL escape {:?}",
                        String::from_utf8_lossy(&bytes[i..end])
                    ),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| crate::CorrelationError::DecodeError {
            message: format!("decoded value is not UTF-8: {}", e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryObservationStore;
    use crate::db::models::Observation;

    async fn seeded_engine() -> (Arc<InMemoryObservationStore>, CorrelationEngine) {
        let store = Arc::new(InMemoryObservationStore::new());
        store
            .insert_one(&Observation::new(
                "Chrome/118",
                "771,4865-4866,...",
                "1:65536;2:0;...",
                "abcxyz",
            ))
            .await
            .unwrap();
        store
            .insert_one(&Observation::new("Mozilla/5.0", "771,4865-4866,...", "-", "abcxyz"))
            .await
            .unwrap();
        let engine = CorrelationEngine::new(store.clone());
        (store, engine)
    }

    #[test]
    fn test_query_unescape() {
        assert_eq!(query_unescape("Mozilla%2F5.0").unwrap(), "Mozilla/5.0");
        assert_eq!(query_unescape("a+b%20c").unwrap(), "a b c");
        assert_eq!(query_unescape("plain").unwrap(), "plain");
        assert_eq!(query_unescape("%E2%9C%93").unwrap(), "\u{2713}");
        assert!(query_unescape("bad%zz").is_err());
        assert!(query_unescape("trailing%2").is_err());
        assert!(query_unescape("%").is_err());
        assert!(query_unescape("%FF").is_err());
    }

    #[test]
    fn test_query_unescape_multibyte_after_percent() {
        assert!(query_unescape("%\u{20ac}").is_err());
        assert!(query_unescape("%a\u{20ac}").is_err());
        assert!(query_unescape("Mozilla%a\u{20ac}").is_err());
        assert_eq!(query_unescape("\u{20ac}%20x").unwrap(), "\u{20ac} x");
    }

    #[tokio::test]
    async fn test_by_tls_fingerprint_counts_others() {
        let (_store, engine) = seeded_engine().await;

        let result = engine.by_tls_fingerprint("771,4865-4866,...").await;

        assert_eq!(result.dimension, Dimension::Tls);
        let http2 = result.related(Dimension::Http2).unwrap();
        assert_eq!(http2.get("1:65536;2:0;..."), Some(1));
        assert_eq!(http2.get("-"), Some(1));
        assert_eq!(result.related(Dimension::Composite).unwrap().get("abcxyz"), Some(2));
        assert_eq!(result.related(Dimension::UserAgent).unwrap().len(), 2);
        assert!(result.related(Dimension::Tls).is_none());
    }

    #[tokio::test]
    async fn test_by_user_agent_decodes_value() {
        let (_store, engine) = seeded_engine().await;

        let result = engine.by_user_agent("Mozilla%2F5.0").await;

        assert_eq!(result.value, "Mozilla%2F5.0");
        assert_eq!(
            result.related(Dimension::Tls).unwrap().get("771,4865-4866,..."),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_by_user_agent_decode_failure_is_empty() {
        let (_store, engine) = seeded_engine().await;

        let result = engine.by_user_agent("Mozilla%zz").await;

        assert!(result.is_empty());
        assert_eq!(result.related_maps().count(), 3);
    }

    #[tokio::test]
    async fn test_by_user_agent_multibyte_escape_is_empty() {
        let (_store, engine) = seeded_engine().await;

        let result = engine.by_user_agent("%\u{20ac}").await;

        assert!(result.is_empty());
        assert_eq!(result.value, "%\u{20ac}");
    }

    #[tokio::test]
    async fn test_unknown_value_is_empty() {
        let (_store, engine) = seeded_engine().await;

        let result = engine.by_composite_fingerprint("nope").await;
        assert!(result.is_empty());
        assert_eq!(result.value, "nope");
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_empty() {
        let (store, engine) = seeded_engine().await;
        store.fail_reads(true);

        let result = engine.by_http2_fingerprint("-").await;
        assert!(result.is_empty());
        assert_eq!(engine.count_all().await, -1);
    }

    #[tokio::test]
    async fn test_count_all() {
        let (_store, engine) = seeded_engine().await;
        assert_eq!(engine.count_all().await, 2);
    }

    #[tokio::test]
    async fn test_serialized_shape() {
        let (_store, engine) = seeded_engine().await;

        let result = engine.by_http2_fingerprint("-").await;
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["h2_fp"], "-");
        assert_eq!(json["ja3s"]["771,4865-4866,..."], 1);
        assert_eq!(json["peet_prints"]["abcxyz"], 1);
        assert_eq!(json["user_agents"]["Mozilla/5.0"], 1);
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_configured_top_k() {
        let store = Arc::new(InMemoryObservationStore::new());
        for i in 0..5 {
            store
                .insert_one(&Observation::new(format!("ua-{}", i), "tls", "-", "p"))
                .await
                .unwrap();
        }
        let engine = CorrelationEngine::with_top_k(store, 3);

        let result = engine.by_tls_fingerprint("tls").await;
        assert_eq!(result.related(Dimension::UserAgent).unwrap().len(), 3);
    }
}
