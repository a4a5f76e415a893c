// Top-K Selector
// Deterministic bounded ranking of frequency maps

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Frequency entries in rank order: count descending, then value ascending.
///
/// Serializes as a JSON object whose keys appear in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts(Vec<(String, u64)>);

impl RankedCounts {
    /// Entries in rank order
    pub fn entries(&self) -> &[(String, u64)] {
        &self.0
    }

    /// Count recorded for a value, if it survived truncation
    pub fn get(&self, value: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == value)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unordered view, convenient for comparisons
    pub fn to_map(&self) -> HashMap<String, u64> {
        self.0.iter().cloned().collect()
    }
}

impl IntoIterator for RankedCounts {
    type Item = (String, u64);
    type IntoIter = std::vec::IntoIter<(String, u64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Keep the `k` highest counts.
///
/// Entries are ordered by (count descending, value ascending) before
/// truncation so equal counts always resolve the same way.
pub fn top_k(counts: HashMap<String, u64>, k: usize) -> RankedCounts {
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    entries.sort_unstable_by(|(a_value, a_count), (b_value, b_count)| {
        b_count.cmp(a_count).then_with(|| a_value.cmp(b_value))
    });
    entries.truncate(k);
    RankedCounts(entries)
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (value, count) in &self.0 {
            map.serialize_entry(value, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RankedCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RankedVisitor;

        impl<'de> Visitor<'de> for RankedVisitor {
            type Value = RankedCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of value to occurrence count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut counts = HashMap::new();
                while let Some((value, count)) = access.next_entry::<String, u64>()? {
                    counts.insert(value, count);
                }
                Ok(top_k(counts, usize::MAX))
            }
        }

        deserializer.deserialize_map(RankedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(v, c)| (v.to_string(), *c)).collect()
    }

    #[test]
    fn test_orders_by_count_then_value() {
        let ranked = top_k(counts(&[("b", 2), ("a", 2), ("c", 5), ("d", 1)]), 10);

        let order: Vec<&str> = ranked.entries().iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_truncates_to_k() {
        let many: HashMap<String, u64> = (0..25).map(|i| (format!("v{:02}", i), i)).collect();
        let ranked = top_k(many, 10);

        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked.entries()[0], ("v24".to_string(), 24));
        assert_eq!(ranked.entries()[9], ("v15".to_string(), 15));
    }

    #[test]
    fn test_fewer_than_k_returns_all() {
        let ranked = top_k(counts(&[("x", 1), ("y", 3)]), 10);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_tie_at_boundary_is_deterministic() {
        let tied: HashMap<String, u64> = (0..12).map(|i| (format!("ua-{:02}", i), 1)).collect();
        let ranked = top_k(tied.clone(), 10);

        assert_eq!(ranked.get("ua-00"), Some(1));
        assert_eq!(ranked.get("ua-09"), Some(1));
        assert_eq!(ranked.get("ua-10"), None);
        assert_eq!(ranked, top_k(tied, 10));
    }

    #[test]
    fn test_zero_k_is_empty() {
        assert!(top_k(counts(&[("x", 1)]), 0).is_empty());
    }

    #[test]
    fn test_serializes_in_rank_order() {
        let ranked = top_k(counts(&[("low", 1), ("high", 9)]), 10);
        let json = serde_json::to_string(&ranked).unwrap();

        assert_eq!(json, r#"{"high":9,"low":1}"#);

        let back: RankedCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ranked);
    }
}
