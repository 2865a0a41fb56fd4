//! Statistics collection utilities.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A thread-safe counter collection (hash attempts, proofs found, ...).
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names.iter().map(|&n| (n, AtomicU64::new(0))).collect();
        Self { counters }
    }

    pub fn increment(&self, name: &str) {
        self.add(name, 1);
    }

    pub fn add(&self, name: &str, value: u64) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(value, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot(
            self.counters
                .iter()
                .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
                .collect(),
        )
    }
}

/// Point-in-time copy of a [`StatsCounter`], ordered by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot(pub BTreeMap<&'static str, u64>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_ignored() {
        let stats = StatsCounter::new(&["attempts"]);
        stats.increment("attempts");
        stats.add("attempts", 4);
        stats.increment("nope");
        assert_eq!(stats.get("attempts"), 5);
        assert_eq!(stats.get("nope"), 0);
    }

    #[test]
    fn snapshot_is_ordered() {
        let stats = StatsCounter::new(&["b", "a"]);
        stats.increment("b");
        let snap = stats.snapshot();
        let keys: Vec<_> = snap.0.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(snap.0["b"], 1);
    }
}
