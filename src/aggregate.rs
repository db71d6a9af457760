use std::collections::{BTreeMap, HashMap};

use crate::models::CanonicalEvent;

/// Accumulation map that remembers first-insertion order, so ranking ties
/// resolve to whichever key was seen first in the input sequence.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Counter {
    /// Add `amount` to `key`'s running total, creating the bucket on first
    /// sight.
    pub fn add(&mut self, key: &str, amount: u64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries ordered by descending total; equal totals keep
    /// first-seen order (stable sort over the insertion sequence).
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(key, total)| (key.as_str(), *total))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Running totals for one calendar year.
#[derive(Debug, Clone, Default)]
pub struct YearStats {
    pub total_ms: u64,
    pub streams: u64,
    pub artist_ms: Counter,
    pub track_ms: Counter,
}

impl YearStats {
    /// Fold one event in: it contributes to the year total, the stream
    /// count, exactly one artist bucket, and exactly one track bucket.
    fn add(&mut self, event: &CanonicalEvent) {
        self.total_ms += event.duration_ms;
        self.streams += 1;
        self.artist_ms.add(&event.group_key, event.duration_ms);
        self.track_ms.add(&event.item_key, event.duration_ms);
    }
}

/// Sequential fold of canonical events into per-year totals. No reordering
/// and no deduplication; repeated identical events accumulate. The result
/// iterates years in ascending order.
pub fn aggregate(events: impl IntoIterator<Item = CanonicalEvent>) -> BTreeMap<i32, YearStats> {
    let mut years: BTreeMap<i32, YearStats> = BTreeMap::new();
    for event in events {
        years.entry(event.year).or_default().add(&event);
    }
    years
}
