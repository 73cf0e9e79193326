use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Counts labels while remembering the order in which each was first seen
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    index: HashMap<String, usize>,
    entries: Vec<FrequencyEntry>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&idx) => self.entries[idx].count += 1,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push(FrequencyEntry {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Descending by count; equal counts keep first-seen order
    pub fn ranked(self) -> FrequencyTable {
        let mut entries = self.entries;
        // sort_by is stable
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        FrequencyTable { entries }
    }

    /// Counts laid out in a fixed label order. Labels not in `order` are dropped,
    /// labels never seen get a zero count.
    pub fn reindexed(&self, order: &[&str]) -> FrequencyTable {
        let entries = order
            .iter()
            .map(|&label| FrequencyEntry {
                label: label.to_string(),
                count: self
                    .index
                    .get(label)
                    .map_or(0, |&idx| self.entries[idx].count),
            })
            .collect();
        FrequencyTable { entries }
    }
}

impl<'a> FromIterator<&'a str> for FrequencyCounter {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut counter = FrequencyCounter::new();
        for label in iter {
            counter.add(label);
        }
        counter
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: u64,
}

/// Label counts in display order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn get(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map_or(0, |e| e.count)
    }

    pub fn first(&self) -> Option<&FrequencyEntry> {
        self.entries.first()
    }

    /// First `k` entries, in the table's order
    pub fn top(&self, k: usize) -> &[FrequencyEntry] {
        &self.entries[..k.min(self.entries.len())]
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.label.clone()).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.count).collect()
    }
}

/// `part / whole * 100`, zero when `whole` is zero
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts_and_total() {
        let counter: FrequencyCounter = ["SP", "RJ", "SP", "MG", "SP"].into_iter().collect();
        assert_eq!(counter.total(), 5);

        let table = counter.ranked();
        assert_eq!(table.get("SP"), 3);
        assert_eq!(table.get("RJ"), 1);
        assert_eq!(table.get("BA"), 0);
    }

    #[test]
    fn test_ranked_ties_keep_first_seen_order() {
        let counter: FrequencyCounter = ["RJ", "MG", "SP", "MG", "RJ", "BA"].into_iter().collect();
        let table = counter.ranked();
        assert_eq!(table.labels(), vec!["RJ", "MG", "SP", "BA"]);
        assert_eq!(table.counts(), vec![2, 2, 1, 1]);
    }

    #[test]
    fn test_reindexed_zero_fills() {
        let counter: FrequencyCounter = ["b", "b", "c"].into_iter().collect();
        let table = counter.reindexed(&["a", "b", "c"]);
        assert_eq!(table.labels(), vec!["a", "b", "c"]);
        assert_eq!(table.counts(), vec![0, 2, 1]);
    }

    #[test]
    fn test_top_truncates() {
        let table: FrequencyTable = ["x", "y", "x"]
            .into_iter()
            .collect::<FrequencyCounter>()
            .ranked();
        assert_eq!(table.top(1).len(), 1);
        assert_eq!(table.top(1)[0].label, "x");
        assert_eq!(table.top(10).len(), 2);
    }

    #[test]
    fn test_percentage() {
        assert!((percentage(1, 3) - 33.333).abs() < 0.01);
        assert_eq!(percentage(5, 0), 0.0);
    }
}
