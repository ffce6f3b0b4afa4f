//! Availability diff between two snapshots.
//!
//! Records are matched by [`SkuRecord::identity_key`] only. Order and
//! duplicate counts in either input have no effect on the outcome.

use std::collections::HashSet;

use crate::models::SkuRecord;

/// Change between the previously reported and the currently available SKUs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityDelta {
    /// Currently available records, as extracted
    pub current: Vec<SkuRecord>,
    /// Records from the last snapshot
    pub previous: Vec<SkuRecord>,
    /// Records of `current` whose key was not previously available
    pub added: Vec<SkuRecord>,
    /// Records of `previous` whose key is no longer available
    pub removed: Vec<SkuRecord>,
    /// Whether the two key sets differ
    pub changed: bool,
}

impl AvailabilityDelta {
    /// Total number of keys that appeared or disappeared.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Compute the delta between `previous` and `current`.
pub fn calculate_diff(previous: &[SkuRecord], current: &[SkuRecord]) -> AvailabilityDelta {
    let prev_keys: HashSet<String> = previous.iter().map(SkuRecord::identity_key).collect();
    let curr_keys: HashSet<String> = current.iter().map(SkuRecord::identity_key).collect();

    let added = unique_missing(current, &prev_keys);
    let removed = unique_missing(previous, &curr_keys);

    AvailabilityDelta {
        current: current.to_vec(),
        previous: previous.to_vec(),
        added,
        removed,
        changed: prev_keys != curr_keys,
    }
}

/// Records whose key is absent from `other`, one per key, first occurrence kept.
fn unique_missing(records: &[SkuRecord], other: &HashSet<String>) -> Vec<SkuRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| {
            let key = r.identity_key();
            !other.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sku(ram: &str, storage: &str, price: &str) -> SkuRecord {
        SkuRecord {
            ram: ram.to_string(),
            storage: storage.to_string(),
            price: price.to_string(),
            processor: "Intel Core Ultra 5 (135U)".to_string(),
            network: "5G".to_string(),
        }
    }

    fn base() -> SkuRecord {
        make_sku("8GB", "256GB SSD", "$999")
    }

    fn bigger() -> SkuRecord {
        make_sku("16GB", "512GB SSD", "$1299")
    }

    fn keys(records: &[SkuRecord]) -> Vec<String> {
        let mut keys: Vec<String> = records.iter().map(SkuRecord::identity_key).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_no_changes() {
        let snapshot = vec![base(), bigger()];

        let delta = calculate_diff(&snapshot, &snapshot);
        assert!(!delta.changed);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
        assert_eq!(delta.change_count(), 0);
    }

    #[test]
    fn test_order_and_duplicates_ignored() {
        let prev = vec![base(), bigger()];
        let curr = vec![bigger(), base(), bigger(), base()];

        let delta = calculate_diff(&prev, &curr);
        assert!(!delta.changed);
        assert!(delta.added.is_empty());
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_addition_returns_full_record() {
        let prev = vec![base()];
        let curr = vec![base(), bigger()];

        let delta = calculate_diff(&prev, &curr);
        assert!(delta.changed);
        assert_eq!(delta.added, vec![bigger()]);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_removal_to_empty() {
        let prev = vec![base()];
        let curr: Vec<SkuRecord> = vec![];

        let delta = calculate_diff(&prev, &curr);
        assert!(delta.changed);
        assert!(delta.added.is_empty());
        assert_eq!(delta.removed, vec![base()]);
    }

    #[test]
    fn test_empty_to_full() {
        let delta = calculate_diff(&[], &[base()]);
        assert!(delta.changed);
        assert_eq!(delta.added.len(), 1);
        assert!(delta.removed.is_empty());
    }

    #[test]
    fn test_both_empty_is_unchanged() {
        let delta = calculate_diff(&[], &[]);
        assert!(!delta.changed);
    }

    #[test]
    fn test_price_change_is_swap() {
        let prev = vec![base()];
        let curr = vec![make_sku("8GB", "256GB SSD", "$899")];

        let delta = calculate_diff(&prev, &curr);
        assert!(delta.changed);
        assert_eq!(delta.added[0].price, "$899");
        assert_eq!(delta.removed[0].price, "$999");
    }

    #[test]
    fn test_processor_difference_is_invisible() {
        let prev = vec![base()];
        let mut other_cpu = base();
        other_cpu.processor = "Intel Core Ultra 7 (165U)".to_string();

        let delta = calculate_diff(&prev, &[other_cpu]);
        assert!(!delta.changed);
    }

    #[test]
    fn test_result_independent_of_input_order() {
        let a = vec![base(), bigger(), make_sku("32GB", "1TB SSD", "$1899")];
        let b = vec![make_sku("4GB", "64GB SSD", "$499"), base()];
        let a_rev: Vec<SkuRecord> = a.iter().rev().cloned().collect();
        let b_rev: Vec<SkuRecord> = b.iter().rev().cloned().collect();

        let forward = calculate_diff(&a, &b);
        let reversed = calculate_diff(&a_rev, &b_rev);

        assert_eq!(forward.changed, reversed.changed);
        assert_eq!(keys(&forward.added), keys(&reversed.added));
        assert_eq!(keys(&forward.removed), keys(&reversed.removed));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let prev = vec![base()];
        let curr = vec![bigger()];
        let (prev_before, curr_before) = (prev.clone(), curr.clone());

        let delta = calculate_diff(&prev, &curr);
        assert_eq!(prev, prev_before);
        assert_eq!(curr, curr_before);
        assert_eq!(delta.previous, prev);
        assert_eq!(delta.current, curr);
    }
}
