//! SKU data structures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One purchasable configuration scraped from the configurator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkuRecord {
    /// Memory descriptor, e.g. "16GB RAM"
    pub ram: String,

    /// Storage descriptor, e.g. "512GB SSD"
    pub storage: String,

    /// Display price as shown on the page
    pub price: String,

    /// Processor facet the tile was found under
    pub processor: String,

    /// Network variant, e.g. "5G"
    pub network: String,
}

impl SkuRecord {
    /// Identity key used to compare snapshots.
    ///
    /// Only ram, storage and price take part. Two processors offering the same
    /// memory, storage and price are therefore indistinguishable to the diff.
    ///
    /// Field text keeps one space between nested text nodes
    /// (`<p>16GB <span>RAM</span></p>` reads `16GB RAM`). A status file written
    /// by a tool that joined text nodes without a separator (`16GBRAM`) will
    /// produce one spurious change alert on the first run against it.
    pub fn identity_key(&self) -> String {
        format!("{}|{}|{}", self.ram, self.storage, self.price)
    }

    /// One-line summary used in logs and alert bullets.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} / {} - {}",
            self.processor, self.ram, self.storage, self.price
        )
    }
}

/// Collapse duplicate identity keys, last-seen wins.
///
/// The surviving record keeps the position of the first occurrence.
pub fn dedup_by_identity(records: Vec<SkuRecord>) -> Vec<SkuRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<SkuRecord> = Vec::with_capacity(records.len());

    for record in records {
        let key = record.identity_key();
        match positions.get(&key) {
            Some(&idx) => out[idx] = record,
            None => {
                positions.insert(key, out.len());
                out.push(record);
            }
        }
    }
    out
}

/// Stock state extracted from one page visit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inventory {
    pub available: Vec<SkuRecord>,
    pub out_of_stock: Vec<SkuRecord>,
}

impl Inventory {
    /// Total number of SKUs seen, regardless of stock state.
    pub fn len(&self) -> usize {
        self.available.len() + self.out_of_stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply identity deduplication to both lists.
    pub fn deduplicated(self) -> Self {
        Self {
            available: dedup_by_identity(self.available),
            out_of_stock: dedup_by_identity(self.out_of_stock),
        }
    }
}

/// Outcome of an extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockStatus {
    /// The page was read and the inventory is trustworthy
    Known(Inventory),
    /// Availability could not be determined
    Unknown { reason: String },
}

impl StockStatus {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        match self {
            StockStatus::Known(inventory) => Some(inventory),
            StockStatus::Unknown { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku(ram: &str, storage: &str, price: &str, processor: &str) -> SkuRecord {
        SkuRecord {
            ram: ram.to_string(),
            storage: storage.to_string(),
            price: price.to_string(),
            processor: processor.to_string(),
            network: "5G".to_string(),
        }
    }

    #[test]
    fn test_identity_key_ignores_processor_and_network() {
        let a = sku("16GB RAM", "256GB SSD", "$999", "Intel Core Ultra 5 (135U)");
        let mut b = sku("16GB RAM", "256GB SSD", "$999", "Intel Core Ultra 7 (165U)");
        b.network = "Wi-Fi".to_string();

        assert_eq!(a.identity_key(), "16GB RAM|256GB SSD|$999");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_summary() {
        let record = sku("16GB RAM", "512GB SSD", "$1,299.00", "Ultra 7");
        assert_eq!(record.summary(), "Ultra 7 - 16GB RAM / 512GB SSD - $1,299.00");
    }

    #[test]
    fn test_dedup_last_seen_wins_in_first_position() {
        let records = vec![
            sku("8GB RAM", "256GB SSD", "$999", "first"),
            sku("16GB RAM", "512GB SSD", "$1299", "only"),
            sku("8GB RAM", "256GB SSD", "$999", "last"),
        ];

        let deduped = dedup_by_identity(records);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].processor, "last");
        assert_eq!(deduped[1].processor, "only");
    }

    #[test]
    fn test_inventory_deduplicated_keeps_lists_separate() {
        let inventory = Inventory {
            available: vec![sku("8GB RAM", "256GB SSD", "$999", "a")],
            out_of_stock: vec![
                sku("8GB RAM", "256GB SSD", "$999", "b"),
                sku("8GB RAM", "256GB SSD", "$999", "c"),
            ],
        }
        .deduplicated();

        assert_eq!(inventory.available.len(), 1);
        assert_eq!(inventory.out_of_stock.len(), 1);
        assert_eq!(inventory.out_of_stock[0].processor, "c");
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_stock_status_inventory() {
        assert!(StockStatus::unknown("timeout").inventory().is_none());
        let known = StockStatus::Known(Inventory::default());
        assert!(known.inventory().unwrap().is_empty());
    }
}
