//! Snapshot persistence.
//!
//! The snapshot is the single record of what was last reported as
//! available. It is replaced as a whole, never patched.
//!
//! ```text
//! status.json
//! {
//!   "updated_at": "2026-10-18T07:00:00Z",
//!   "count": 1,
//!   "fingerprint": "<sha256 of sorted identity keys>",
//!   "available_skus": [ { "ram": ..., "storage": ..., "price": ..., ... } ]
//! }
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::SkuRecord;

// Re-export for convenience
pub use local::LocalSnapshotStore;

/// Persisted record of the last reported availability.
///
/// Only `available_skus` is required when reading, so bare
/// `{"available_skus": [...]}` files load as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    /// When the snapshot was written
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Number of available SKUs
    #[serde(default)]
    pub count: usize,

    /// Hex SHA-256 over the sorted identity keys
    #[serde(default)]
    pub fingerprint: String,

    /// Available SKUs in display order
    pub available_skus: Vec<SkuRecord>,
}

impl Snapshot {
    pub fn new(available_skus: Vec<SkuRecord>) -> Self {
        Self {
            updated_at: Some(Utc::now()),
            count: available_skus.len(),
            fingerprint: fingerprint(&available_skus),
            available_skus,
        }
    }
}

/// Order-independent digest of a SKU set's identity keys.
pub fn fingerprint(skus: &[SkuRecord]) -> String {
    let mut keys: Vec<String> = skus.iter().map(SkuRecord::identity_key).collect();
    keys.sort();
    keys.dedup();

    let mut hasher = Sha256::new();
    for key in &keys {
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Storage backend for the snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the full snapshot. Missing or unreadable state yields `None`.
    async fn load_snapshot(&self) -> Option<Snapshot>;

    /// Load the last reported available SKUs.
    async fn load(&self) -> Option<Vec<SkuRecord>> {
        self.load_snapshot().await.map(|s| s.available_skus)
    }

    /// Replace the snapshot. An empty slice records "nothing in stock".
    async fn save(&self, available: &[SkuRecord]) -> Result<()>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sku(ram: &str, price: &str) -> SkuRecord {
        SkuRecord {
            ram: ram.to_string(),
            storage: "256GB SSD".to_string(),
            price: price.to_string(),
            processor: "Ultra 5".to_string(),
            network: "5G".to_string(),
        }
    }

    #[test]
    fn test_fingerprint_ignores_order_and_duplicates() {
        let a = vec![make_sku("8GB", "$999"), make_sku("16GB", "$1299")];
        let b = vec![
            make_sku("16GB", "$1299"),
            make_sku("8GB", "$999"),
            make_sku("16GB", "$1299"),
        ];
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&a[..1]));
    }

    #[test]
    fn test_snapshot_new_fills_metadata() {
        let snapshot = Snapshot::new(vec![make_sku("8GB", "$999")]);
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.fingerprint.len(), 64);
        assert!(snapshot.updated_at.is_some());
    }

    #[test]
    fn test_bare_snapshot_deserializes() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{"available_skus": [{"ram": "8GB", "storage": "256GB SSD", "price": "$999",
                "processor": "Ultra 5", "network": "5G"}]}"#,
        )
        .unwrap();

        assert_eq!(snapshot.available_skus, vec![make_sku("8GB", "$999")]);
        assert!(snapshot.updated_at.is_none());
    }
}
