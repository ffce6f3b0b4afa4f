// src/models/mod.rs

//! Domain models for the watcher.

mod alert;
mod config;
mod selectors;
mod sku;

pub use alert::{Alert, COLOR_AVAILABLE, COLOR_SOLD_OUT, Delivery};
pub use config::{Config, Facet, FetchConfig, NotifyConfig, WatchConfig};
pub use selectors::PageSelectors;
pub use sku::{Inventory, SkuRecord, StockStatus, dedup_by_identity};
