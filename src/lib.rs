// src/lib.rs

//! skuwatch library
//!
//! Extracts purchasable SKUs from a configurator page, diffs them against the
//! last persisted snapshot and decides whether an availability alert is due.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
