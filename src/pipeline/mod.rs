//! Change-detection pipeline.
//!
//! - `calculate_diff`: compare previous and current available SKUs
//! - `decide`: turn a delta into an alert and a persistence instruction
//! - `Watcher`: run one full check cycle

pub mod check;
pub mod decide;
pub mod diff;

pub use check::{CheckOutcome, Watcher};
pub use decide::{AlertTemplate, NotificationAction, Trigger, build_alert, decide};
pub use diff::{AvailabilityDelta, calculate_diff};
