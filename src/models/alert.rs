//! Alert content handed to a notifier.

use serde::{Deserialize, Serialize};

/// Green, used when at least one SKU is available.
pub const COLOR_AVAILABLE: u32 = 0x00FF00;

/// Red, used when nothing is available.
pub const COLOR_SOLD_OUT: u32 = 0xFF0000;

/// What happened to an alert handed to a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delivery {
    /// The channel accepted the alert
    Sent,
    /// No channel is configured; nothing left the process
    Skipped,
    /// The channel rejected the alert or could not be reached
    Failed,
}

/// Rendered alert, independent of the delivery channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    /// Attention line shown above the card
    pub mention: String,

    /// Card title
    pub title: String,

    /// Link to the product page
    pub url: String,

    /// Markdown bullet list or sold-out message
    pub description: String,

    /// Card color
    pub color: u32,

    /// Footer text with the available count
    pub footer: String,
}
