//! Notification decision.
//!
//! Turns a delta into at most one alert and says whether the snapshot should
//! follow. Nothing here performs I/O.

use crate::models::{Alert, COLOR_AVAILABLE, COLOR_SOLD_OUT, Config, SkuRecord};
use crate::pipeline::AvailabilityDelta;

/// Static parts of every alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertTemplate {
    pub product_name: String,
    pub product_url: String,
    /// Network label used when no available SKU carries one
    pub default_network: String,
}

impl AlertTemplate {
    pub fn from_config(config: &Config) -> Self {
        Self {
            product_name: config.notify.product_name.clone(),
            product_url: config.watch.product_url.clone(),
            default_network: config.page.network.clone(),
        }
    }
}

/// Why an alert is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Forced test alert
    Forced,
    /// The available key set changed
    Changed { added: usize, removed: usize },
}

/// An alert to dispatch plus the persistence instruction that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub alert: Alert,
    pub trigger: Trigger,
    /// Write `delta.current` as the new snapshot before dispatching
    pub persist: bool,
}

/// Decide whether `delta` warrants an alert.
///
/// Forced alerts describe `current` without highlighting additions and never
/// persist, so the next regular run still sees the real transition.
pub fn decide(
    delta: &AvailabilityDelta,
    force: bool,
    template: &AlertTemplate,
) -> Option<NotificationAction> {
    if force {
        return Some(NotificationAction {
            alert: build_alert(template, &delta.current, &[]),
            trigger: Trigger::Forced,
            persist: false,
        });
    }

    if !delta.changed {
        return None;
    }

    Some(NotificationAction {
        alert: build_alert(template, &delta.current, &delta.added),
        trigger: Trigger::Changed {
            added: delta.added.len(),
            removed: delta.removed.len(),
        },
        persist: true,
    })
}

/// Render alert content for the available set.
pub fn build_alert(
    template: &AlertTemplate,
    available: &[SkuRecord],
    newly_available: &[SkuRecord],
) -> Alert {
    let network = available
        .first()
        .map(|sku| sku.network.as_str())
        .unwrap_or(template.default_network.as_str());

    let description = if available.is_empty() {
        format!("All {network} configurations are currently out of stock.")
    } else if newly_available.is_empty() {
        bullet_list("**📦 Available SKUs:**", available)
    } else {
        bullet_list("**🎉 Newly Available SKUs:**", newly_available)
    };

    Alert {
        mention: format!(
            "@here **{} {} availability changed!**",
            template.product_name, network
        ),
        title: format!("{} – {}", template.product_name, network),
        url: template.product_url.clone(),
        description,
        color: if available.is_empty() {
            COLOR_SOLD_OUT
        } else {
            COLOR_AVAILABLE
        },
        footer: format!("Total available: {} SKU(s)", available.len()),
    }
}

fn bullet_list(heading: &str, skus: &[SkuRecord]) -> String {
    let mut out = format!("{heading}\n");
    for sku in skus {
        out.push_str(&format!(
            "\n• **{}** - {} / {} - {}",
            sku.processor, sku.ram, sku.storage, sku.price
        ));
    }
    out
}
