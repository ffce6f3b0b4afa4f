// src/pipeline/check.rs

//! One watch cycle: observe, compare, decide, persist, dispatch.

use crate::error::Result;
use crate::models::{Config, Delivery, Facet, Inventory, StockStatus, WatchConfig};
use crate::pipeline::{AlertTemplate, Trigger, calculate_diff, decide};
use crate::services::{FacetPage, Notifier, PageSource, RecordExtractor};
use crate::storage::SnapshotStore;

/// What a cycle ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Availability could not be determined; nothing was written or sent
    Unknown { reason: String },
    /// Available set matches the snapshot
    Unchanged { available: usize, persisted: bool },
    /// An alert was produced
    Notified {
        trigger: Trigger,
        available: usize,
        persisted: bool,
        delivery: Delivery,
    },
}

/// Runs watch cycles against injected collaborators.
pub struct Watcher {
    watch: WatchConfig,
    facets: Vec<Facet>,
    extractor: RecordExtractor,
    template: AlertTemplate,
    source: Box<dyn PageSource>,
    store: Box<dyn SnapshotStore>,
    notifier: Box<dyn Notifier>,
}

impl Watcher {
    pub fn new(
        config: &Config,
        source: Box<dyn PageSource>,
        store: Box<dyn SnapshotStore>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        Ok(Self {
            watch: config.watch.clone(),
            facets: config.facets.clone(),
            extractor: RecordExtractor::new(config.page.clone())?,
            template: AlertTemplate::from_config(config),
            source,
            store,
            notifier,
        })
    }

    /// Run a single cycle.
    ///
    /// The snapshot is written before the alert is dispatched, so a failed
    /// delivery neither repeats nor loses the transition on the next run.
    pub async fn run(&self) -> Result<CheckOutcome> {
        let previous = self.store.load().await;
        let had_snapshot = previous.is_some();
        let previous = previous.unwrap_or_default();

        let inventory = match self.observe().await {
            StockStatus::Known(inventory) => inventory,
            StockStatus::Unknown { reason } => {
                log::warn!("Could not determine current status ({reason}), no alert");
                return Ok(CheckOutcome::Unknown { reason });
            }
        };
        log_inventory(&inventory);

        let delta = calculate_diff(&previous, &inventory.available);
        let available = delta.current.len();

        let Some(action) = decide(&delta, self.watch.force_notify, &self.template) else {
            let persisted = !had_snapshot;
            if persisted {
                self.store.save(&delta.current).await?;
            }
            log::info!("No change in availability, no alert");
            return Ok(CheckOutcome::Unchanged {
                available,
                persisted,
            });
        };

        match action.trigger {
            Trigger::Forced => log::info!("Force notify enabled, sending test alert"),
            Trigger::Changed { added, removed } => log::info!(
                "Availability changed ({} keys: {} added, {} removed), sending alert",
                delta.change_count(),
                added,
                removed
            ),
        }

        if action.persist {
            self.store.save(&delta.current).await?;
        }

        let delivery = match self.notifier.send(&action.alert).await {
            Ok(delivery) => delivery,
            Err(e) => {
                log::error!("Error sending alert: {}", e);
                Delivery::Failed
            }
        };

        Ok(CheckOutcome::Notified {
            trigger: action.trigger,
            available,
            persisted: action.persist,
            delivery,
        })
    }

    /// Render every facet and extract SKUs from whatever rendered.
    async fn observe(&self) -> StockStatus {
        let mut pages = Vec::with_capacity(self.facets.len());
        for facet in &self.facets {
            log::info!("Checking {}...", facet.label);
            match self.source.render(facet).await {
                Ok(markup) => pages.push(FacetPage::new(facet.clone(), markup)),
                Err(e) => log::warn!("Could not render {}: {}", facet.label, e),
            }
        }
        self.extractor.extract(&pages)
    }
}

fn log_inventory(inventory: &Inventory) {
    if inventory.is_empty() {
        log::info!("No SKU tiles matched any facet");
        return;
    }
    log::info!("Current available SKUs: {}", inventory.available.len());
    for sku in &inventory.available {
        log::info!("  • {}", sku.summary());
    }
    log::info!("Out of stock SKUs: {}", inventory.out_of_stock.len());
    for sku in &inventory.out_of_stock {
        log::info!("  • {}", sku.summary());
    }
}
