//! Service layer for the watcher.
//!
//! - Markup querying (`Page`, `Node`)
//! - SKU extraction (`RecordExtractor`)
//! - Page sources (`PageSource`)
//! - Alert delivery (`Notifier`)

pub mod document;
mod extractor;
mod notifier;
mod source;

pub use extractor::{FacetPage, RecordExtractor, TileSelectors, UNKNOWN_PRICE};
pub use notifier::{
    DisabledNotifier, Embed, EmbedFooter, Notifier, WebhookMessage, WebhookNotifier,
    build_notifier,
};
pub use source::{FilePageSource, HttpPageSource, PageSource, StaticPageSource};
