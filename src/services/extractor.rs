// src/services/extractor.rs

//! SKU record extraction from configurator markup.
//!
//! Each facet pass yields the tiles of one selected option. Tile-level
//! problems never abort the pass: a hidden, foreign or malformed tile is
//! dropped and its siblings are still read.

use scraper::Selector;

use crate::error::{AppError, Result};
use crate::models::{Facet, Inventory, PageSelectors, SkuRecord, StockStatus};
use crate::services::document::{Node, Page};

/// Price used when a tile has no readable footer.
pub const UNKNOWN_PRICE: &str = "Unknown Price";

/// Markup rendered with one facet selected.
#[derive(Debug, Clone)]
pub struct FacetPage {
    pub facet: Facet,
    pub markup: String,
}

impl FacetPage {
    pub fn new(facet: Facet, markup: impl Into<String>) -> Self {
        Self {
            facet,
            markup: markup.into(),
        }
    }
}

/// Compiled CSS selectors derived from [`PageSelectors`].
#[derive(Debug, Clone)]
pub struct TileSelectors {
    container: Selector,
    tile: Selector,
    button: Selector,
    body: Selector,
    fragment: Selector,
    footer: Selector,
    price: Selector,
    badge: Selector,
}

impl TileSelectors {
    /// Build every selector, failing on the first one that does not parse.
    pub fn compile(page: &PageSelectors) -> Result<Self> {
        Ok(Self {
            container: parse_selector(&format!(
                r#"ul[{}="{}"]"#,
                page.container_attr,
                escape_attr_value(&page.container_marker)
            ))?,
            tile: parse_selector(&format!("li.{}", page.tile_class))?,
            button: parse_selector(&format!("button.{}", page.button_class))?,
            body: parse_selector(&format!("div.{}", page.body_class))?,
            fragment: parse_selector("p")?,
            footer: parse_selector(&format!("div.{}", page.footer_class))?,
            price: parse_selector("span")?,
            badge: parse_selector(&format!("span.{}", page.badge_class))?,
        })
    }
}

/// Escape a value for a double-quoted CSS attribute selector.
fn escape_attr_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Classified tile.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Tile {
    Available(SkuRecord),
    OutOfStock(SkuRecord),
}

/// Why a tile was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileSkip {
    Hidden,
    NoMetadata,
    OtherFacet,
    Malformed(&'static str),
}

/// Result of reading one facet's page.
#[derive(Debug, Default)]
struct FacetScan {
    container_found: bool,
    inventory: Inventory,
}

/// Turns configurator markup into SKU records.
pub struct RecordExtractor {
    page: PageSelectors,
    selectors: TileSelectors,
}

impl RecordExtractor {
    /// Create an extractor for the given page vocabulary.
    pub fn new(page: PageSelectors) -> Result<Self> {
        let selectors = TileSelectors::compile(&page)?;
        Ok(Self { page, selectors })
    }

    /// Extract SKUs from every rendered facet page.
    ///
    /// Returns `Unknown` when no page was rendered at all or when none of
    /// them carried the specifications container, so a broken render is
    /// never mistaken for "everything out of stock".
    pub fn extract(&self, pages: &[FacetPage]) -> StockStatus {
        if pages.is_empty() {
            return StockStatus::unknown("no facet page could be rendered");
        }

        let mut any_container = false;
        let mut inventory = Inventory::default();

        for page in pages {
            let scan = self.scan_facet(page);
            any_container |= scan.container_found;
            inventory.available.extend(scan.inventory.available);
            inventory.out_of_stock.extend(scan.inventory.out_of_stock);
        }

        if !any_container {
            return StockStatus::unknown("specifications section missing on every facet page");
        }

        let inventory = inventory.deduplicated();
        log::info!(
            "Found {} available SKUs and {} out of stock SKUs",
            inventory.available.len(),
            inventory.out_of_stock.len()
        );
        StockStatus::Known(inventory)
    }

    fn scan_facet(&self, page: &FacetPage) -> FacetScan {
        let facet = &page.facet;
        let document = Page::parse(&page.markup);

        let Some(container) = document.find(&self.selectors.container) else {
            log::warn!("Specifications section not found for {}", facet.label);
            return FacetScan::default();
        };

        let tiles = container.find_all(&self.selectors.tile);
        let mut scan = FacetScan {
            container_found: true,
            ..FacetScan::default()
        };
        let (mut hidden, mut foreign, mut malformed) = (0usize, 0usize, 0usize);

        for tile in &tiles {
            match self.read_tile(tile, facet) {
                Ok(Tile::Available(record)) => scan.inventory.available.push(record),
                Ok(Tile::OutOfStock(record)) => scan.inventory.out_of_stock.push(record),
                Err(TileSkip::Hidden) => hidden += 1,
                Err(TileSkip::NoMetadata | TileSkip::OtherFacet) => foreign += 1,
                Err(TileSkip::Malformed(reason)) => {
                    malformed += 1;
                    log::debug!("Skipping malformed tile under {}: {}", facet.label, reason);
                }
            }
        }

        log::info!(
            "{}: {} tiles, {} hidden, {} for other facets, {} malformed, {} read",
            facet.label,
            tiles.len(),
            hidden,
            foreign,
            malformed,
            scan.inventory.len()
        );
        scan
    }

    fn read_tile(&self, tile: &Node<'_>, facet: &Facet) -> std::result::Result<Tile, TileSkip> {
        if tile.has_class(&self.page.hidden_class) {
            return Err(TileSkip::Hidden);
        }

        let button = tile.find(&self.selectors.button);
        let metadata = button
            .and_then(|b| b.attr(&self.page.metadata_attr))
            .ok_or(TileSkip::NoMetadata)?;
        if !metadata.contains(&facet.match_token) {
            return Err(TileSkip::OtherFacet);
        }

        let body = tile
            .find(&self.selectors.body)
            .ok_or(TileSkip::Malformed("missing tile body"))?;
        let fragments: Vec<String> = body
            .find_all(&self.selectors.fragment)
            .iter()
            .map(Node::text)
            .collect();

        let (ram, storage) = match fragments.as_slice() {
            [ram, storage] => (ram, storage),
            [_processor, ram, storage, ..] => (ram, storage),
            _ => return Err(TileSkip::Malformed("fewer than two text fragments")),
        };

        if !contains_marker(ram, &self.page.ram_marker) {
            return Err(TileSkip::Malformed("no RAM marker"));
        }
        if !contains_marker(storage, &self.page.storage_marker) {
            return Err(TileSkip::Malformed("no storage marker"));
        }

        let price = tile
            .find(&self.selectors.footer)
            .and_then(|footer| footer.find(&self.selectors.price))
            .map(|span| span.text())
            .unwrap_or_else(|| UNKNOWN_PRICE.to_string());

        let record = SkuRecord {
            ram: ram.clone(),
            storage: storage.clone(),
            price,
            processor: facet.label.clone(),
            network: self.page.network.clone(),
        };

        let sold_out_text = self.page.out_of_stock_text.to_lowercase();
        let sold_out_badge = tile
            .find_all(&self.selectors.badge)
            .iter()
            .any(|badge| badge.text().to_lowercase().contains(&sold_out_text));
        let disabled = button.is_some_and(|b| b.has_attr("disabled"));

        if sold_out_badge || disabled {
            Ok(Tile::OutOfStock(record))
        } else {
            Ok(Tile::Available(record))
        }
    }
}

fn contains_marker(text: &str, marker: &str) -> bool {
    text.to_uppercase().contains(&marker.to_uppercase())
}
