// src/models/selectors.rs

//! Markup vocabulary of the configurator page.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::TileSelectors;

/// Class names, attributes and marker tokens used to read SKU tiles.
///
/// The retailer changes this markup without notice, so every piece is
/// configurable rather than baked into the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSelectors {
    /// Attribute identifying the specifications container
    pub container_attr: String,

    /// Value of `container_attr` on the specifications `ul`
    pub container_marker: String,

    /// Class on each SKU `li`
    pub tile_class: String,

    /// Class marking a tile as structurally hidden
    pub hidden_class: String,

    /// Class on the tile's action `button`
    pub button_class: String,

    /// Button attribute holding the free-text facet metadata
    pub metadata_attr: String,

    /// Class on the `div` holding the RAM/storage paragraphs
    pub body_class: String,

    /// Class on the `div` holding the price `span`
    pub footer_class: String,

    /// Class on badge `span`s
    pub badge_class: String,

    /// Lowercase text that marks a badge as out of stock
    pub out_of_stock_text: String,

    /// Token every RAM fragment must contain
    pub ram_marker: String,

    /// Token every storage fragment must contain
    pub storage_marker: String,

    /// Network label stamped on extracted records
    pub network: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            container_attr: "data-automation-test-id".to_string(),
            container_marker: "configuratorV3-step-index-0-3".to_string(),
            tile_class: "tile".to_string(),
            hidden_class: "d-none".to_string(),
            button_class: "tile__button".to_string(),
            metadata_attr: "data-m".to_string(),
            body_class: "v3tile__tilebody".to_string(),
            footer_class: "v3tile__tilefooter".to_string(),
            badge_class: "badge".to_string(),
            out_of_stock_text: "out of stock".to_string(),
            ram_marker: "RAM".to_string(),
            storage_marker: "SSD".to_string(),
            network: "5G".to_string(),
        }
    }
}

impl PageSelectors {
    /// Check that every entry is present and that the derived CSS selectors compile.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("page.container_attr", &self.container_attr),
            ("page.container_marker", &self.container_marker),
            ("page.tile_class", &self.tile_class),
            ("page.hidden_class", &self.hidden_class),
            ("page.button_class", &self.button_class),
            ("page.metadata_attr", &self.metadata_attr),
            ("page.body_class", &self.body_class),
            ("page.footer_class", &self.footer_class),
            ("page.badge_class", &self.badge_class),
            ("page.out_of_stock_text", &self.out_of_stock_text),
            ("page.ram_marker", &self.ram_marker),
            ("page.storage_marker", &self.storage_marker),
            ("page.network", &self.network),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{name} is empty")));
            }
        }
        TileSelectors::compile(self).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_validate() {
        assert!(PageSelectors::default().validate().is_ok());
    }

    #[test]
    fn test_empty_marker_rejected() {
        let selectors = PageSelectors {
            ram_marker: " ".to_string(),
            ..PageSelectors::default()
        };
        assert!(selectors.validate().is_err());
    }

    #[test]
    fn test_uncompilable_class_rejected() {
        let selectors = PageSelectors {
            tile_class: "[[broken".to_string(),
            ..PageSelectors::default()
        };
        assert!(matches!(
            selectors.validate(),
            Err(AppError::Selector { .. })
        ));
    }
}
