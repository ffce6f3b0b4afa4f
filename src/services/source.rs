// src/services/source.rs

//! Page sources: where rendered configurator markup comes from.
//!
//! Selecting a facet on the live configurator needs a browser, which stays
//! outside this crate. A source only promises markup for a facet; the HTTP
//! source fetches a (possibly facet-specific) URL, the file source replays a
//! saved page.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Facet, FetchConfig};
use crate::utils::http;

/// Produces rendered markup with a given facet selected.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn render(&self, facet: &Facet) -> Result<String>;
}

/// Fetches markup over HTTP.
pub struct HttpPageSource {
    client: reqwest::Client,
    product_url: String,
}

impl HttpPageSource {
    pub fn new(config: &FetchConfig, product_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http::create_client(config)?,
            product_url: product_url.into(),
        })
    }

    fn url_for<'a>(&'a self, facet: &'a Facet) -> &'a str {
        facet.url.as_deref().unwrap_or(&self.product_url)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn render(&self, facet: &Facet) -> Result<String> {
        let url = self.url_for(facet);
        log::info!("Loading page for {}: {}", facet.label, url);
        http::fetch_text(&self.client, url)
            .await
            .map_err(|e| AppError::render(&facet.label, e))
    }
}

/// Replays a saved HTML file for every facet.
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageSource for FilePageSource {
    async fn render(&self, facet: &Facet) -> Result<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::render(
                &facet.label,
                format!("cannot read {}: {e}", self.path.display()),
            )
        })
    }
}

/// Serves fixed markup per facet label. Facets without an entry fail to render.
#[derive(Debug, Clone, Default)]
pub struct StaticPageSource {
    pages: HashMap<String, String>,
}

impl StaticPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, facet_label: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(facet_label.into(), markup.into());
        self
    }
}

#[async_trait]
impl PageSource for StaticPageSource {
    async fn render(&self, facet: &Facet) -> Result<String> {
        self.pages
            .get(&facet.label)
            .cloned()
            .ok_or_else(|| AppError::render(&facet.label, "no page registered"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_reads_same_page_for_every_facet() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("page.html");
        std::fs::write(&path, "<html>saved</html>").unwrap();

        let source = FilePageSource::new(&path);
        let a = source.render(&Facet::new("A", "a")).await.unwrap();
        let b = source.render(&Facet::new("B", "b")).await.unwrap();
        assert_eq!(a, "<html>saved</html>");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_render_error() {
        let tmp = TempDir::new().unwrap();
        let source = FilePageSource::new(tmp.path().join("nope.html"));

        let err = source.render(&Facet::new("A", "a")).await.unwrap_err();
        assert!(matches!(err, AppError::Render { .. }));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticPageSource::new().with_page("A", "<p>a</p>");

        assert_eq!(source.render(&Facet::new("A", "a")).await.unwrap(), "<p>a</p>");
        assert!(source.render(&Facet::new("B", "b")).await.is_err());
    }

    #[test]
    fn test_http_source_prefers_facet_url() {
        let source = HttpPageSource::new(&FetchConfig::default(), "https://shop.example/p").unwrap();
        let mut facet = Facet::new("A", "a");
        assert_eq!(source.url_for(&facet), "https://shop.example/p");

        facet.url = Some("https://shop.example/p?cpu=a".to_string());
        assert_eq!(source.url_for(&facet), "https://shop.example/p?cpu=a");
    }
}
