//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::PageSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// What to watch and where to keep state
    #[serde(default)]
    pub watch: WatchConfig,

    /// HTTP fetch behavior
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Markup vocabulary of the configurator page
    #[serde(default)]
    pub page: PageSelectors,

    /// Facets to visit, one extraction pass each
    #[serde(default = "defaults::facets")]
    pub facets: Vec<Facet>,

    /// Alert delivery settings
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {e}", path.display())))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or defaults when the file does not exist.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_if_present(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides.
    ///
    /// `lookup` is usually `std::env::var(..).ok()`; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FORCE_NOTIFY") {
            self.watch.force_notify = value.trim() == "true";
        }
        if let Some(value) = lookup("DISCORD_WEBHOOK_URL") {
            let value = value.trim();
            self.notify.webhook_url = (!value.is_empty()).then(|| value.to_string());
        }
        if let Some(value) = lookup("PRODUCT_URL") {
            self.watch.product_url = value.trim().to_string();
        }
        if let Some(value) = lookup("STATUS_FILE") {
            self.watch.status_file = PathBuf::from(value.trim());
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.watch.product_url).map_err(|e| {
            AppError::validation(format!(
                "watch.product_url '{}' is not a valid URL: {e}",
                self.watch.product_url
            ))
        })?;
        if self.watch.status_file.as_os_str().is_empty() {
            return Err(AppError::validation("watch.status_file is empty"));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.notify.timeout_secs == 0 {
            return Err(AppError::validation("notify.timeout_secs must be > 0"));
        }
        if let Some(webhook) = &self.notify.webhook_url {
            Url::parse(webhook).map_err(|e| {
                AppError::validation(format!("notify.webhook_url is not a valid URL: {e}"))
            })?;
        }
        if self.facets.is_empty() {
            return Err(AppError::validation("No facets defined"));
        }
        for facet in &self.facets {
            if facet.label.trim().is_empty() {
                return Err(AppError::validation("facet label is empty"));
            }
            if facet.match_token.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "facet '{}' has an empty match_token",
                    facet.label
                )));
            }
            if let Some(url) = &facet.url {
                Url::parse(url).map_err(|e| {
                    AppError::validation(format!("facet '{}' url is invalid: {e}", facet.label))
                })?;
            }
        }
        self.page.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch: WatchConfig::default(),
            fetch: FetchConfig::default(),
            page: PageSelectors::default(),
            facets: defaults::facets(),
            notify: NotifyConfig::default(),
        }
    }
}

/// The three settings that define one watch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Configurator page to inspect
    #[serde(default = "defaults::product_url")]
    pub product_url: String,

    /// JSON file holding the last reported snapshot
    #[serde(default = "defaults::status_file")]
    pub status_file: PathBuf,

    /// Alert unconditionally and leave the snapshot untouched
    #[serde(default)]
    pub force_notify: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            product_url: defaults::product_url(),
            status_file: defaults::status_file(),
            force_notify: false,
        }
    }
}

/// HTTP client settings for page fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// A mutually exclusive configurator option that gates visible tiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facet {
    /// Display label stamped on extracted records
    pub label: String,

    /// Substring expected in a tile's metadata attribute
    pub match_token: String,

    /// Page URL with this facet preselected, if it differs from the product URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Facet {
    pub fn new(label: impl Into<String>, match_token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            match_token: match_token.into(),
            url: None,
        }
    }
}

/// Alert delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook endpoint; alerts are skipped when unset
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Product name used in alert titles
    #[serde(default = "defaults::product_name")]
    pub product_name: String,

    /// Webhook request timeout in seconds
    #[serde(default = "defaults::notify_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            product_name: defaults::product_name(),
            timeout_secs: defaults::notify_timeout(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::Facet;

    pub fn product_url() -> String {
        "https://www.microsoft.com/en-us/store/configure/surface-pro-10-for-business/8p7h1dg85brj"
            .into()
    }
    pub fn status_file() -> PathBuf {
        PathBuf::from("status.json")
    }

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        15
    }

    // Notify defaults
    pub fn product_name() -> String {
        "Surface Pro 10 for Business (Certified Refurbished)".into()
    }
    pub fn notify_timeout() -> u64 {
        10
    }

    pub fn facets() -> Vec<Facet> {
        vec![
            Facet::new("Intel Core Ultra 5 (135U)", "Ultra 5"),
            Facet::new("Intel Core Ultra 7 (165U)", "Ultra 7"),
        ]
    }
}
