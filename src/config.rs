//! Harvest settings.
//!
//! Defaults reproduce the original Ivory Coast snapshot. An optional YAML file
//! can override any of them, and command-line flags override the file.
//!
//! ```yaml
//! origin: https://www.mathraining.be
//! country_id: 48
//! pages: 3
//! dataset_name: ivory_coast_mathtraining
//! ```

use crate::error::ScrapeError;
use crate::net::DEFAULT_USER_AGENT;
use serde::Deserialize;
use std::fs;
use tracing::{info, instrument};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scheme and host that relative profile links are resolved against.
    pub origin: String,
    pub user_agent: String,
    /// Country filter of the listing pages.
    pub country_id: u32,
    /// Number of listing pages to crawl.
    pub pages: u32,
    /// Prefix of the CSV snapshot file name.
    pub dataset_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: "https://www.mathraining.be".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            country_id: 48,
            pages: 3,
            dataset_name: "ivory_coast_mathtraining".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from YAML; missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ScrapeError> {
        let settings: Settings = serde_yaml::from_str(text)?;
        settings.origin_url()?;
        Ok(settings)
    }

    /// Load settings from `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ScrapeError> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };
        let settings = Settings::from_yaml(&fs::read_to_string(path)?)?;
        info!(path, origin = %settings.origin, "Loaded settings file");
        Ok(settings)
    }

    pub fn origin_url(&self) -> Result<Url, ScrapeError> {
        Ok(Url::parse(&self.origin)?)
    }
}
