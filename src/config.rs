use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::assembler::MergePolicy;
use crate::fetchers::DEFAULT_USER_AGENT;

/// Scraper settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScraperConfig {
    /// Recipe index page; detail links are resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Pause before each page fetch, in seconds (0 disables it)
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
    /// Request timeout in seconds. Unset leaves the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// How keyword-pass lines are merged with structural lines
    #[serde(default)]
    pub merge_policy: MergePolicy,
    /// Fallback pattern for recipe links when the index has no table
    #[serde(default = "default_listing_link_pattern")]
    pub listing_link_pattern: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            delay_secs: default_delay_secs(),
            timeout_secs: None,
            merge_policy: MergePolicy::default(),
            listing_link_pattern: default_listing_link_pattern(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://codh.rois.ac.jp/edo-cooking/tamago-hyakuchin/recipe/".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_delay_secs() -> f64 {
    1.0
}

fn default_listing_link_pattern() -> String {
    r"\d{3}\.html\.ja".to_string()
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with EDO_SCRAPER__ prefix
    /// 2. scraper.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: EDO_SCRAPER__DELAY_SECS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// The politeness delay. Negative or non-finite values count as zero.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from file and environment variables
///
/// See [`ScraperConfig::load`] for the source priority.
pub fn load_config() -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("scraper").required(false))
        // Use double underscore for nested: EDO_SCRAPER__MERGE_POLICY
        .add_source(
            Environment::with_prefix("EDO_SCRAPER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
