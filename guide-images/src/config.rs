//! Configuration for image discovery
//!
//! Loaded from `guide-images.toml` (see [`guide_common::config`]) with the
//! Unsplash access key resolved from ENV → TOML.
//!
//! The stop-early thresholds and the brand rule table are plain data here so
//! they can be tuned without touching the pipeline.

use crate::text::normalize;
use crate::types::PlaceForSearch;
use guide_common::config::{is_valid_key, load_toml_config, resolve_config_path, LoggingConfig};
use guide_common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the Unsplash access key
pub const UNSPLASH_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "GUIDE_CONFIG";

/// Default config file name under the platform config dir
pub const CONFIG_FILE_NAME: &str = "guide-images.toml";

/// Image discovery settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub logging: LoggingConfig,
    /// Verbose per-query logging for the discovery pipeline
    pub debug_search: bool,
    pub unsplash_access_key: Option<String>,
    /// Results returned when the caller gives no limit
    pub default_limit: usize,
    /// Per-source, per-query timeout
    pub timeout_ms: u64,
    /// Score above which a strategy result counts as high quality
    pub high_quality_threshold: f64,
    /// Stop trying strategies once results reach `limit * multiplier`
    pub strategy_stop_multiplier: usize,
    /// Scores closer than this are ranked by image width instead
    pub tie_break_window: f64,
    pub location: LocationContext,
    pub unsplash: UnsplashSettings,
    pub brand_rules: Vec<BrandRule>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            debug_search: false,
            unsplash_access_key: None,
            default_limit: 5,
            timeout_ms: 5000,
            high_quality_threshold: 0.7,
            strategy_stop_multiplier: 2,
            tie_break_window: 0.1,
            location: LocationContext::default(),
            unsplash: UnsplashSettings::default(),
            brand_rules: default_brand_rules(),
        }
    }
}

impl DiscoveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Replace the file's access key with the ENV → TOML resolution
    pub fn resolve_credentials(&mut self) {
        self.unsplash_access_key = resolve_unsplash_access_key(self.unsplash_access_key.as_deref());
    }

    /// Filter directives for the tracing subscriber
    pub fn log_directives(&self) -> String {
        if self.debug_search {
            format!("{},guide_images=debug", self.logging.level)
        } else {
            self.logging.level.clone()
        }
    }
}

/// Where the guide lives; used to qualify queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationContext {
    pub city: String,
    pub neighborhood: String,
    /// Local metro system name, added to metro-station queries
    pub transit_system: String,
}

impl Default for LocationContext {
    fn default() -> Self {
        Self {
            city: "Bangalore".to_string(),
            neighborhood: "Indiranagar".to_string(),
            transit_system: "Namma Metro".to_string(),
        }
    }
}

/// Unsplash adapter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsplashSettings {
    pub base_url: String,
    /// Appended to every query sent to Unsplash
    pub geography_terms: Vec<String>,
}

impl Default for UnsplashSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.unsplash.com".to_string(),
            geography_terms: vec!["Bangalore".to_string(), "India".to_string()],
        }
    }
}

/// Per-brand query augmentation and competitor list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRule {
    pub brand: String,
    /// Appended to the brand name to form extra queries
    #[serde(default)]
    pub query_suffixes: Vec<String>,
    /// Brands whose photos must not be used for this one
    #[serde(default)]
    pub competitors: Vec<String>,
}

impl BrandRule {
    fn new(brand: &str, query_suffixes: &[&str], competitors: &[&str]) -> Self {
        Self {
            brand: brand.to_string(),
            query_suffixes: query_suffixes.iter().map(|s| s.to_string()).collect(),
            competitors: competitors.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Seed brand rules
pub fn default_brand_rules() -> Vec<BrandRule> {
    vec![
        BrandRule::new(
            "Corner House",
            &["death by chocolate", "sundae"],
            &["Baskin Robbins", "Naturals", "Amul", "Cream Stone", "Polar Bear"],
        ),
        BrandRule::new(
            "Social",
            &["cafe bar", "Indiranagar"],
            &["Toit", "Hard Rock Cafe", "The Humming Tree"],
        ),
    ]
}

/// Rule for the place's brand, falling back to its parent brand
pub fn brand_rule_for<'a>(rules: &'a [BrandRule], place: &PlaceForSearch) -> Option<&'a BrandRule> {
    let mut candidates = place.brand().into_iter().chain(place.parent_brand());
    candidates.find_map(|brand| {
        let brand = normalize(brand);
        rules.iter().find(|rule| normalize(&rule.brand) == brand)
    })
}

/// Resolve the Unsplash access key
///
/// **Priority:** ENV → TOML
pub fn resolve_unsplash_access_key(toml_key: Option<&str>) -> Option<String> {
    let env_key = std::env::var(UNSPLASH_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_key.filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Unsplash access key found in environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Unsplash access key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("Unsplash access key loaded from TOML config");
        return Some(key.to_string());
    }

    warn!(
        "Unsplash access key not configured (set {} or unsplash_access_key in {})",
        UNSPLASH_KEY_ENV, CONFIG_FILE_NAME
    );
    None
}

/// Config file location: CLI path → GUIDE_CONFIG → platform default
pub fn discovery_config_path(cli_path: Option<&Path>) -> Result<PathBuf> {
    resolve_config_path(cli_path, CONFIG_PATH_ENV, CONFIG_FILE_NAME)
}

/// Read the config file as written, without resolving credentials
///
/// The logging section is needed before the subscriber exists, so this step
/// must not depend on log output being visible.
pub fn read_discovery_config(path: &Path) -> Result<DiscoveryConfig> {
    load_toml_config(path)
}

/// Load the config and resolve the access key in one step
pub fn load_discovery_config(cli_path: Option<&Path>) -> Result<DiscoveryConfig> {
    let mut config = read_discovery_config(&discovery_config_path(cli_path)?)?;
    config.resolve_credentials();
    Ok(config)
}
