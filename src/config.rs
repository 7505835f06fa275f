//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.fastfood-atlas.toml` files.

use crate::source::UnavailablePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".fastfood-atlas.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "fastfood_report.md".to_string()
}

/// Where the data comes from and what happens when it can't be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Local CSV path or http(s) URL.
    #[serde(default = "default_location")]
    pub location: String,

    /// Policy applied when the source cannot be loaded.
    #[serde(default)]
    pub on_unavailable: UnavailablePolicy,

    /// Remote fetch timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Rows generated by the fallback policy.
    #[serde(default = "default_synthetic_rows")]
    pub synthetic_rows: usize,

    /// Seed for the fallback coordinates.
    #[serde(default = "default_synthetic_seed")]
    pub synthetic_seed: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            on_unavailable: UnavailablePolicy::default(),
            timeout_seconds: default_timeout(),
            synthetic_rows: default_synthetic_rows(),
            synthetic_seed: default_synthetic_seed(),
        }
    }
}

fn default_location() -> String {
    "FastFoodRestaurants.csv".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_synthetic_rows() -> usize {
    500
}

fn default_synthetic_seed() -> u64 {
    42
}

/// Sizes and limits of the dashboard sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Brands shown in the brand ranking.
    #[serde(default = "default_top_brands")]
    pub top_brands: usize,

    /// States shown in the state ranking.
    #[serde(default = "default_top_states")]
    pub top_states: usize,

    /// States to compare. Empty means CA, TX, FL, NY (or the first four available).
    #[serde(default)]
    pub compare_states: Vec<String>,

    /// Brands listed per compared state.
    #[serde(default = "default_brands_per_state")]
    pub brands_per_state: usize,

    /// Maximum filtered rows for which the location scatter is produced.
    #[serde(default = "default_scatter_limit")]
    pub scatter_limit: usize,

    /// Brands plotted in the location scatter.
    #[serde(default = "default_scatter_brands")]
    pub scatter_brands: usize,

    /// Bins of the latitude and longitude histograms.
    #[serde(default = "default_coordinate_bins")]
    pub coordinate_bins: usize,

    /// Bins of the brand frequency histogram.
    #[serde(default = "default_frequency_bins")]
    pub frequency_bins: usize,

    /// Rows shown in the data explorer sample.
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_brands: default_top_brands(),
            top_states: default_top_states(),
            compare_states: Vec::new(),
            brands_per_state: default_brands_per_state(),
            scatter_limit: default_scatter_limit(),
            scatter_brands: default_scatter_brands(),
            coordinate_bins: default_coordinate_bins(),
            frequency_bins: default_frequency_bins(),
            sample_rows: default_sample_rows(),
        }
    }
}

fn default_top_brands() -> usize {
    10
}

fn default_top_states() -> usize {
    15
}

fn default_brands_per_state() -> usize {
    8
}

fn default_scatter_limit() -> usize {
    1000
}

fn default_scatter_brands() -> usize {
    5
}

fn default_coordinate_bins() -> usize {
    30
}

fn default_frequency_bins() -> usize {
    20
}

fn default_sample_rows() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref source) = args.source {
            self.source.location = source.clone();
        }
        if let Some(policy) = args.on_unavailable {
            self.source.on_unavailable = policy.into();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(top_brands) = args.top_brands {
            self.dashboard.top_brands = top_brands;
        }
        if let Some(top_states) = args.top_states {
            self.dashboard.top_states = top_states;
        }
        if let Some(ref compare) = args.compare {
            self.dashboard.compare_states = compare.iter().map(|c| c.trim().to_string()).collect();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
