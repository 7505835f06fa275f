//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::source::UnavailablePolicy;
use clap::Parser;
use std::path::PathBuf;

/// Fastfood Atlas - statistics for fast-food restaurant locations
///
/// Loads a CSV of restaurant locations and reports brand rankings, market
/// share, state distribution, regional comparisons and key insights as
/// Markdown or JSON.
///
/// Examples:
///   fastfood-atlas --source FastFoodRestaurants.csv
///   fastfood-atlas --source https://example.com/FastFoodRestaurants.csv --format json
///   fastfood-atlas --state CA --top-brands 15
///   fastfood-atlas --compare WA,OR,NV --on-unavailable fail-fast
///   fastfood-atlas --list-options
///   fastfood-atlas --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV file path or http(s) URL of the restaurant dataset
    ///
    /// Defaults to the configured location (FastFoodRestaurants.csv).
    #[arg(short, long, value_name = "PATH|URL", env = "FASTFOOD_ATLAS_SOURCE")]
    pub source: Option<String>,

    /// What to do when the dataset cannot be loaded
    ///
    /// fallback: continue with synthetic placeholder data.
    /// fail-fast: abort with an error.
    /// skip: write only the failure notice.
    #[arg(long, value_name = "POLICY")]
    pub on_unavailable: Option<OnUnavailable>,

    /// Remote fetch timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Only include restaurants in this state ("All" for no filter)
    #[arg(long, value_name = "CODE")]
    pub state: Option<String>,

    /// Only include restaurants of this brand ("All" for no filter)
    #[arg(long, value_name = "NAME")]
    pub brand: Option<String>,

    /// Number of top brands to display
    #[arg(long, value_name = "COUNT")]
    pub top_brands: Option<usize>,

    /// Number of top states to display
    #[arg(long, value_name = "COUNT")]
    pub top_states: Option<usize>,

    /// States to compare (comma-separated)
    ///
    /// Example: --compare CA,TX,FL,NY
    #[arg(long, value_name = "CODES", value_delimiter = ',')]
    pub compare: Option<Vec<String>>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .fastfood-atlas.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the available state and brand filter choices and exit
    #[arg(long)]
    pub list_options: bool,

    /// Generate a default .fastfood-atlas.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Policy choice for --on-unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OnUnavailable {
    Fallback,
    FailFast,
    Skip,
}

impl From<OnUnavailable> for UnavailablePolicy {
    fn from(choice: OnUnavailable) -> Self {
        match choice {
            OnUnavailable::Fallback => UnavailablePolicy::Fallback,
            OnUnavailable::FailFast => UnavailablePolicy::FailFast,
            OnUnavailable::Skip => UnavailablePolicy::Skip,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref source) = self.source {
            if source.trim().is_empty() {
                return Err("Source must not be empty".to_string());
            }
        }

        if self.top_brands == Some(0) {
            return Err("Top brands must be at least 1".to_string());
        }

        if self.top_states == Some(0) {
            return Err("Top states must be at least 1".to_string());
        }

        if let Some(ref compare) = self.compare {
            if compare.iter().any(|c| c.trim().is_empty()) {
                return Err("Compared states must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            source: Some("FastFoodRestaurants.csv".to_string()),
            on_unavailable: None,
            timeout: None,
            state: None,
            brand: None,
            top_brands: None,
            top_states: None,
            compare: None,
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            verbose: false,
            quiet: false,
            list_options: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from([
            "fastfood-atlas",
            "--source",
            "data.csv",
            "--on-unavailable",
            "fail-fast",
            "--state",
            "CA",
            "--compare",
            "CA,TX",
            "--format",
            "json",
        ]);
        assert_eq!(args.source.as_deref(), Some("data.csv"));
        assert_eq!(args.on_unavailable, Some(OnUnavailable::FailFast));
        assert_eq!(args.state.as_deref(), Some("CA"));
        assert_eq!(args.compare, Some(vec!["CA".to_string(), "TX".to_string()]));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_zero_top_n() {
        let mut args = make_args();
        args.top_brands = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.top_states = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_init_config_skips_checks() {
        let mut args = make_args();
        args.top_brands = Some(0);
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_policy_conversion() {
        assert_eq!(
            UnavailablePolicy::from(OnUnavailable::Skip),
            UnavailablePolicy::Skip
        );
        assert_eq!(
            UnavailablePolicy::from(OnUnavailable::Fallback),
            UnavailablePolicy::Fallback
        );
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
