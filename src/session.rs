//! A loaded dataset and the load outcome for one run.
//!
//! The session is created once by [`Session::initialize`]; every dashboard
//! is then derived from its immutable dataset.

use crate::analysis::build_dashboard;
use crate::config::{DashboardConfig, SourceConfig};
use crate::error::PipelineError;
use crate::models::{Dashboard, DashboardMetadata, DataOrigin, Dataset, FilterSelection};
use crate::source::{load_dataset, synthetic_dataset, DataSource, FetchOptions, UnavailablePolicy};
use chrono::Utc;
use tracing::{error, info, warn};

/// Notice shown when the skip policy leaves no data to work with.
pub const SKIPPED_NOTICE: &str = "Unable to load dataset. Please check the file path.";

pub struct Session {
    source: DataSource,
    dataset: Option<Dataset>,
    origin: DataOrigin,
    notice: Option<String>,
}

impl Session {
    /// Loads the configured source once and applies the unavailable policy.
    ///
    /// Only the fail-fast policy returns an error.
    pub async fn initialize(config: &SourceConfig, show_progress: bool) -> Result<Self, PipelineError> {
        let source = DataSource::parse(&config.location);
        let options = FetchOptions {
            timeout_seconds: config.timeout_seconds,
            show_progress,
        };

        let loaded = load_dataset(&source, &options).await;
        Self::from_load_result(source, loaded, config)
    }

    /// Builds a session from the result of a load attempt.
    pub fn from_load_result(
        source: DataSource,
        loaded: Result<Dataset, PipelineError>,
        config: &SourceConfig,
    ) -> Result<Self, PipelineError> {
        let err = match loaded {
            Ok(dataset) => {
                return Ok(Self {
                    source,
                    dataset: Some(dataset),
                    origin: DataOrigin::Loaded,
                    notice: None,
                })
            }
            Err(e) => e,
        };

        match config.on_unavailable {
            UnavailablePolicy::Fallback => {
                warn!("{}", err);
                info!(
                    "Using {} synthetic records (seed {})",
                    config.synthetic_rows, config.synthetic_seed
                );
                Ok(Self {
                    source,
                    dataset: Some(synthetic_dataset(config.synthetic_rows, config.synthetic_seed)),
                    origin: DataOrigin::Synthetic,
                    notice: Some(err.notice()),
                })
            }
            UnavailablePolicy::FailFast => {
                error!("{}", err);
                Err(err)
            }
            UnavailablePolicy::Skip => {
                warn!("{}; skipping all computation", err);
                Ok(Self {
                    source,
                    dataset: None,
                    origin: DataOrigin::Loaded,
                    notice: Some(format!("{} {}", SKIPPED_NOTICE, err.notice())),
                })
            }
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// The loaded dataset, or `None` when the load was skipped.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    /// Human-readable notice about a failed load.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Computes the dashboard for a selection, or `None` without data.
    pub fn dashboard(&self, selection: &FilterSelection, settings: &DashboardConfig) -> Option<Dashboard> {
        let dataset = self.dataset.as_ref()?;

        let metadata = DashboardMetadata {
            source: self.source.to_string(),
            origin: self.origin,
            generated_at: Utc::now(),
            selection: selection.clone(),
            notice: self.notice.clone(),
        };

        Some(build_dashboard(dataset, settings, metadata))
    }
}
