//! Pipeline error taxonomy.
//!
//! Only two conditions are errors: a dataset that cannot be loaded and a
//! market-share calculation with a zero denominator. A filter that matches
//! nothing is not an error; it yields an empty dataset.

use thiserror::Error;

/// Errors raised by the aggregation pipeline and its data source.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source is missing, unreadable, or not a valid restaurant table.
    #[error("data unavailable from {location}: {reason}")]
    DataUnavailable { location: String, reason: String },

    /// Market share was requested against a total of zero.
    #[error("market share is undefined when the total count is zero")]
    DivisionUndefined,
}

impl PipelineError {
    /// Human-readable notice shown in place of the dashboard.
    pub fn notice(&self) -> String {
        match self {
            PipelineError::DataUnavailable { location, reason } => format!(
                "Error loading data from {}: {}. Make sure the CSV file is accessible and the path or URL is correct.",
                location, reason
            ),
            PipelineError::DivisionUndefined => self.to_string(),
        }
    }
}
