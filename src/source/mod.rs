//! Restaurant data sources.
//!
//! Loading the table from a local file or URL, and the placeholder data
//! used when a load fails under the fallback policy.

pub mod loader;
pub mod synthetic;

pub use loader::{load_dataset, parse_csv, DataSource, FetchOptions};
pub use synthetic::synthetic_dataset;

use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do when the source cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnavailablePolicy {
    /// Continue with synthetic placeholder data.
    #[default]
    Fallback,
    /// Abort the run with an error.
    FailFast,
    /// Skip all computation and report only the failure notice.
    Skip,
}

impl fmt::Display for UnavailablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailablePolicy::Fallback => write!(f, "fallback"),
            UnavailablePolicy::FailFast => write!(f, "fail-fast"),
            UnavailablePolicy::Skip => write!(f, "skip"),
        }
    }
}
