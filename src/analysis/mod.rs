//! Analysis modules.
//!
//! The aggregation pipeline, descriptive statistics, and the dashboard
//! assembly that combines them.

pub mod aggregator;
pub mod dashboard;
pub mod stats;

pub use aggregator::*;
pub use dashboard::build_dashboard;
