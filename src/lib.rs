//! Filter-and-aggregate pipeline for fast-food restaurant location data.
//!
//! [`session::Session::initialize`] loads the dataset once; the functions in
//! [`analysis`] derive rankings, summaries and comparisons from it, and
//! [`report`] renders the resulting dashboard.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod session;
pub mod source;

pub use error::PipelineError;
pub use models::{Dataset, FilterSelection, Record};
pub use session::Session;
