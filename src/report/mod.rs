//! Report generation.

pub mod generator;

pub use generator::{
    generate_json_report, generate_markdown_report, generate_unavailable_json,
    generate_unavailable_report,
};
