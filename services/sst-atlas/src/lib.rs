//! SST atlas generator.
//!
//! Renders a synthetic sea surface temperature map for a configured region
//! and wraps it in a PDF report.

pub mod config;
pub mod pipeline;

pub use config::RunOptions;
pub use pipeline::{run, PipelineOutput};
