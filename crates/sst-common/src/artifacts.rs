//! Files produced by the pipeline and handed between stages.

use std::path::PathBuf;

/// A map image written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMap {
    pub path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

/// Result of the render stage as seen by the report builder.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    Rendered(RenderedMap),
    /// No image; the reason is logged and the report shows a placeholder
    Unavailable(String),
}
