//! Run options and region loading.

use std::path::PathBuf;

use anyhow::{Context, Result};
use sst_common::RegionConfig;
use tracing::debug;

/// Settings that come from the command line or environment rather than
/// the region file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Region YAML; the embedded Nicaragua region when absent
    pub config_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub dpi: Option<u32>,
    pub font_path: Option<PathBuf>,
}

impl RunOptions {
    /// Load the region and apply command line overrides.
    pub fn load_region(&self) -> Result<RegionConfig> {
        let mut config = match &self.config_path {
            Some(path) => RegionConfig::from_file(path)
                .with_context(|| format!("failed to load region config {}", path.display()))?,
            None => RegionConfig::nicaragua().context("embedded region config is invalid")?,
        };

        if let Some(dpi) = self.dpi {
            debug!(dpi, "Overriding map dpi");
            config.map.dpi = dpi;
        }
        if let Some(font) = &self.font_path {
            debug!(font = %font.display(), "Using label font");
            config.map.font_path = Some(font.clone());
        }

        config.validate().context("invalid region config after overrides")?;
        Ok(config)
    }

    pub fn image_path(&self, config: &RegionConfig) -> PathBuf {
        self.output_dir.join(config.image_file_name())
    }

    pub fn pdf_path(&self, config: &RegionConfig) -> PathBuf {
        self.output_dir.join(config.pdf_file_name())
    }
}
