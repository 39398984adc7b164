//! Grid → fields → map → report.

use anyhow::{Context, Result};
use chrono::Local;
use grid_processor::{build_grid, compute_fields};
use renderer::{render_map, MapStyle};
use report::{build_report, ReportSummary};
use sst_common::{MapOutcome, RegionConfig};
use tracing::{debug, error, info};

use crate::config::RunOptions;

/// Artifacts of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub map: MapOutcome,
    pub report: ReportSummary,
}

/// Run every stage for one region.
///
/// A render failure still produces the report, with a placeholder in
/// place of the map, and is then returned as the run's error.
pub fn run(config: &RegionConfig, options: &RunOptions) -> Result<PipelineOutput> {
    info!(zone = %config.name, "Generating SST atlas");
    info!(domain = %config.bbox, resolution = config.resolution, "Domain");
    config.features.warn_outside(&config.bbox);

    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            options.output_dir.display()
        )
    })?;

    let grid = build_grid(&config.bbox, config.resolution).context("failed to build grid")?;
    let fields = compute_fields(&grid, &config.bbox);
    let field = fields
        .combined()
        .context("temperature and relief fields differ in shape")?;

    let stats = field.stats();
    info!(
        min = stats.min,
        max = stats.max,
        mean = stats.mean,
        "Computed synthetic field"
    );
    debug!(
        clipped = field.count_outside(config.map.vmin, config.map.vmax),
        vmin = config.map.vmin,
        vmax = config.map.vmax,
        "Cells outside the color range"
    );

    let style = MapStyle::from_settings(&config.map);
    let image_path = options.image_path(config);
    let (map, render_error) = match render_map(config, &grid, &field, &style, &image_path) {
        Ok(rendered) => (MapOutcome::Rendered(rendered), None),
        Err(e) => {
            error!(path = %image_path.display(), error = %e, "Map rendering failed");
            (MapOutcome::Unavailable(e.to_string()), Some(e))
        }
    };

    let pdf_path = options.pdf_path(config);
    let report = build_report(config, &map, &pdf_path, &Local::now())
        .with_context(|| format!("failed to write report {}", pdf_path.display()))?;

    if let Some(e) = render_error {
        return Err(e).with_context(|| format!("failed to render map {}", image_path.display()));
    }

    info!(
        image = %image_path.display(),
        report = %report.path.display(),
        pages = report.pages,
        "Atlas complete"
    );

    Ok(PipelineOutput { map, report })
}
