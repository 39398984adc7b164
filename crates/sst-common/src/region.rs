//! Region configuration: domain, output names, map and report settings.
//!
//! The default region (Nicaragua) ships as an embedded YAML document. Any
//! other region file with the same layout can be loaded with
//! [`RegionConfig::from_file`].

use crate::{AtlasError, AtlasResult, BoundingBox, FeatureTables};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Embedded default region definition.
const NICARAGUA_YAML: &str = include_str!("../config/nicaragua.yaml");

/// Top-level region configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Region name shown in titles and file names
    pub name: String,

    /// Mapped domain `[west, east, south, north]`
    pub bbox: BoundingBox,

    /// Samples per axis of the lon/lat mesh
    #[serde(default = "default_resolution")]
    pub resolution: usize,

    #[serde(default)]
    pub outputs: OutputSettings,

    #[serde(default)]
    pub map: MapSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub features: FeatureTables,
}

/// Output file names. Unset names are derived from the region name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub image: Option<String>,
    pub pdf: Option<String>,
}

/// Figure and styling parameters for the rendered map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Figure width in inches
    pub width_in: f64,
    /// Figure height in inches
    pub height_in: f64,
    /// Raster resolution in dots per inch
    pub dpi: u32,
    /// Lower end of the color range (°C)
    pub vmin: f64,
    /// Upper end of the color range (°C)
    pub vmax: f64,
    /// Suffix appended to the region name in the map title
    pub title_label: String,
    pub colorbar_label: String,
    pub scale_bar: ScaleBarSettings,
    /// TrueType font for labels; system fonts are searched when unset
    pub font_path: Option<PathBuf>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            width_in: 14.0,
            height_in: 10.0,
            dpi: 600,
            vmin: 26.0,
            vmax: 30.0,
            title_label: "Atlas ".to_string(),
            colorbar_label: "Temperatura superficial (°C)".to_string(),
            scale_bar: ScaleBarSettings::default(),
            font_path: None,
        }
    }
}

/// Fixed-length reference bar drawn near the lower-left corner.
///
/// The length is a fixed number of degrees of longitude with a fixed label;
/// it is not derived from the projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleBarSettings {
    /// Offset from the west/south bounds in degrees
    pub offset_deg: f64,
    /// Bar length in degrees of longitude
    pub length_deg: f64,
    pub label: String,
}

impl Default for ScaleBarSettings {
    fn default() -> Self {
        Self {
            offset_deg: 0.25,
            length_deg: 0.5,
            label: "50 km".to_string(),
        }
    }
}

/// Text content of the PDF report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Event label appended to the report title
    pub event: String,
    pub author: String,
    /// Data source disclaimer
    pub source: String,
    /// Narrative paragraph; `{region}` is replaced with the region name
    pub narrative: String,
    pub credits: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            event: "Taller intermedio OCEAN HACK WEEK- 2025".to_string(),
            author: String::new(),
            source: "Datos sintéticos para demostración (Atlas)".to_string(),
            narrative: "El siguiente mapa muestra la distribución espacial simulada de la \
                        Temperatura Superficial del Mar (SST) en la región de {region}, \
                        incluyendo principales ríos, lagos y ciudades relevantes."
                .to_string(),
            credits: "Generado con Rust (tiny-skia, rusttype, flate2).".to_string(),
        }
    }
}

fn default_resolution() -> usize {
    600
}

impl RegionConfig {
    /// The built-in Nicaragua region.
    pub fn nicaragua() -> AtlasResult<Self> {
        Self::from_yaml_str(NICARAGUA_YAML)
    }

    /// Parse and validate a region from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> AtlasResult<Self> {
        let config: RegionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a region from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AtlasResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AtlasError::ConfigParse(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// File name of the rendered map image.
    pub fn image_file_name(&self) -> String {
        self.outputs
            .image
            .clone()
            .unwrap_or_else(|| format!("SST_{}_ATLAS_RIOS_COMPLETOS.png", self.name))
    }

    /// File name of the PDF report.
    pub fn pdf_file_name(&self) -> String {
        self.outputs
            .pdf
            .clone()
            .unwrap_or_else(|| format!("INFORME_SST_{}.pdf", self.name))
    }

    /// Map title, e.g. "Temperatura Superficial - Nicaragua (Atlas )".
    pub fn map_title(&self) -> String {
        format!(
            "Temperatura Superficial - {} ({})",
            self.name, self.map.title_label
        )
    }

    /// Narrative paragraph with the region name filled in.
    pub fn narrative(&self) -> String {
        self.report.narrative.replace("{region}", &self.name)
    }

    /// Check every value the pipeline relies on.
    pub fn validate(&self) -> AtlasResult<()> {
        if self.name.trim().is_empty() {
            return Err(AtlasError::invalid_config("name", "must not be empty"));
        }
        if !self.bbox.is_valid() {
            return Err(AtlasError::invalid_config(
                "bbox",
                format!("expected west < east and south < north, got {}", self.bbox),
            ));
        }
        if self.resolution < 2 {
            return Err(AtlasError::invalid_config(
                "resolution",
                format!("need at least 2 samples per axis, got {}", self.resolution),
            ));
        }
        if self.map.dpi == 0 {
            return Err(AtlasError::invalid_config("map.dpi", "must be positive"));
        }
        if !(self.map.width_in > 0.0 && self.map.height_in > 0.0) {
            return Err(AtlasError::invalid_config(
                "map.width_in/height_in",
                "figure size must be positive",
            ));
        }
        if !(self.map.vmin < self.map.vmax) {
            return Err(AtlasError::invalid_config(
                "map.vmin/vmax",
                format!("{} is not below {}", self.map.vmin, self.map.vmax),
            ));
        }

        for lake in &self.features.lakes {
            if !(lake.lon_min < lake.lon_max && lake.lat_min < lake.lat_max) {
                return Err(AtlasError::invalid_config(
                    format!("features.lakes.{}", lake.name),
                    "bounds must satisfy min < max",
                ));
            }
        }
        for river in &self.features.rivers {
            if river.path.len() < 2 {
                return Err(AtlasError::invalid_config(
                    format!("features.rivers.{}", river.name),
                    "a river needs at least two vertices",
                ));
            }
        }

        Ok(())
    }
}
