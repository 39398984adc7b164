//! Static feature tables overlaid on the map.
//!
//! Tables keep their file order: annotations are drawn in that order, so a
//! later entry occludes an earlier one where they overlap.

use crate::BoundingBox;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A named point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

/// A named rectangular feature given by its lon/lat bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lake {
    pub name: String,
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl Lake {
    /// Closed outline through the four corners, starting and ending at
    /// (lon_min, lat_min).
    pub fn outline(&self) -> [(f64, f64); 5] {
        [
            (self.lon_min, self.lat_min),
            (self.lon_max, self.lat_min),
            (self.lon_max, self.lat_max),
            (self.lon_min, self.lat_max),
            (self.lon_min, self.lat_min),
        ]
    }

    /// Center of the rectangle, where the label goes.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lon_min + self.lon_max) / 2.0,
            (self.lat_min + self.lat_max) / 2.0,
        )
    }
}

/// A named path feature with ordered (lon, lat) vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct River {
    pub name: String,
    pub path: Vec<(f64, f64)>,
}

impl River {
    /// Mean of the vertices, used as the label anchor.
    pub fn label_anchor(&self) -> Option<(f64, f64)> {
        if self.path.is_empty() {
            return None;
        }
        let n = self.path.len() as f64;
        let (sum_lon, sum_lat) = self
            .path
            .iter()
            .fold((0.0, 0.0), |(a, b), (lon, lat)| (a + lon, b + lat));
        Some((sum_lon / n, sum_lat / n))
    }
}

/// A named outline (land polygon or border line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// All static annotations for a region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureTables {
    pub cities: Vec<City>,
    pub lakes: Vec<Lake>,
    pub rivers: Vec<River>,
    /// Land polygons, filled and outlined as coastline.
    pub land: Vec<Polyline>,
    /// Political borders, outlined only.
    pub borders: Vec<Polyline>,
}

impl FeatureTables {
    /// Names of annotations that lie entirely outside `bbox` grown by
    /// `margin` degrees. These are kept but would not be visible.
    pub fn outside(&self, bbox: &BoundingBox, margin: f64) -> Vec<String> {
        let grown = bbox.expanded(margin);
        let mut names = Vec::new();

        for city in &self.cities {
            if !grown.contains_point(city.lon, city.lat) {
                names.push(city.name.clone());
            }
        }
        for lake in &self.lakes {
            if !lake.outline().iter().any(|&(x, y)| grown.contains_point(x, y)) {
                names.push(lake.name.clone());
            }
        }
        for river in &self.rivers {
            if !river.path.iter().any(|&(x, y)| grown.contains_point(x, y)) {
                names.push(river.name.clone());
            }
        }

        names
    }

    /// Log every annotation that falls outside the mapped domain.
    pub fn warn_outside(&self, bbox: &BoundingBox) {
        for name in self.outside(bbox, 0.5) {
            warn!(feature = %name, bbox = %bbox, "Feature lies outside the map domain");
        }
    }
}
