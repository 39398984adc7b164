//! Geographic bounding box of the mapped domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic bounding box in degrees.
///
/// Serialized as a four element list `[west, east, south, north]`, the
/// same order the domain is written in region files and printed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its four limits.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Check if a point is contained within this bbox (bounds inclusive).
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    /// Return a copy grown by `margin` degrees on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            west: self.west - margin,
            east: self.east + margin,
            south: self.south - margin,
            north: self.north + margin,
        }
    }

    /// Check that the limits describe a non-empty box.
    pub fn is_valid(&self) -> bool {
        self.west.is_finite()
            && self.east.is_finite()
            && self.south.is_finite()
            && self.north.is_finite()
            && self.west < self.east
            && self.south < self.north
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.west, b.east, b.south, b.north]
    }
}

impl fmt::Display for BoundingBox {
    /// Formats as `[-87.0, -82.0, 10.5, 15.0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}, {:?}, {:?}, {:?}]",
            self.west, self.east, self.south, self.north
        )
    }
}
