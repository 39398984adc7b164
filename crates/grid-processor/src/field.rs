//! Synthetic temperature and relief fields.
//!
//! Both fields are closed-form functions of the mesh coordinates:
//!
//! ```text
//! tn = (lat - south) / (north - south)
//! ln = (lon - west) / (east - west)
//! temperature = 27 + 3·tn + 0.5·sin(5π·ln)·cos(5π·tn)
//! relief      = 0.3·sin(3·(lon - west))·cos(3·(lat - south))
//! ```
//!
//! The relief term takes raw degree offsets while the temperature ripple
//! takes normalized ones. The two are kept distinct.

use crate::LatLonGrid;
use sst_common::BoundingBox;
use std::f64::consts::PI;
use tracing::debug;

/// Temperature at the southern edge, before the ripple (°C)
pub const BASE_TEMPERATURE: f64 = 27.0;
/// South-to-north temperature rise across the domain (°C)
pub const GRADIENT_SPAN: f64 = 3.0;
pub const RIPPLE_AMPLITUDE: f64 = 0.5;
pub const RIPPLE_CYCLES: f64 = 5.0;
pub const RELIEF_AMPLITUDE: f64 = 0.3;
pub const RELIEF_FREQUENCY: f64 = 3.0;

/// A 2-D scalar field stored row-major, same layout as [`LatLonGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl Field2D {
    /// Wrap row-major data. Returns `None` when the length does not match.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != nx * ny {
            return None;
        }
        Some(Self { nx, ny, data })
    }

    /// Shape as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.ny || j >= self.nx {
            return None;
        }
        self.data.get(i * self.nx + j).copied()
    }

    /// Element-wise sum, `None` if shapes differ.
    pub fn add(&self, other: &Field2D) -> Option<Field2D> {
        if self.shape() != other.shape() {
            return None;
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Some(Field2D {
            nx: self.nx,
            ny: self.ny,
            data,
        })
    }

    /// Minimum, maximum and mean of the field.
    pub fn stats(&self) -> FieldStats {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in &self.data {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let mean = if self.data.is_empty() {
            f64::NAN
        } else {
            sum / self.data.len() as f64
        };
        FieldStats { min, max, mean }
    }

    /// Number of cells outside `[lo, hi]`.
    pub fn count_outside(&self, lo: f64, hi: f64) -> usize {
        self.data.iter().filter(|&&v| v < lo || v > hi).count()
    }
}

/// Summary statistics of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Temperature and relief computed over one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticFields {
    pub temperature: Field2D,
    pub relief: Field2D,
}

impl SyntheticFields {
    /// Temperature plus relief, the field that gets color mapped.
    /// `None` if the two fields do not share a shape.
    pub fn combined(&self) -> Option<Field2D> {
        self.temperature.add(&self.relief)
    }
}

/// North-south gradient term alone: 27 at `south`, 30 at `north`.
pub fn gradient_value(lat: f64, bbox: &BoundingBox) -> f64 {
    let tn = (lat - bbox.south) / bbox.lat_span();
    BASE_TEMPERATURE + tn * GRADIENT_SPAN
}

/// Full synthetic temperature at one point.
pub fn temperature_value(lon: f64, lat: f64, bbox: &BoundingBox) -> f64 {
    let ln = (lon - bbox.west) / bbox.lon_span();
    let tn = (lat - bbox.south) / bbox.lat_span();
    gradient_value(lat, bbox)
        + RIPPLE_AMPLITUDE * (RIPPLE_CYCLES * ln * PI).sin() * (RIPPLE_CYCLES * tn * PI).cos()
}

/// Decorative relief shading at one point (un-normalized degree offsets).
pub fn relief_value(lon: f64, lat: f64, bbox: &BoundingBox) -> f64 {
    RELIEF_AMPLITUDE
        * (RELIEF_FREQUENCY * (lon - bbox.west)).sin()
        * (RELIEF_FREQUENCY * (lat - bbox.south)).cos()
}

/// Evaluate both synthetic fields over every grid point.
pub fn compute_fields(grid: &LatLonGrid, bbox: &BoundingBox) -> SyntheticFields {
    let (temperature, relief): (Vec<f64>, Vec<f64>) = grid
        .lons()
        .iter()
        .zip(grid.lats())
        .map(|(&lon, &lat)| (temperature_value(lon, lat, bbox), relief_value(lon, lat, bbox)))
        .unzip();

    let nx = grid.nx();
    let ny = grid.ny();
    debug!(nx, ny, "Computed synthetic temperature and relief");

    SyntheticFields {
        temperature: Field2D {
            nx,
            ny,
            data: temperature,
        },
        relief: Field2D {
            nx,
            ny,
            data: relief,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> BoundingBox {
        BoundingBox::new(-87.0, -82.0, 10.5, 15.0)
    }

    #[test]
    fn test_gradient_edges() {
        let bbox = domain();
        assert!((gradient_value(10.5, &bbox) - 27.0).abs() < 1e-12);
        assert!((gradient_value(15.0, &bbox) - 30.0).abs() < 1e-12);
        assert!((gradient_value(12.75, &bbox) - 28.5).abs() < 1e-12);
    }

    #[test]
    fn test_ripple_vanishes_on_west_edge() {
        // sin(0) = 0, so the west edge carries only the gradient
        let bbox = domain();
        assert!((temperature_value(-87.0, 10.5, &bbox) - 27.0).abs() < 1e-12);
        assert!((temperature_value(-87.0, 15.0, &bbox) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_relief_uses_degree_offsets() {
        let bbox = domain();
        let expected = 0.3 * (3.0_f64 * 1.0).sin() * (3.0_f64 * 0.5).cos();
        assert!((relief_value(-86.0, 11.0, &bbox) - expected).abs() < 1e-12);
        assert_eq!(relief_value(-87.0, 12.0, &bbox), 0.0);
    }

    #[test]
    fn test_add_and_stats() {
        let a = Field2D::from_vec(2, 1, vec![1.0, 2.0]).unwrap();
        let b = Field2D::from_vec(2, 1, vec![0.5, -1.0]).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.data(), &[1.5, 1.0]);
        let column = Field2D::from_vec(1, 2, vec![0.0, 0.0]).unwrap();
        assert!(a.add(&column).is_none());
        let stats = sum.stats();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 1.5);
        assert_eq!(stats.mean, 1.25);
        assert_eq!(sum.count_outside(1.2, 2.0), 1);
        assert!(Field2D::from_vec(3, 3, vec![0.0; 4]).is_none());
    }
}
