//! Regular lon/lat mesh over a bounding box.

use sst_common::{AtlasError, AtlasResult, BoundingBox};
use tracing::debug;

/// Evenly spaced samples from `start` to `stop`, both inclusive.
///
/// The last sample is exactly `stop`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|k| start + k as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

/// A uniform lon/lat mesh.
///
/// Point (i, j) is row `i` (latitude index, south to north) and column `j`
/// (longitude index, west to east). Both coordinate arrays are stored
/// row-major with `nx` columns and `ny` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct LatLonGrid {
    nx: usize,
    ny: usize,
    lon_axis: Vec<f64>,
    lat_axis: Vec<f64>,
    lon: Vec<f64>,
    lat: Vec<f64>,
}

impl LatLonGrid {
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

    /// 1-D longitude samples (length nx).
    pub fn lon_axis(&self) -> &[f64] {
        &self.lon_axis
    }

    /// 1-D latitude samples (length ny).
    pub fn lat_axis(&self) -> &[f64] {
        &self.lat_axis
    }

    /// Flattened 2-D longitude array.
    pub fn lons(&self) -> &[f64] {
        &self.lon
    }

    /// Flattened 2-D latitude array.
    pub fn lats(&self) -> &[f64] {
        &self.lat
    }

    /// Flat index of point (i, j).
    fn flat_index(&self, i: usize, j: usize) -> usize {
        i * self.nx + j
    }

    /// Coordinates of point (i, j) as (lon, lat).
    pub fn coord(&self, i: usize, j: usize) -> Option<(f64, f64)> {
        if i >= self.ny || j >= self.nx {
            return None;
        }
        let idx = self.flat_index(i, j);
        Some((self.lon[idx], self.lat[idx]))
    }

    /// Longitude spacing in degrees.
    pub fn dlon(&self) -> f64 {
        spacing(&self.lon_axis)
    }

    /// Latitude spacing in degrees.
    pub fn dlat(&self) -> f64 {
        spacing(&self.lat_axis)
    }

    /// Nearest mesh point to a coordinate, treating each point as the
    /// center of a cell. Points further than half a cell outside the mesh
    /// return `None`.
    pub fn nearest_index(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let j = nearest_axis_index(&self.lon_axis, lon)?;
        let i = nearest_axis_index(&self.lat_axis, lat)?;
        Some((i, j))
    }
}

fn spacing(axis: &[f64]) -> f64 {
    if axis.len() < 2 {
        return 0.0;
    }
    (axis[axis.len() - 1] - axis[0]) / (axis.len() - 1) as f64
}

fn nearest_axis_index(axis: &[f64], value: f64) -> Option<usize> {
    let step = spacing(axis);
    if step <= 0.0 || !value.is_finite() {
        return None;
    }
    let k = ((value - axis[0]) / step).round();
    if k < 0.0 || k > (axis.len() - 1) as f64 {
        return None;
    }
    Some(k as usize)
}

/// Build a `resolution × resolution` mesh spanning `bbox`, bounds inclusive.
pub fn build_grid(bbox: &BoundingBox, resolution: usize) -> AtlasResult<LatLonGrid> {
    if resolution < 2 {
        return Err(AtlasError::invalid_config(
            "resolution",
            format!("need at least 2 samples per axis, got {}", resolution),
        ));
    }
    if !bbox.is_valid() {
        return Err(AtlasError::invalid_config(
            "bbox",
            format!("degenerate bounding box {}", bbox),
        ));
    }

    let lon_axis = linspace(bbox.west, bbox.east, resolution);
    let lat_axis = linspace(bbox.south, bbox.north, resolution);
    let nx = lon_axis.len();
    let ny = lat_axis.len();

    let mut lon = Vec::with_capacity(nx * ny);
    let mut lat = Vec::with_capacity(nx * ny);
    for &y in &lat_axis {
        lon.extend_from_slice(&lon_axis);
        lat.extend(std::iter::repeat(y).take(nx));
    }

    let grid = LatLonGrid {
        nx,
        ny,
        lon_axis,
        lat_axis,
        lon,
        lat,
    };
    debug!(
        nx,
        ny,
        dlon = grid.dlon(),
        dlat = grid.dlat(),
        first = ?grid.coord(0, 0),
        last = ?grid.coord(ny - 1, nx - 1),
        "Built lon/lat grid"
    );

    Ok(grid)
}
