//! Common test fixtures for sst-atlas tests.

use sst_common::RegionConfig;

/// Common bounding boxes as (west, east, south, north).
pub mod bbox {
    /// The Nicaragua atlas domain
    pub const NICARAGUA: (f64, f64, f64, f64) = (-87.0, -82.0, 10.5, 15.0);

    /// Unit square at the origin
    pub const UNIT: (f64, f64, f64, f64) = (0.0, 1.0, 0.0, 1.0);

    /// Inverted limits (west > east)
    pub const INVERTED: (f64, f64, f64, f64) = (10.0, 5.0, 0.0, 1.0);
}

/// A small region with one feature of each kind, sized for fast rendering.
pub const SYNTHETIC_REGION_YAML: &str = r#"
name: Testland
bbox: [0.0, 4.0, 0.0, 3.0]
resolution: 40
map:
  width_in: 7.0
  height_in: 5.0
  dpi: 40
report:
  author: "Test Author"
features:
  cities:
    - { name: "Alpha", lon: 1.0, lat: 1.0 }
  lakes:
    - { name: "Lake One", lon_min: 2.0, lon_max: 2.5, lat_min: 2.0, lat_max: 2.5 }
  rivers:
    - name: "River One"
      path: [[0.5, 2.5], [1.5, 2.0], [3.5, 1.5]]
  land:
    - name: "Island"
      points: [[0.5, 0.5], [2.0, 0.5], [2.0, 1.8], [0.5, 1.8], [0.5, 0.5]]
  borders:
    - name: "Line"
      points: [[1.0, 0.5], [1.0, 1.8]]
"#;

/// Parse [`SYNTHETIC_REGION_YAML`].
pub fn synthetic_region() -> RegionConfig {
    RegionConfig::from_yaml_str(SYNTHETIC_REGION_YAML).expect("synthetic region fixture is valid")
}

/// The built-in Nicaragua region with the map dpi lowered so a full render
/// stays quick in debug builds.
pub fn nicaragua_at_dpi(dpi: u32) -> RegionConfig {
    let mut config = RegionConfig::nicaragua().expect("embedded region is valid");
    config.map.dpi = dpi;
    config
}
