//! Common types shared by the SST atlas crates.

pub mod artifacts;
pub mod bbox;
pub mod error;
pub mod features;
pub mod region;

pub use artifacts::{MapOutcome, RenderedMap};
pub use bbox::BoundingBox;
pub use error::{AtlasError, AtlasResult};
pub use features::{City, FeatureTables, Lake, Polyline, River};
pub use region::{MapSettings, OutputSettings, RegionConfig, ReportSettings, ScaleBarSettings};
