//! Grid generation and synthetic field computation.
//!
//! The pipeline's numeric front end:
//!
//! ```text
//! BoundingBox + resolution
//!      │
//!      ▼
//! build_grid() ──► LatLonGrid (ny × nx lon/lat arrays)
//!      │
//!      ▼
//! compute_fields() ──► SyntheticFields { temperature, relief }
//!      │
//!      ▼
//! SyntheticFields::combined() ──► Field2D handed to the renderer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{build_grid, compute_fields};
//! use sst_common::BoundingBox;
//!
//! let bbox = BoundingBox::new(-87.0, -82.0, 10.5, 15.0);
//! let grid = build_grid(&bbox, 600)?;
//! let fields = compute_fields(&grid, &bbox);
//! let display = fields.combined().expect("fields share the grid shape");
//! ```

pub mod field;
pub mod grid;

pub use field::{compute_fields, Field2D, FieldStats, SyntheticFields};
pub use grid::{build_grid, linspace, LatLonGrid};
