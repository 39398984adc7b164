//! Map rendering for the SST atlas.
//!
//! Draws a color-mapped temperature field with coastlines, gridlines and
//! region annotations onto a plate carrée figure:
//! - Thermal color ramp and color bar
//! - Dashed degree gridlines with formatted labels
//! - City, lake and river overlays, scale bar and title
//! - RGB PNG output with the print resolution recorded

pub mod canvas;
pub mod gradient;
pub mod layout;
pub mod map;
pub mod png;
pub mod text;
pub mod ticks;

pub use gradient::{Color, Palette};
pub use layout::{MapLayout, PxRect};
pub use map::{draw_map, render_map, MapStyle};
pub use sst_common::RenderedMap;
pub use text::FontSet;
