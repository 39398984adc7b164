//! Figure layout: where the map axes, color bar and title go.
//!
//! All margins are in inches and scale with the dpi, so a low-dpi preview
//! and the full 600 dpi render share the same proportions.

use sst_common::{AtlasError, AtlasResult, BoundingBox};

const LEFT_MARGIN_IN: f64 = 0.9;
const BOTTOM_MARGIN_IN: f64 = 0.6;
const TOP_MARGIN_IN: f64 = 0.8;
const COLORBAR_PAD_IN: f64 = 0.25;
const COLORBAR_WIDTH_IN: f64 = 0.3;
/// Room for color bar tick labels and its rotated label
const COLORBAR_LABELS_IN: f64 = 1.0;

const POINTS_PER_INCH: f64 = 72.0;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PxRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Pixel geometry of the whole figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapLayout {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
    /// Map frame, aspect equal to the bbox in degrees (plate carrée)
    pub axes: PxRect,
    pub colorbar: PxRect,
}

impl MapLayout {
    /// Compute the layout for a figure of `width_in` × `height_in` inches.
    pub fn compute(
        width_in: f64,
        height_in: f64,
        dpi: u32,
        bbox: &BoundingBox,
    ) -> AtlasResult<Self> {
        let dpi_f = dpi as f64;
        let width_px = (width_in * dpi_f).round() as u32;
        let height_px = (height_in * dpi_f).round() as u32;

        let right_margin_in = COLORBAR_PAD_IN + COLORBAR_WIDTH_IN + COLORBAR_LABELS_IN;
        let avail_w = width_in - LEFT_MARGIN_IN - right_margin_in;
        let avail_h = height_in - TOP_MARGIN_IN - BOTTOM_MARGIN_IN;
        if avail_w <= 0.0 || avail_h <= 0.0 || width_px == 0 || height_px == 0 {
            return Err(AtlasError::render(format!(
                "figure {}x{} in is too small for the map layout",
                width_in, height_in
            )));
        }

        let aspect = bbox.lon_span() / bbox.lat_span();
        let (axes_w, axes_h) = if avail_w / avail_h > aspect {
            (avail_h * aspect, avail_h)
        } else {
            (avail_w, avail_w / aspect)
        };
        let axes_x = LEFT_MARGIN_IN + (avail_w - axes_w) / 2.0;
        let axes_y = TOP_MARGIN_IN + (avail_h - axes_h) / 2.0;

        // Whole pixels, so the field raster and the frame line up exactly
        let axes = PxRect {
            x: (axes_x * dpi_f).round() as f32,
            y: (axes_y * dpi_f).round() as f32,
            width: (axes_w * dpi_f).round().max(1.0) as f32,
            height: (axes_h * dpi_f).round().max(1.0) as f32,
        };
        let colorbar = PxRect {
            x: axes.right() + (COLORBAR_PAD_IN * dpi_f).round() as f32,
            y: axes.y,
            width: (COLORBAR_WIDTH_IN * dpi_f).round().max(1.0) as f32,
            height: axes.height,
        };

        Ok(Self {
            width_px,
            height_px,
            dpi,
            axes,
            colorbar,
        })
    }

    /// Convert a length in points to pixels.
    pub fn pt(&self, points: f32) -> f32 {
        points * self.dpi as f32 / POINTS_PER_INCH as f32
    }
}
