//! Plate carrée drawing surface.
//!
//! Wraps a tiny-skia pixmap together with the figure layout and the
//! geographic extent of the axes. Geometry given in degrees is projected
//! to pixels and clipped to the axes frame; text is not clipped.

use sst_common::{AtlasError, AtlasResult, BoundingBox};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke,
    StrokeDash, Transform,
};

use crate::gradient::Color;
use crate::layout::{MapLayout, PxRect};
use crate::text::{self, FontSet, HAlign, TextStyle, VAlign};

/// Line appearance in pixels.
#[derive(Debug, Clone, Copy)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
    /// On/off dash lengths, solid when `None`
    pub dash: Option<[f32; 2]>,
}

impl LineStyle {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, on: f32, off: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([on, off]),
        }
    }
}

pub struct MapCanvas<'a> {
    pixmap: Pixmap,
    layout: MapLayout,
    bbox: BoundingBox,
    axes_mask: Mask,
    fonts: Option<&'a FontSet>,
}

impl<'a> MapCanvas<'a> {
    /// Blank white figure sized by `layout`.
    pub fn new(
        layout: MapLayout,
        bbox: BoundingBox,
        fonts: Option<&'a FontSet>,
    ) -> AtlasResult<Self> {
        let mut pixmap = Pixmap::new(layout.width_px, layout.height_px).ok_or_else(|| {
            AtlasError::render(format!(
                "cannot allocate {}x{} canvas",
                layout.width_px, layout.height_px
            ))
        })?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let mut axes_mask = Mask::new(layout.width_px, layout.height_px)
            .ok_or_else(|| AtlasError::render("cannot allocate clip mask"))?;
        let axes = layout.axes;
        let clip_rect = Rect::from_xywh(axes.x, axes.y, axes.width, axes.height)
            .ok_or_else(|| AtlasError::render("axes rectangle is empty"))?;
        axes_mask.fill_path(
            &PathBuilder::from_rect(clip_rect),
            FillRule::Winding,
            false,
            Transform::identity(),
        );

        Ok(Self {
            pixmap,
            layout,
            bbox,
            axes_mask,
            fonts,
        })
    }

    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Points to pixels at the figure dpi.
    pub fn pt(&self, points: f32) -> f32 {
        self.layout.pt(points)
    }

    /// Project (lon, lat) to pixel coordinates. Points outside the bbox
    /// land outside the axes.
    pub fn project(&self, lon: f64, lat: f64) -> (f32, f32) {
        let axes = self.layout.axes;
        let fx = (lon - self.bbox.west) / self.bbox.lon_span();
        let fy = (self.bbox.north - lat) / self.bbox.lat_span();
        (
            axes.x + (fx * axes.width as f64) as f32,
            axes.y + (fy * axes.height as f64) as f32,
        )
    }

    /// Fill a pixel rectangle, unclipped.
    pub fn fill_rect(&mut self, rect: PxRect, color: Color) {
        if let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
            self.pixmap
                .fill_rect(r, &paint(color, false), Transform::identity(), None);
        }
    }

    /// Fill a closed lon/lat polygon, clipped to the axes.
    pub fn fill_polygon(&mut self, points: &[(f64, f64)], color: Color) {
        if let Some(path) = self.geo_path(points, true) {
            self.pixmap.fill_path(
                &path,
                &paint(color, true),
                FillRule::EvenOdd,
                Transform::identity(),
                Some(&self.axes_mask),
            );
        }
    }

    /// Stroke a lon/lat polyline, clipped to the axes.
    pub fn stroke_geo(&mut self, points: &[(f64, f64)], style: LineStyle) {
        if let Some(path) = self.geo_path(points, false) {
            self.stroke(&path, style, true);
        }
    }

    /// Stroke a pixel-space polyline, optionally clipped to the axes.
    pub fn stroke_px(&mut self, points: &[(f32, f32)], style: LineStyle, clip: bool) {
        if let Some(path) = px_path(points, false) {
            self.stroke(&path, style, clip);
        }
    }

    /// Stroke a pixel rectangle outline, unclipped.
    pub fn stroke_rect(&mut self, rect: PxRect, style: LineStyle) {
        if let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) {
            let path = PathBuilder::from_rect(r);
            self.stroke(&path, style, false);
        }
    }

    /// Filled circle marker at (lon, lat), clipped to the axes.
    pub fn marker(&mut self, lon: f64, lat: f64, radius: f32, color: Color) {
        let (x, y) = self.project(lon, lat);
        if let Some(path) = PathBuilder::from_circle(x, y, radius) {
            self.pixmap.fill_path(
                &path,
                &paint(color, true),
                FillRule::Winding,
                Transform::identity(),
                Some(&self.axes_mask),
            );
        }
    }

    /// Draw a label at a pixel position. A no-op without fonts.
    pub fn text(
        &mut self,
        label: &str,
        x: f32,
        y: f32,
        style: TextStyle,
        halign: HAlign,
        valign: VAlign,
    ) {
        if let Some(fonts) = self.fonts {
            text::draw_text(&mut self.pixmap, fonts, label, x, y, &style, halign, valign);
        }
    }

    /// Draw a label at a geographic position.
    pub fn text_geo(
        &mut self,
        label: &str,
        lon: f64,
        lat: f64,
        style: TextStyle,
        halign: HAlign,
        valign: VAlign,
    ) {
        let (x, y) = self.project(lon, lat);
        self.text(label, x, y, style, halign, valign);
    }

    /// Draw a label reading bottom to top, centered on (x, y).
    pub fn text_vertical(&mut self, label: &str, x: f32, y: f32, style: TextStyle) {
        if let Some(fonts) = self.fonts {
            text::draw_text_vertical(&mut self.pixmap, fonts, label, x, y, &style);
        }
    }

    /// Pixel size of a label, zero without fonts.
    pub fn measure(&self, label: &str, style: &TextStyle) -> (f32, f32) {
        self.fonts
            .map(|fonts| text::measure_text(fonts, label, style))
            .unwrap_or((0.0, 0.0))
    }

    fn geo_path(&self, points: &[(f64, f64)], close: bool) -> Option<Path> {
        let projected: Vec<(f32, f32)> = points
            .iter()
            .map(|&(lon, lat)| self.project(lon, lat))
            .collect();
        px_path(&projected, close)
    }

    fn stroke(&mut self, path: &Path, style: LineStyle, clip: bool) {
        let mut stroke = Stroke {
            width: style.width.max(0.5),
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        if let Some([on, off]) = style.dash {
            stroke.dash = StrokeDash::new(vec![on, off], 0.0);
        }
        let mask = if clip { Some(&self.axes_mask) } else { None };
        self.pixmap.stroke_path(
            path,
            &paint(style.color, true),
            &stroke,
            Transform::identity(),
            mask,
        );
    }
}

fn paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = anti_alias;
    paint
}

fn px_path(points: &[(f32, f32)], close: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if close {
        pb.close();
    }
    pb.finish()
}
