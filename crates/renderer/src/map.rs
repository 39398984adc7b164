//! SST atlas map rendering.
//!
//! Draws the color-mapped field and the region annotations onto a
//! plate carrée figure and writes it out as a PNG.

use std::path::Path;

use grid_processor::{Field2D, LatLonGrid};
use rayon::prelude::*;
use sst_common::{AtlasError, AtlasResult, MapSettings, RegionConfig, RenderedMap};
use tiny_skia::Pixmap;
use tracing::{debug, info, warn};

use crate::canvas::{LineStyle, MapCanvas};
use crate::gradient::{render_grid, Color, Palette};
use crate::layout::MapLayout;
use crate::png::create_png_rgb;
use crate::text::{FontSet, HAlign, TextStyle, VAlign};
use crate::ticks::{format_lat, format_lon, format_tick_value, nice_step, nice_ticks};

/// Colors, line widths (points) and font sizes (points) of the map layers.
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub palette: Palette,
    pub vmin: f64,
    pub vmax: f64,
    pub ocean: Color,
    pub land: Color,
    pub coastline: Color,
    pub coastline_width: f32,
    pub border: Color,
    pub border_width: f32,
    pub gridline: Color,
    pub gridline_width: f32,
    pub feature: Color,
    pub feature_width: f32,
    /// Diameter of the city marker
    pub city_marker: f32,
    pub city_label_size: f32,
    pub lake_label_size: f32,
    pub river_label_size: f32,
    pub scale_bar_width: f32,
    pub scale_label_size: f32,
    pub tick_label_size: f32,
    pub colorbar_label_size: f32,
    pub title_size: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            palette: Palette::thermal(),
            vmin: 26.0,
            vmax: 30.0,
            ocean: Color::LIGHTCYAN,
            land: Color::WHITESMOKE,
            coastline: Color::BLACK,
            coastline_width: 1.0,
            border: Color::GRAY,
            border_width: 0.5,
            gridline: Color::GRAY.with_alpha(0.5),
            gridline_width: 0.5,
            feature: Color::BLUE,
            feature_width: 2.0,
            city_marker: 6.0,
            city_label_size: 11.0,
            lake_label_size: 10.0,
            river_label_size: 9.0,
            scale_bar_width: 4.0,
            scale_label_size: 11.0,
            tick_label_size: 10.0,
            colorbar_label_size: 11.0,
            title_size: 18.0,
        }
    }
}

impl MapStyle {
    /// Default appearance with the color range taken from the settings.
    pub fn from_settings(settings: &MapSettings) -> Self {
        Self {
            vmin: settings.vmin,
            vmax: settings.vmax,
            ..Self::default()
        }
    }
}

/// Offset of city labels from their marker, in degrees
const CITY_LABEL_OFFSET_DEG: f64 = 0.03;
/// Offset of the scale bar label below the bar, in degrees
const SCALE_LABEL_OFFSET_DEG: f64 = 0.05;

/// Render the region map and write it as a PNG at `path`, replacing any
/// existing file.
pub fn render_map(
    config: &RegionConfig,
    grid: &LatLonGrid,
    field: &Field2D,
    style: &MapStyle,
    path: &Path,
) -> AtlasResult<RenderedMap> {
    let fonts = FontSet::load(config.map.font_path.as_deref()).or_else(|e| {
        warn!(error = %e, "Label font unusable, falling back to the built-in font");
        FontSet::embedded()
    })?;

    let pixmap = draw_map(config, grid, field, style, Some(&fonts))?;
    let (width_px, height_px) = (pixmap.width(), pixmap.height());

    let png = create_png_rgb(
        pixmap.data(),
        width_px as usize,
        height_px as usize,
        Some(config.map.dpi),
    )
    .map_err(AtlasError::Encode)?;
    std::fs::write(path, &png)?;

    info!(
        path = %path.display(),
        width = width_px,
        height = height_px,
        dpi = config.map.dpi,
        bytes = png.len(),
        "Saved map image"
    );

    Ok(RenderedMap {
        path: path.to_path_buf(),
        width_px,
        height_px,
        dpi: config.map.dpi,
    })
}

/// Draw every map layer into a new pixmap. Labels are skipped when
/// `fonts` is `None`.
pub fn draw_map(
    config: &RegionConfig,
    grid: &LatLonGrid,
    field: &Field2D,
    style: &MapStyle,
    fonts: Option<&FontSet>,
) -> AtlasResult<Pixmap> {
    if field.shape() != grid.shape() {
        return Err(AtlasError::render(format!(
            "field shape {:?} does not match grid shape {:?}",
            field.shape(),
            grid.shape()
        )));
    }

    let layout = MapLayout::compute(
        config.map.width_in,
        config.map.height_in,
        config.map.dpi,
        &config.bbox,
    )?;
    debug!(
        width = layout.width_px,
        height = layout.height_px,
        axes = ?layout.axes,
        "Computed map layout"
    );

    let mut canvas = MapCanvas::new(layout, config.bbox, fonts)?;

    draw_background(&mut canvas, config, style);
    draw_field(&mut canvas, grid, field, style);
    draw_outlines(&mut canvas, config, style);
    draw_gridlines(&mut canvas, style);
    draw_cities(&mut canvas, config, style);
    draw_lakes(&mut canvas, config, style);
    draw_rivers(&mut canvas, config, style);
    draw_scale_bar(&mut canvas, config, style);

    let frame = LineStyle::solid(Color::BLACK, canvas.pt(1.0));
    canvas.stroke_rect(canvas.layout().axes, frame);

    draw_colorbar(&mut canvas, config, style);
    draw_title(&mut canvas, config, style);

    Ok(canvas.into_pixmap())
}

fn draw_background(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    canvas.fill_rect(canvas.layout().axes, style.ocean);
    for land in &config.features.land {
        canvas.fill_polygon(&land.points, style.land);
    }
}

/// Nearest-cell raster of the field over the axes.
fn draw_field(canvas: &mut MapCanvas, grid: &LatLonGrid, field: &Field2D, style: &MapStyle) {
    let axes = canvas.layout().axes;
    let bbox = *canvas.bbox();
    let (x0, y0) = (axes.x as usize, axes.y as usize);
    let (w, h) = (axes.width as usize, axes.height as usize);
    let mid_lon = (bbox.west + bbox.east) / 2.0;
    let mid_lat = (bbox.south + bbox.north) / 2.0;

    let columns: Vec<Option<usize>> = (0..w)
        .map(|c| {
            let lon = bbox.west + (c as f64 + 0.5) / w as f64 * bbox.lon_span();
            grid.nearest_index(lon, mid_lat).map(|(_, j)| j)
        })
        .collect();
    let rows: Vec<Option<usize>> = (0..h)
        .map(|r| {
            let lat = bbox.north - (r as f64 + 0.5) / h as f64 * bbox.lat_span();
            grid.nearest_index(mid_lon, lat).map(|(i, _)| i)
        })
        .collect();

    let colors: Vec<[u8; 4]> = field
        .data()
        .par_iter()
        .map(|&v| {
            let c = style.palette.color_for_value(v, style.vmin, style.vmax);
            [c.r, c.g, c.b, 255]
        })
        .collect();

    let nx = field.nx();
    let stride = canvas.layout().width_px as usize * 4;
    canvas
        .pixmap_mut()
        .data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(y0)
        .take(h)
        .for_each(|(py, row)| {
            let Some(i) = rows[py - y0] else {
                return;
            };
            for (c, j) in columns.iter().enumerate() {
                if let Some(j) = j {
                    let idx = (x0 + c) * 4;
                    row[idx..idx + 4].copy_from_slice(&colors[i * nx + j]);
                }
            }
        });

    let stats = field.stats();
    debug!(
        min = stats.min,
        max = stats.max,
        clipped = field.count_outside(style.vmin, style.vmax),
        "Rasterized field"
    );
}

fn draw_outlines(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    let coast = LineStyle::solid(style.coastline, canvas.pt(style.coastline_width));
    for land in &config.features.land {
        canvas.stroke_geo(&land.points, coast);
    }
    let border = LineStyle::solid(style.border, canvas.pt(style.border_width));
    for line in &config.features.borders {
        canvas.stroke_geo(&line.points, border);
    }
}

fn draw_gridlines(canvas: &mut MapCanvas, style: &MapStyle) {
    let bbox = *canvas.bbox();
    let axes = canvas.layout().axes;
    let line = LineStyle::dashed(
        style.gridline,
        canvas.pt(style.gridline_width),
        canvas.pt(3.0),
        canvas.pt(2.0),
    );
    let label = TextStyle::new(canvas.pt(style.tick_label_size), Color::BLACK);
    let pad = canvas.pt(4.0);

    let lons = nice_ticks(bbox.west, bbox.east, 6);
    for &lon in &lons {
        let (x, _) = canvas.project(lon, bbox.north);
        canvas.stroke_px(&[(x, axes.y), (x, axes.bottom())], line, true);
        canvas.text(&format_lon(lon), x, axes.bottom() + pad, label, HAlign::Center, VAlign::Top);
    }

    let lats = nice_ticks(bbox.south, bbox.north, 6);
    for &lat in &lats {
        let (_, y) = canvas.project(bbox.west, lat);
        canvas.stroke_px(&[(axes.x, y), (axes.right(), y)], line, true);
        canvas.text(&format_lat(lat), axes.x - pad, y, label, HAlign::Right, VAlign::Center);
    }
    debug!(meridians = lons.len(), parallels = lats.len(), "Drew gridlines");
}

fn draw_cities(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    let radius = canvas.pt(style.city_marker) / 2.0;
    let label = TextStyle::new(canvas.pt(style.city_label_size), Color::BLACK).bold();
    for city in &config.features.cities {
        canvas.marker(city.lon, city.lat, radius, Color::BLACK);
        canvas.text_geo(
            &city.name,
            city.lon + CITY_LABEL_OFFSET_DEG,
            city.lat + CITY_LABEL_OFFSET_DEG,
            label,
            HAlign::Left,
            VAlign::Bottom,
        );
    }
}

fn draw_lakes(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    let line = LineStyle::solid(style.feature, canvas.pt(style.feature_width));
    let label = TextStyle::new(canvas.pt(style.lake_label_size), style.feature).bold();
    for lake in &config.features.lakes {
        canvas.stroke_geo(&lake.outline(), line);
        let (lon, lat) = lake.center();
        canvas.text_geo(&lake.name, lon, lat, label, HAlign::Center, VAlign::Center);
    }
}

fn draw_rivers(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    let line = LineStyle::solid(style.feature, canvas.pt(style.feature_width));
    let label = TextStyle::new(canvas.pt(style.river_label_size), style.feature);
    for river in &config.features.rivers {
        canvas.stroke_geo(&river.path, line);
        if let Some((lon, lat)) = river.label_anchor() {
            canvas.text_geo(&river.name, lon, lat, label, HAlign::Center, VAlign::Bottom);
        }
    }
}

/// Fixed-length bar in degrees of longitude; the label is nominal.
fn draw_scale_bar(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    let bar = &config.map.scale_bar;
    let lon0 = config.bbox.west + bar.offset_deg;
    let lat0 = config.bbox.south + bar.offset_deg;
    let lon1 = lon0 + bar.length_deg;

    let line = LineStyle::solid(Color::BLACK, canvas.pt(style.scale_bar_width));
    canvas.stroke_geo(&[(lon0, lat0), (lon1, lat0)], line);

    let label = TextStyle::new(canvas.pt(style.scale_label_size), Color::BLACK);
    canvas.text_geo(
        &bar.label,
        (lon0 + lon1) / 2.0,
        lat0 - SCALE_LABEL_OFFSET_DEG,
        label,
        HAlign::Center,
        VAlign::Top,
    );
}

fn draw_colorbar(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    let rect = canvas.layout().colorbar;
    let (w, h) = (rect.width as usize, rect.height as usize);
    let (vmin, vmax) = (style.vmin as f32, style.vmax as f32);

    // One value per row, top row = vmax
    let mut values = Vec::with_capacity(w * h);
    for r in 0..h {
        let v = vmax - (r as f32 + 0.5) / h as f32 * (vmax - vmin);
        values.extend(std::iter::repeat(v).take(w));
    }
    let ramp = render_grid(&values, w, h, vmin, vmax, |t| style.palette.color_at(t));

    let (x0, y0) = (rect.x as usize, rect.y as usize);
    let stride = canvas.layout().width_px as usize * 4;
    let data = canvas.pixmap_mut().data_mut();
    for (r, src) in ramp.chunks_exact(w * 4).enumerate() {
        let start = (y0 + r) * stride + x0 * 4;
        if let Some(dst) = data.get_mut(start..start + w * 4) {
            dst.copy_from_slice(src);
        }
    }

    let frame = LineStyle::solid(Color::BLACK, canvas.pt(0.8));
    canvas.stroke_rect(rect, frame);

    let step = nice_step((style.vmax - style.vmin) / 8.0);
    let ticks = nice_ticks(style.vmin, style.vmax, 8);
    let tick_len = canvas.pt(3.5);
    let label = TextStyle::new(canvas.pt(style.tick_label_size), Color::BLACK);
    let mut widest = 0.0f32;
    for &value in &ticks {
        let y = rect.bottom() - ((value - style.vmin) / (style.vmax - style.vmin)) as f32 * rect.height;
        canvas.stroke_px(&[(rect.right(), y), (rect.right() + tick_len, y)], frame, false);
        let text = format_tick_value(value, step);
        widest = widest.max(canvas.measure(&text, &label).0);
        canvas.text(&text, rect.right() + tick_len + canvas.pt(2.0), y, label, HAlign::Left, VAlign::Center);
    }

    let title = TextStyle::new(canvas.pt(style.colorbar_label_size), Color::BLACK);
    let (_, label_h) = canvas.measure(&config.map.colorbar_label, &title);
    let x = rect.right() + tick_len + canvas.pt(6.0) + widest + label_h / 2.0;
    canvas.text_vertical(&config.map.colorbar_label, x, rect.y + rect.height / 2.0, title);
}

fn draw_title(canvas: &mut MapCanvas, config: &RegionConfig, style: &MapStyle) {
    let axes = canvas.layout().axes;
    let label = TextStyle::new(canvas.pt(style.title_size), Color::BLACK).bold();
    canvas.text(
        &config.map_title(),
        axes.center_x(),
        axes.y - canvas.pt(8.0),
        label,
        HAlign::Center,
        VAlign::Bottom,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_takes_color_range_from_settings() {
        let settings = MapSettings {
            vmin: 20.0,
            vmax: 25.0,
            ..MapSettings::default()
        };
        let style = MapStyle::from_settings(&settings);
        assert_eq!(style.vmin, 20.0);
        assert_eq!(style.vmax, 25.0);
        assert_eq!(style.ocean, Color::LIGHTCYAN);
    }

    #[test]
    fn test_default_style_matches_atlas_range() {
        let style = MapStyle::default();
        assert_eq!((style.vmin, style.vmax), (26.0, 30.0));
        assert_eq!(style.gridline.a, 128);
    }
}
