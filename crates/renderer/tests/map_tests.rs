//! Tests for full map rendering.
//!
//! Pixel checks draw without fonts so they do not depend on glyph shapes.

use grid_processor::{build_grid, compute_fields, Field2D, LatLonGrid};
use renderer::{draw_map, render_map, MapLayout, MapStyle};
use sst_common::RegionConfig;
use test_utils::{synthetic_region, temp_test_dir};
use tiny_skia::Pixmap;

// ============================================================================
// Helper functions
// ============================================================================

fn pipeline_inputs(config: &RegionConfig) -> (LatLonGrid, Field2D) {
    let grid = build_grid(&config.bbox, config.resolution).unwrap();
    let field = compute_fields(&grid, &config.bbox).combined().unwrap();
    (grid, field)
}

fn layout_for(config: &RegionConfig) -> MapLayout {
    MapLayout::compute(
        config.map.width_in,
        config.map.height_in,
        config.map.dpi,
        &config.bbox,
    )
    .unwrap()
}

fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * pixmap.width() + x) * 4) as usize;
    let data = pixmap.data();
    [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
}

/// Pixel containing (lon, lat).
fn geo_pixel(layout: &MapLayout, config: &RegionConfig, lon: f64, lat: f64) -> (u32, u32) {
    let axes = layout.axes;
    let bbox = config.bbox;
    let x = axes.x + ((lon - bbox.west) / bbox.lon_span() * axes.width as f64) as f32;
    let y = axes.y + ((bbox.north - lat) / bbox.lat_span() * axes.height as f64) as f32;
    (x as u32, y as u32)
}

/// Color the field raster should give pixel (x, y).
fn expected_field_color(
    config: &RegionConfig,
    layout: &MapLayout,
    grid: &LatLonGrid,
    field: &Field2D,
    style: &MapStyle,
    x: u32,
    y: u32,
) -> [u8; 4] {
    let axes = layout.axes;
    let bbox = config.bbox;
    let lon = bbox.west + ((x - axes.x as u32) as f64 + 0.5) / axes.width as f64 * bbox.lon_span();
    let lat = bbox.north - ((y - axes.y as u32) as f64 + 0.5) / axes.height as f64 * bbox.lat_span();
    let (i, j) = grid.nearest_index(lon, lat).unwrap();
    let c = style
        .palette
        .color_for_value(field.get(i, j).unwrap(), style.vmin, style.vmax);
    [c.r, c.g, c.b, 255]
}

// ============================================================================
// draw_map tests
// ============================================================================

#[test]
fn test_figure_size_follows_settings() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let pixmap = draw_map(&config, &grid, &field, &MapStyle::default(), None).unwrap();
    assert_eq!(pixmap.width(), 280);
    assert_eq!(pixmap.height(), 200);
}

#[test]
fn test_background_outside_axes_is_white() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let pixmap = draw_map(&config, &grid, &field, &MapStyle::default(), None).unwrap();
    assert_eq!(pixel(&pixmap, 1, 1), [255, 255, 255, 255]);
    assert_eq!(pixel(&pixmap, 1, pixmap.height() - 2), [255, 255, 255, 255]);
}

#[test]
fn test_field_pixels_use_nearest_cell_color() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let style = MapStyle::from_settings(&config.map);
    let layout = layout_for(&config);
    let pixmap = draw_map(&config, &grid, &field, &style, None).unwrap();

    // Open water away from gridlines and features
    for (lon, lat) in [(3.5, 2.7), (2.6, 0.6), (3.6, 0.7)] {
        let (x, y) = geo_pixel(&layout, &config, lon, lat);
        let expected = expected_field_color(&config, &layout, &grid, &field, &style, x, y);
        assert_eq!(pixel(&pixmap, x, y), expected, "pixel at ({}, {})", lon, lat);
    }
}

#[test]
fn test_out_of_range_values_saturate() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let layout = layout_for(&config);

    // Every value is far above the range
    let mut style = MapStyle::from_settings(&config.map);
    style.vmin = 0.0;
    style.vmax = 1.0;
    let pixmap = draw_map(&config, &grid, &field, &style, None).unwrap();
    let top = style.palette.color_at(1.0);
    let (x, y) = geo_pixel(&layout, &config, 3.5, 2.7);
    assert_eq!(pixel(&pixmap, x, y), [top.r, top.g, top.b, 255]);

    // Every value is far below the range
    style.vmin = 100.0;
    style.vmax = 101.0;
    let pixmap = draw_map(&config, &grid, &field, &style, None).unwrap();
    let bottom = style.palette.color_at(0.0);
    assert_eq!(pixel(&pixmap, x, y), [bottom.r, bottom.g, bottom.b, 255]);
}

#[test]
fn test_city_marker_and_scale_bar_are_black() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let layout = layout_for(&config);
    let pixmap = draw_map(&config, &grid, &field, &MapStyle::default(), None).unwrap();

    let city = &config.features.cities[0];
    let (x, y) = geo_pixel(&layout, &config, city.lon, city.lat);
    assert_eq!(pixel(&pixmap, x, y), [0, 0, 0, 255]);

    // Bar runs from west + 0.25 to west + 0.75 at south + 0.25
    let (x, y) = geo_pixel(&layout, &config, 0.5, 0.25);
    assert_eq!(pixel(&pixmap, x, y), [0, 0, 0, 255]);
}

#[test]
fn test_lake_outline_is_blue() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let layout = layout_for(&config);
    // Wide enough to fully cover whole pixels at 40 dpi
    let style = MapStyle {
        feature_width: 8.0,
        ..MapStyle::default()
    };
    let pixmap = draw_map(&config, &grid, &field, &style, None).unwrap();

    // Middle of the lake's western edge
    let lake = &config.features.lakes[0];
    let (x, y) = geo_pixel(&layout, &config, lake.lon_min, (lake.lat_min + lake.lat_max) / 2.0);
    let [r, g, b, _] = pixel(&pixmap, x, y);
    assert_eq!((r, g, b), (0, 0, 255));
}

#[test]
fn test_river_is_drawn_between_vertices() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let layout = layout_for(&config);
    let style = MapStyle {
        feature_width: 8.0,
        ..MapStyle::default()
    };
    let pixmap = draw_map(&config, &grid, &field, &style, None).unwrap();

    // Midpoint of the segment (1.5, 2.0) -> (3.5, 1.5)
    let river = &config.features.rivers[0];
    let (a, b) = (river.path[1], river.path[2]);
    let (x, y) = geo_pixel(&layout, &config, (a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
    let [r, g, b, _] = pixel(&pixmap, x, y);
    assert_eq!((r, g, b), (0, 0, 255));
}

#[test]
fn test_meridian_gridline_is_dashed() {
    let mut config = synthetic_region();
    config.map.dpi = 144;
    let (grid, field) = pipeline_inputs(&config);
    let layout = layout_for(&config);
    let style = MapStyle {
        gridline: renderer::Color::BLACK,
        gridline_width: 6.0,
        ..MapStyle::from_settings(&config.map)
    };
    let pixmap = draw_map(&config, &grid, &field, &style, None).unwrap();

    // The 3°E meridian over open water
    let (x, y_top) = geo_pixel(&layout, &config, 3.0, 1.3);
    let (_, y_bottom) = geo_pixel(&layout, &config, 3.0, 0.1);
    let mut dash = 0;
    let mut gap = 0;
    for y in y_top..y_bottom {
        let px = pixel(&pixmap, x, y);
        if px == [0, 0, 0, 255] {
            dash += 1;
        } else if px == expected_field_color(&config, &layout, &grid, &field, &style, x, y) {
            gap += 1;
        }
    }
    assert!(dash > 0, "no dash pixels on the meridian");
    assert!(gap > 0, "meridian is not dashed");
}

#[test]
fn test_mismatched_field_is_rejected() {
    let config = synthetic_region();
    let (grid, _) = pipeline_inputs(&config);
    let field = Field2D::from_vec(3, 3, vec![27.0; 9]).unwrap();
    assert!(draw_map(&config, &grid, &field, &MapStyle::default(), None).is_err());
}

#[test]
fn test_rendering_is_deterministic() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let a = draw_map(&config, &grid, &field, &MapStyle::default(), None).unwrap();
    let b = draw_map(&config, &grid, &field, &MapStyle::default(), None).unwrap();
    assert_eq!(a.data(), b.data());
}

// ============================================================================
// render_map tests
// ============================================================================

#[test]
fn test_render_map_writes_decodable_png() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let dir = temp_test_dir();
    let path = dir.path().join(config.image_file_name());

    let rendered = render_map(&config, &grid, &field, &MapStyle::default(), &path).unwrap();
    assert_eq!(rendered.path, path);
    assert_eq!((rendered.width_px, rendered.height_px), (280, 200));
    assert_eq!(rendered.dpi, 40);

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.width(), 280);
    assert_eq!(decoded.height(), 200);
}

#[test]
fn test_render_map_overwrites_existing_file() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let dir = temp_test_dir();
    let path = dir.path().join("map.png");
    std::fs::write(&path, b"stale").unwrap();

    render_map(&config, &grid, &field, &MapStyle::default(), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], &renderer::png::PNG_SIGNATURE);
}

#[test]
fn test_render_map_falls_back_from_unreadable_font() {
    let mut config = synthetic_region();
    config.map.font_path = Some("/nonexistent/label.ttf".into());
    let (grid, field) = pipeline_inputs(&config);
    let dir = temp_test_dir();
    let path = dir.path().join("map.png");

    let rendered = render_map(&config, &grid, &field, &MapStyle::default(), &path).unwrap();
    assert!(rendered.path.exists());

    // Same map with labels differs from the label-free raster
    let unlabelled = draw_map(&config, &grid, &field, &MapStyle::default(), None).unwrap();
    let decoded = image::open(&path).unwrap().to_rgb8();
    let differs = decoded
        .pixels()
        .zip(unlabelled.data().chunks_exact(4))
        .any(|(a, b)| a.0 != [b[0], b[1], b[2]]);
    assert!(differs, "labels were not drawn");
}

#[test]
fn test_render_map_fails_for_missing_directory() {
    let config = synthetic_region();
    let (grid, field) = pipeline_inputs(&config);
    let dir = temp_test_dir();
    let path = dir.path().join("missing").join("map.png");
    assert!(render_map(&config, &grid, &field, &MapStyle::default(), &path).is_err());
}
