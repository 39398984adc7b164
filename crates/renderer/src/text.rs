//! Text rendering onto a tiny-skia pixmap.
//!
//! Glyphs are rasterized with rusttype into a coverage mask, then blended
//! into the pixmap, optionally rotated a quarter turn for vertical labels.

use rusttype::{point, Font, Scale};
use sst_common::{AtlasError, AtlasResult};
use std::path::Path;
use tiny_skia::Pixmap;
use tracing::debug;
use usvg::fontdb;

use crate::gradient::Color;

/// Families tried, in order, when searching installed fonts
const PREFERRED_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
    "Noto Sans",
    "FreeSans",
];

/// Built-in fallback face
const EMBEDDED_FAMILY: &str = "Ubuntu-Light";

/// Regular and bold faces used for map labels.
#[derive(Clone)]
pub struct FontSet {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl FontSet {
    /// Load an explicit TrueType file, or search installed fonts when
    /// `path` is `None`. Without any installed sans-serif face the built-in
    /// font is used.
    pub fn load(path: Option<&Path>) -> AtlasResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_system().or_else(|e| {
                debug!(error = %e, "Using built-in label font");
                Self::embedded()
            }),
        }
    }

    /// The sans-serif face bundled with epaint, for both weights.
    pub fn embedded() -> AtlasResult<Self> {
        let definitions = epaint::text::FontDefinitions::default();
        let data = definitions
            .font_data
            .get(EMBEDDED_FAMILY)
            .or_else(|| definitions.font_data.values().next())
            .ok_or_else(|| AtlasError::Font("no built-in font data".to_string()))?;
        let font = Font::try_from_vec_and_index(data.font.to_vec(), data.index)
            .ok_or_else(|| AtlasError::Font("built-in font failed to parse".to_string()))?;
        Ok(Self {
            regular: font.clone(),
            bold: font,
        })
    }

    /// Use one font file for both faces.
    pub fn from_file(path: &Path) -> AtlasResult<Self> {
        let data = std::fs::read(path).map_err(|e| {
            AtlasError::Font(format!("cannot read {}: {}", path.display(), e))
        })?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| AtlasError::Font(format!("{} is not a TrueType font", path.display())))?;
        debug!(path = %path.display(), "Loaded label font from file");
        Ok(Self {
            regular: font.clone(),
            bold: font,
        })
    }

    /// Search the system font database for a sans-serif face.
    pub fn from_system() -> AtlasResult<Self> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let regular = query_face(&db, fontdb::Weight::NORMAL)
            .ok_or_else(|| AtlasError::Font("no sans-serif font installed".to_string()))?;
        let bold = query_face(&db, fontdb::Weight::BOLD).unwrap_or_else(|| regular.clone());
        debug!(faces = db.len(), "Loaded label fonts from system database");

        Ok(Self { regular, bold })
    }

    fn face(&self, bold: bool) -> &Font<'static> {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

fn query_face(db: &fontdb::Database, weight: fontdb::Weight) -> Option<Font<'static>> {
    let mut families: Vec<fontdb::Family> = PREFERRED_FAMILIES
        .iter()
        .copied()
        .map(fontdb::Family::Name)
        .collect();
    families.push(fontdb::Family::SansSerif);

    let id = db.query(&fontdb::Query {
        families: &families,
        weight,
        ..fontdb::Query::default()
    })?;
    db.with_face_data(id, |data, index| {
        Font::try_from_vec_and_index(data.to_vec(), index)
    })
    .flatten()
}

/// Horizontal anchor of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical anchor of a label. `Bottom` includes the descent, like a text
/// bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Size, weight and color of a label.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size_px: f32,
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size_px: f32, color: Color) -> Self {
        Self {
            size_px,
            bold: false,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Rasterized glyph coverage for one line of text.
struct TextMask {
    width: usize,
    height: usize,
    coverage: Vec<f32>,
}

fn rasterize(font: &Font<'static>, size_px: f32, text: &str) -> TextMask {
    let scale = Scale::uniform(size_px);
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    let width = glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
        .ceil()
        .max(0.0) as usize;
    let height = (v_metrics.ascent - v_metrics.descent).ceil().max(0.0) as usize;
    let mut coverage = vec![0.0f32; width * height];

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let x = gx as i32 + bb.min.x;
                let y = gy as i32 + bb.min.y;
                if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                    let idx = y as usize * width + x as usize;
                    coverage[idx] = (coverage[idx] + v).min(1.0);
                }
            });
        }
    }

    TextMask {
        width,
        height,
        coverage,
    }
}

/// Width and height in pixels of `text` set in `style`.
pub fn measure_text(fonts: &FontSet, text: &str, style: &TextStyle) -> (f32, f32) {
    let font = fonts.face(style.bold);
    let scale = Scale::uniform(style.size_px);
    let v_metrics = font.v_metrics(scale);
    let width = font
        .layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    (width, v_metrics.ascent - v_metrics.descent)
}

/// Draw horizontal text anchored at (x, y).
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    pixmap: &mut Pixmap,
    fonts: &FontSet,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
    halign: HAlign,
    valign: VAlign,
) {
    let mask = rasterize(fonts.face(style.bold), style.size_px, text);
    let (left, top) = anchor(mask.width as f32, mask.height as f32, x, y, halign, valign);
    blit(pixmap, &mask, left.round() as i32, top.round() as i32, style.color, false);
}

/// Draw text rotated 90° counter-clockwise (reading bottom to top),
/// centered on (x, y).
pub fn draw_text_vertical(
    pixmap: &mut Pixmap,
    fonts: &FontSet,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
) {
    let mask = rasterize(fonts.face(style.bold), style.size_px, text);
    // After rotation the mask height runs along x and its width along y
    let left = x - mask.height as f32 / 2.0;
    let top = y - mask.width as f32 / 2.0;
    blit(pixmap, &mask, left.round() as i32, top.round() as i32, style.color, true);
}

fn anchor(w: f32, h: f32, x: f32, y: f32, halign: HAlign, valign: VAlign) -> (f32, f32) {
    let left = match halign {
        HAlign::Left => x,
        HAlign::Center => x - w / 2.0,
        HAlign::Right => x - w,
    };
    let top = match valign {
        VAlign::Top => y,
        VAlign::Center => y - h / 2.0,
        VAlign::Bottom => y - h,
    };
    (left, top)
}

/// Blend a coverage mask into the pixmap with its top-left corner at
/// (left, top). Pixels outside the pixmap are skipped.
fn blit(pixmap: &mut Pixmap, mask: &TextMask, left: i32, top: i32, color: Color, rotate: bool) {
    let pw = pixmap.width() as i32;
    let ph = pixmap.height() as i32;
    let (out_w, out_h) = if rotate {
        (mask.height, mask.width)
    } else {
        (mask.width, mask.height)
    };
    let alpha = color.a as f32 / 255.0;
    let data = pixmap.data_mut();

    for oy in 0..out_h {
        let py = top + oy as i32;
        if py < 0 || py >= ph {
            continue;
        }
        for ox in 0..out_w {
            let px = left + ox as i32;
            if px < 0 || px >= pw {
                continue;
            }
            let (sx, sy) = if rotate {
                (mask.width - 1 - oy, ox)
            } else {
                (ox, oy)
            };
            let a = mask.coverage[sy * mask.width + sx] * alpha;
            if a <= 0.0 {
                continue;
            }
            let idx = (py as usize * pw as usize + px as usize) * 4;
            let src = [color.r, color.g, color.b, 255];
            for c in 0..4 {
                let dst = data[idx + c] as f32;
                data[idx + c] = (src[c] as f32 * a + dst * (1.0 - a)).round() as u8;
            }
        }
    }
}
