//! Color ramps and gradient rendering for gridded fields.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Land fill
    pub const WHITESMOKE: Color = Color::rgb(245, 245, 245);
    /// Ocean fill
    pub const LIGHTCYAN: Color = Color::rgb(224, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha scaled by `alpha` (0-1).
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Piecewise-linear color ramp over normalized positions 0..=1.
#[derive(Debug, Clone)]
pub struct Palette {
    stops: Vec<(f32, Color)>,
}

impl Palette {
    /// Build a palette from (position, color) stops sorted by position.
    ///
    /// Returns `None` when there are fewer than two stops or the positions
    /// are not increasing.
    pub fn new(stops: Vec<(f32, Color)>) -> Option<Self> {
        if stops.len() < 2 || stops.windows(2).any(|w| w[1].0 <= w[0].0) {
            return None;
        }
        Some(Self { stops })
    }

    /// Perceptually ordered dark-blue → purple → orange → yellow ramp for
    /// temperature ("thermal").
    pub fn thermal() -> Self {
        Self {
            stops: vec![
                (0.000, Color::rgb(4, 35, 51)),
                (0.125, Color::rgb(20, 47, 114)),
                (0.250, Color::rgb(64, 53, 154)),
                (0.375, Color::rgb(112, 70, 141)),
                (0.500, Color::rgb(158, 85, 129)),
                (0.625, Color::rgb(205, 99, 109)),
                (0.750, Color::rgb(240, 127, 79)),
                (0.875, Color::rgb(251, 177, 60)),
                (1.000, Color::rgb(232, 250, 91)),
            ],
        }
    }

    /// Color at a normalized position. Positions outside 0..=1 saturate to
    /// the end colors.
    pub fn color_at(&self, t: f32) -> Color {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if t.is_nan() || t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        for w in self.stops.windows(2) {
            let (p0, c0) = w[0];
            let (p1, c1) = w[1];
            if t <= p1 {
                return interpolate_color(c0, c1, (t - p0) / (p1 - p0));
            }
        }
        last.1
    }

    /// Color for a data value mapped onto `[vmin, vmax]`, clipped at both ends.
    pub fn color_for_value(&self, value: f64, vmin: f64, vmax: f64) -> Color {
        let range = vmax - vmin;
        let range = if range.abs() < 1e-12 { 1.0 } else { range };
        self.color_at(((value - vmin) / range) as f32)
    }
}

/// Render grid data as a gradient heatmap
///
/// # Arguments
/// - `data`: 2D grid of values (row-major order)
/// - `width`: Number of columns
/// - `height`: Number of rows
/// - `min_val`: Minimum value in the data (for scaling)
/// - `max_val`: Maximum value in the data (for scaling)
/// - `color_fn`: Function to convert a normalized value (0-1) to a color
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel)
pub fn render_grid<F>(
    data: &[f32],
    width: usize,
    height: usize,
    min_val: f32,
    max_val: f32,
    color_fn: F,
) -> Vec<u8>
where
    F: Fn(f32) -> Color,
{
    let mut pixels = vec![0u8; width * height * 4];

    let range = max_val - min_val;
    let range = if range.abs() < 0.001 { 1.0 } else { range };

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if idx < data.len() {
                let normalized = ((data[idx] - min_val) / range).clamp(0.0, 1.0);
                let color = color_fn(normalized);

                let pixel_idx = idx * 4;
                pixels[pixel_idx] = color.r;
                pixels[pixel_idx + 1] = color.g;
                pixels[pixel_idx + 2] = color.b;
                pixels[pixel_idx + 3] = color.a;
            }
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::rgb(0, 0, 0), Color::rgb(200, 100, 50), 0.5);
        assert_eq!(c, Color::rgb(100, 50, 25));
    }

    #[test]
    fn test_palette_rejects_unsorted_stops() {
        assert!(Palette::new(vec![(0.0, Color::BLACK)]).is_none());
        assert!(Palette::new(vec![(0.5, Color::BLACK), (0.2, Color::WHITE)]).is_none());
        assert!(Palette::new(vec![(0.0, Color::BLACK), (1.0, Color::WHITE)]).is_some());
    }

    #[test]
    fn test_thermal_is_monotonically_brighter() {
        let palette = Palette::thermal();
        let luminance = |c: Color| 0.299 * c.r as f32 + 0.587 * c.g as f32 + 0.114 * c.b as f32;
        let samples: Vec<f32> = (0..=10).map(|k| luminance(palette.color_at(k as f32 / 10.0))).collect();
        assert!(samples.windows(2).all(|w| w[1] >= w[0]));
    }
}
