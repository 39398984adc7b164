//! Tick placement and degree label formatting.

/// Evenly spaced "nice" values covering `[min, max]`.
///
/// The step is 1, 2, 2.5 or 5 times a power of ten, chosen so that roughly
/// `target` intervals span the range. Only ticks inside the range
/// (with a small tolerance) are returned.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) || target == 0 {
        return Vec::new();
    }

    let step = nice_step((max - min) / target as f64);
    let eps = step * 1e-9;
    let first = ((min - eps) / step).ceil() as i64;
    let last = ((max + eps) / step).floor() as i64;

    (first..=last)
        .map(|k| {
            // Snap away floating noise such as 0.30000000000000004
            let v = (k as f64 * step * 1e9).round() / 1e9;
            if v == 0.0 {
                0.0
            } else {
                v
            }
        })
        .collect()
}

/// Round a raw step up to 1, 2, 2.5, 5 or 10 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|&n| norm <= n + 1e-9)
        .unwrap_or(10.0);
    (nice * mag * 1e12).round() / 1e12
}

/// Format a longitude as `87°W`, `12.5°E` or `0°`.
pub fn format_lon(lon: f64) -> String {
    format_degrees(lon, 'E', 'W')
}

/// Format a latitude as `12°N`, `3.5°S` or `0°`.
pub fn format_lat(lat: f64) -> String {
    format_degrees(lat, 'N', 'S')
}

fn format_degrees(value: f64, positive: char, negative: char) -> String {
    if value.abs() < 1e-9 {
        return "0°".to_string();
    }
    let hemisphere = if value < 0.0 { negative } else { positive };
    format!("{}°{}", trim_number(value.abs()), hemisphere)
}

/// Format a tick value with the fewest decimals (at least one) that
/// represent `step` exactly.
pub fn format_tick_value(value: f64, step: f64) -> String {
    let decimals = (1..=4)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(4) as usize;
    let value = if value.abs() < 1e-12 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}

fn trim_number(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}
