//! Test helpers shared across the atlas crates: region fixtures, scratch
//! directories and tolerance assertions.

pub mod fixtures;
pub mod paths;

pub use fixtures::*;
pub use paths::*;

/// Assert two numbers are within `eps` of each other.
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $eps:expr) => {{
        let (actual, expected, eps) = ($actual as f64, $expected as f64, $eps as f64);
        assert!(
            (actual - expected).abs() <= eps,
            "expected {} ± {}, got {} (off by {})",
            expected,
            eps,
            actual,
            (actual - expected).abs()
        );
    }};
}

/// Assert a `(lon, lat)` pair matches within `eps` on both axes.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($lon:expr, $lat:expr), ($want_lon:expr, $want_lat:expr), $eps:expr) => {{
        $crate::assert_approx_eq!($lon, $want_lon, $eps);
        $crate::assert_approx_eq!($lat, $want_lat, $eps);
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_within_tolerance() {
        assert_approx_eq!(27.0004, 27.0, 1e-3);
        assert_approx_eq!(-82.0, -82.000001_f32, 1e-4);
        assert_coords_approx_eq!((-86.2419, 12.1364), (-86.242, 12.136), 1e-3);
    }

    #[test]
    #[should_panic(expected = "expected 30 ± 0.01")]
    fn test_outside_tolerance_panics() {
        assert_approx_eq!(30.5, 30.0, 0.01);
    }
}
