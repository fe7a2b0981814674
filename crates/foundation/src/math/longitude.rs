//! Longitude wrapping and antimeridian splitting.
//!
//! A Mercator map scrolled sideways reports longitudes outside `[-180, 180)`.
//! Grid libraries expect each polygon to stay on one side of the seams, so a
//! longitude range is cut at the antimeridian and at the prime meridian.

pub const LON_MIN: f64 = -180.0;
pub const LON_MAX: f64 = 180.0;

/// Wraps `value` into `[min, max)`.
pub fn wrap_to_range(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    (((value - min) % range) + range) % range + min
}

/// Wraps a longitude into `[-180, 180)`.
pub fn normalize_longitude(lon: f64) -> f64 {
    wrap_to_range(lon, LON_MIN, LON_MAX)
}

/// Splits `[min_lon, max_lon]` into non-wrapping sub-ranges.
///
/// Each emitted `[lon0, lon1]` lies within `[-180, 0]` or `[0, 180]`; their
/// union, modulo 360, is the input range. Ranges wider than a full turn are
/// clamped to one turn. `min_lon >= max_lon` (or a non-finite bound) yields an
/// empty result.
pub fn split_longitude_range(min_lon: f64, max_lon: f64) -> Vec<[f64; 2]> {
    let mut out = Vec::new();
    if !(min_lon.is_finite() && max_lon.is_finite()) {
        return out;
    }

    let max_lon = max_lon.min(min_lon + 360.0);
    let adjusted_max = normalize_longitude(max_lon);

    let mut cur = min_lon;
    while cur < max_lon {
        let normalized = normalize_longitude(cur);
        let next = if normalized < 0.0 { 0.0 } else { LON_MAX };
        // Same as `cur += next - normalized`, but lands exactly on the seam.
        let turns = ((cur - normalized) / 360.0).round();
        cur = turns * 360.0 + next;
        if cur > max_lon {
            out.push([normalized, adjusted_max]);
        } else {
            out.push([normalized, next]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{normalize_longitude, split_longitude_range, wrap_to_range};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn normalizes_into_half_open_range() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(540.0), -180.0);
        assert_eq!(wrap_to_range(7.0, 0.0, 5.0), 2.0);
    }

    #[test]
    fn range_inside_one_hemisphere_is_unchanged() {
        assert_eq!(split_longitude_range(10.0, 20.0), vec![[10.0, 20.0]]);
        assert_eq!(split_longitude_range(-20.0, -10.0), vec![[-20.0, -10.0]]);
    }

    #[test]
    fn crossing_the_prime_meridian_splits_once() {
        assert_eq!(
            split_longitude_range(-10.0, 10.0),
            vec![[-10.0, 0.0], [0.0, 10.0]]
        );
    }

    #[test]
    fn range_ending_on_a_seam_keeps_the_seam() {
        assert_eq!(split_longitude_range(-10.0, 0.0), vec![[-10.0, 0.0]]);
        assert_eq!(split_longitude_range(10.0, 180.0), vec![[10.0, 180.0]]);
    }

    #[test]
    fn crossing_the_antimeridian_eastward() {
        assert_eq!(
            split_longitude_range(170.0, 190.0),
            vec![[170.0, 180.0], [-180.0, -170.0]]
        );
    }

    #[test]
    fn crossing_the_antimeridian_westward() {
        assert_eq!(
            split_longitude_range(-200.0, -170.0),
            vec![[160.0, 180.0], [-180.0, -170.0]]
        );
    }

    #[test]
    fn crossing_two_seams() {
        assert_eq!(
            split_longitude_range(-30.0, 200.0),
            vec![[-30.0, 0.0], [0.0, 180.0], [-180.0, -160.0]]
        );
    }

    #[test]
    fn empty_or_inverted_ranges_produce_nothing() {
        assert!(split_longitude_range(5.0, 5.0).is_empty());
        assert!(split_longitude_range(6.0, 5.0).is_empty());
        assert!(split_longitude_range(f64::NAN, 5.0).is_empty());
    }

    #[test]
    fn wider_than_a_turn_is_clamped() {
        let parts = split_longitude_range(-300.0, 500.0);
        let total: f64 = parts.iter().map(|[a, b]| b - a).sum();
        assert!((total - 360.0).abs() < 1e-9, "total span {total}");
    }

    proptest! {
        #[test]
        fn pieces_never_cross_a_seam_and_preserve_span(
            min in -540.0f64..540.0,
            span in 0.001f64..359.0,
        ) {
            let max = min + span;
            let parts = split_longitude_range(min, max);
            prop_assert!(!parts.is_empty());
            prop_assert!(parts.len() <= 3);

            let mut total = 0.0;
            for [a, b] in &parts {
                prop_assert!(a <= b, "inverted piece [{a}, {b}]");
                let west = *a >= -180.0 && *b <= 0.0;
                let east = *a >= 0.0 && *b <= 180.0;
                prop_assert!(west || east, "piece [{a}, {b}] crosses a seam");
                total += b - a;
            }
            prop_assert!((total - span).abs() < 1e-6, "span {span} vs {total}");
        }
    }
}
