/// WGS84 semi-major axis (meters). Also the sphere radius used for areas.
pub const WGS84_A: f64 = 6_378_137.0;

/// Approximate area of a closed `[lon, lat]` ring on a sphere of radius
/// [`WGS84_A`], in square meters.
///
/// Chamberlain & Duquette, "Some Algorithms for Polygons on a Sphere" (JPL
/// 2007). Orientation is ignored; rings with fewer than three vertices have no
/// area.
pub fn ring_area_m2(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    if n <= 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        let lower = ring[i];
        let middle = ring[(i + 1) % n];
        let upper = ring[(i + 2) % n];
        total += (upper[0].to_radians() - lower[0].to_radians()) * middle[1].to_radians().sin();
    }
    (total * WGS84_A * WGS84_A / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::{WGS84_A, ring_area_m2};

    fn assert_close_rel(a: f64, b: f64, rel: f64) {
        let diff = (a - b).abs();
        assert!(diff <= rel * b.abs(), "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn one_degree_square_at_equator() {
        let ring = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]];
        let expected = WGS84_A * WGS84_A * 1f64.to_radians() * 1f64.to_radians().sin();
        assert_close_rel(ring_area_m2(&ring), expected, 1e-9);
    }

    #[test]
    fn orientation_does_not_matter() {
        let ccw = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]];
        let cw = [[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0], [0.0, 0.0]];
        assert_close_rel(ring_area_m2(&ccw), ring_area_m2(&cw), 1e-12);
    }

    #[test]
    fn degenerate_rings_have_no_area() {
        assert_eq!(ring_area_m2(&[]), 0.0);
        assert_eq!(ring_area_m2(&[[0.0, 0.0], [1.0, 1.0]]), 0.0);
    }
}
