use serde::{Deserialize, Serialize};

use crate::math::split_longitude_range;

/// Closed ring of `[lon, lat]` vertices in degrees (first == last).
pub type Ring = Vec<[f64; 2]>;

/// A geographic point in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic bounding rectangle in degrees.
///
/// `min_lon`/`max_lon` are not normalized: a viewport that scrolls past the
/// antimeridian produces e.g. `max_lon = 190.0`. Use
/// [`GeoBounds::split_at_antimeridian`] to get non-wrapping pieces.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Smallest bounds containing every point; `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = GeoPoint>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut b = Self::new(first.lat, first.lon, first.lat, first.lon);
        for p in points {
            b.min_lat = b.min_lat.min(p.lat);
            b.max_lat = b.max_lat.max(p.lat);
            b.min_lon = b.min_lon.min(p.lon);
            b.max_lon = b.max_lon.max(p.lon);
        }
        Some(b)
    }

    /// True when the rectangle has no area (zero-size viewport).
    pub fn is_degenerate(&self) -> bool {
        !(self.max_lat > self.min_lat && self.max_lon > self.min_lon)
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn with_lon_range(&self, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lon,
            max_lon,
            ..*self
        }
    }

    /// Splits the longitude range into pieces that never cross a seam.
    ///
    /// Every piece shares this rectangle's latitude range. Empty when the
    /// longitude range is empty.
    pub fn split_at_antimeridian(&self) -> Vec<GeoBounds> {
        split_longitude_range(self.min_lon, self.max_lon)
            .into_iter()
            .map(|[lon0, lon1]| self.with_lon_range(lon0, lon1))
            .collect()
    }

    /// Rectangle as a closed 5-vertex ring, counter-clockwise from the
    /// south-west corner.
    pub fn to_ring(&self) -> Ring {
        vec![
            [self.min_lon, self.min_lat],
            [self.max_lon, self.min_lat],
            [self.max_lon, self.max_lat],
            [self.min_lon, self.max_lat],
            [self.min_lon, self.min_lat],
        ]
    }

    /// Inclusive containment, with `margin_deg` of slack on every side.
    ///
    /// No longitude wrapping is applied.
    pub fn contains_with_margin(&self, p: GeoPoint, margin_deg: f64) -> bool {
        p.lat >= self.min_lat - margin_deg
            && p.lat <= self.max_lat + margin_deg
            && p.lon >= self.min_lon - margin_deg
            && p.lon <= self.max_lon + margin_deg
    }
}

/// Returns `ring` closed (first vertex repeated at the end), dropping
/// non-finite vertices.
pub fn close_ring(ring: &[[f64; 2]]) -> Ring {
    let mut out: Ring = ring
        .iter()
        .copied()
        .filter(|p| p[0].is_finite() && p[1].is_finite())
        .collect();
    if let (Some(first), Some(last)) = (out.first().copied(), out.last().copied())
        && first != last
    {
        out.push(first);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, GeoPoint, close_ring};
    use pretty_assertions::assert_eq;

    #[test]
    fn ring_is_closed_rectangle() {
        let b = GeoBounds::new(-1.0, -2.0, 1.0, 2.0);
        let ring = b.to_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring[2], [2.0, 1.0]);
    }

    #[test]
    fn zero_size_is_degenerate() {
        assert!(GeoBounds::new(10.0, 20.0, 10.0, 20.0).is_degenerate());
        assert!(GeoBounds::new(10.0, 20.0, 11.0, 20.0).is_degenerate());
        assert!(!GeoBounds::new(10.0, 20.0, 11.0, 21.0).is_degenerate());
    }

    #[test]
    fn split_keeps_latitudes() {
        let b = GeoBounds::new(-5.0, 170.0, 5.0, 190.0);
        let parts = b.split_at_antimeridian();
        assert_eq!(
            parts,
            vec![
                GeoBounds::new(-5.0, 170.0, 5.0, 180.0),
                GeoBounds::new(-5.0, -180.0, 5.0, -170.0),
            ]
        );
    }

    #[test]
    fn enclosing_points() {
        let b = GeoBounds::enclosing([
            GeoPoint::new(1.0, 5.0),
            GeoPoint::new(-3.0, 2.0),
            GeoPoint::new(0.0, 9.0),
        ])
        .unwrap();
        assert_eq!(b, GeoBounds::new(-3.0, 2.0, 1.0, 9.0));
        assert!(GeoBounds::enclosing([]).is_none());
    }

    #[test]
    fn close_ring_appends_first_vertex() {
        let ring = close_ring(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        assert_eq!(ring, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);

        let closed = close_ring(&ring);
        assert_eq!(closed, ring);

        let dirty = close_ring(&[[0.0, 0.0], [f64::NAN, 1.0], [1.0, 1.0]]);
        assert_eq!(dirty, vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn margin_containment() {
        let b = GeoBounds::new(0.0, 0.0, 1.0, 1.0);
        assert!(b.contains_with_margin(GeoPoint::new(0.5, 0.5), 0.0));
        assert!(!b.contains_with_margin(GeoPoint::new(1.05, 0.5), 0.0));
        assert!(b.contains_with_margin(GeoPoint::new(1.05, 0.5), 0.1));
    }
}
