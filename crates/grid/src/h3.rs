//! Thin adapter over `h3o`.
//!
//! Everything the rest of the workspace needs from the grid library goes
//! through here: polygon tiling, cell centers, resolutions and packing of
//! 32-bit halves.

use geo::{LineString, Polygon};
use h3o::geom::{ContainmentMode, TilerBuilder};
use h3o::{CellIndex, LatLng, Resolution};
use thiserror::Error;

use foundation::bounds::GeoPoint;

use crate::enumerate::Containment;

/// Finest resolution of the scheme.
pub const MAX_RESOLUTION: u8 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("resolution {0} is outside 0..=15")]
    InvalidResolution(u8),
    #[error("ring has {0} vertices, a closed polygon needs at least 4")]
    RingTooShort(usize),
    #[error("ring contains a non-finite coordinate")]
    NonFiniteCoordinate,
    #[error("polygon rejected by tiler: {0}")]
    Geometry(String),
}

pub fn resolution(r: u8) -> Result<Resolution, GridError> {
    Resolution::try_from(r).map_err(|_| GridError::InvalidResolution(r))
}

/// Resolution clamped into the valid range.
pub fn clamped_resolution(r: u8) -> Resolution {
    Resolution::try_from(r.min(MAX_RESOLUTION)).unwrap_or(Resolution::Zero)
}

pub fn cell_resolution(cell: CellIndex) -> u8 {
    u8::from(cell.resolution())
}

pub fn cell_center(cell: CellIndex) -> GeoPoint {
    let ll = LatLng::from(cell);
    GeoPoint::new(ll.lat(), ll.lng())
}

/// Parses a canonical cell string (hexadecimal, e.g. `8a1fb46622dffff`).
pub fn parse_cell(s: &str) -> Option<CellIndex> {
    s.parse::<CellIndex>().ok()
}

/// Packs the low and high 32-bit halves of a cell index.
///
/// `None` when the packed value is not a valid cell.
pub fn cell_from_halves(low: u32, high: u32) -> Option<CellIndex> {
    let bits = (u64::from(high) << 32) | u64::from(low);
    CellIndex::try_from(bits).ok()
}

/// Average area of a hexagon at `r`, in square meters.
pub fn average_cell_area_m2(r: u8) -> f64 {
    clamped_resolution(r).area_m2()
}

impl From<Containment> for ContainmentMode {
    fn from(c: Containment) -> Self {
        match c {
            Containment::Centroid => ContainmentMode::ContainsCentroid,
            Containment::Intersects => ContainmentMode::IntersectsBoundary,
            Containment::Covers => ContainmentMode::Covers,
        }
    }
}

/// Cells of resolution `r` selected from a closed `[lon, lat]` degree ring.
pub fn cells_for_ring(
    ring: &[[f64; 2]],
    r: u8,
    containment: Containment,
) -> Result<Vec<CellIndex>, GridError> {
    let res = resolution(r)?;
    if ring.len() < 4 {
        return Err(GridError::RingTooShort(ring.len()));
    }
    if ring.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GridError::NonFiniteCoordinate);
    }

    let exterior: LineString<f64> = ring.iter().map(|p| (p[0], p[1])).collect();
    let polygon = Polygon::new(exterior, Vec::new());

    let mut tiler = TilerBuilder::new(res)
        .containment_mode(containment.into())
        .build();
    tiler
        .add(polygon)
        .map_err(|err| GridError::Geometry(err.to_string()))?;
    Ok(tiler.into_coverage().collect())
}
