use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use foundation::math::ring_area_m2;

use crate::cell_set::CellSet;
use crate::h3;

/// Which cells count as "inside" a polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Containment {
    /// Cell center inside the polygon.
    Centroid,
    /// Cell boundary touches or overlaps the polygon.
    #[default]
    Intersects,
    /// Like `Intersects`, and always at least one cell for tiny polygons.
    Covers,
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Containment::Centroid => "centroid",
            Containment::Intersects => "intersects",
            Containment::Covers => "covers",
        };
        write!(f, "{value}")
    }
}

impl FromStr for Containment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "centroid" | "center" => Ok(Self::Centroid),
            "intersects" => Ok(Self::Intersects),
            "covers" => Ok(Self::Covers),
            other => Err(format!("unknown containment mode: {other}")),
        }
    }
}

/// Deduplicated cells of `resolution` covering every ring.
///
/// Rings are tiled in input order; a cell produced by several rings (one that
/// straddles a seam) is kept once, at its first position. Rings the grid
/// library rejects contribute nothing.
pub fn cells_for_rings<R: AsRef<[[f64; 2]]>>(
    rings: &[R],
    resolution: u8,
    containment: Containment,
) -> CellSet {
    let mut out = CellSet::new();
    for ring in rings {
        match h3::cells_for_ring(ring.as_ref(), resolution, containment) {
            Ok(cells) => out.extend(cells),
            Err(err) => debug!(%err, resolution, "ring skipped"),
        }
    }
    out
}

/// Expected number of hexagons of `resolution` needed to tile the rings.
pub fn estimated_cell_count<R: AsRef<[[f64; 2]]>>(rings: &[R], resolution: u8) -> f64 {
    let area: f64 = rings.iter().map(|r| ring_area_m2(r.as_ref())).sum();
    area / h3::average_cell_area_m2(resolution)
}

/// Finest resolution, at most `resolution`, whose estimated cell count for
/// the rings stays within `max_cells`.
pub fn finest_resolution_within<R: AsRef<[[f64; 2]]>>(
    rings: &[R],
    resolution: u8,
    max_cells: f64,
) -> u8 {
    let mut r = resolution.min(h3::MAX_RESOLUTION);
    while r > 0 && estimated_cell_count(rings, r) > max_cells {
        r -= 1;
    }
    r
}
