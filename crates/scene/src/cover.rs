use foundation::bounds::close_ring;
use grid::{CellSet, Containment, cells_for_rings, compact, finest_resolution_within};

/// Cap on cells produced when covering a drawn shape.
pub const MAX_COVER_CELLS: f64 = 10_000.0;

/// How a drawn polygon is filled with cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CoverOptions {
    pub resolution: u8,
    /// Merge complete sibling groups into their parents.
    pub compact: bool,
    pub containment: Containment,
}

impl Default for CoverOptions {
    fn default() -> Self {
        Self {
            resolution: 0,
            compact: false,
            containment: Containment::Intersects,
        }
    }
}

/// Cells covering a user-drawn `[lon, lat]` ring.
///
/// The ring is closed if needed. Empty for rings with fewer than three
/// distinct vertices.
pub fn cover(ring: &[[f64; 2]], options: CoverOptions) -> CellSet {
    let ring = close_ring(ring);
    let cells = cells_for_rings(&[ring], options.resolution, options.containment);
    if !options.compact {
        return cells;
    }
    compact(&cells).into_iter().collect()
}

/// Finest resolution at which covering `ring` stays under
/// [`MAX_COVER_CELLS`] expected cells.
pub fn max_cover_resolution(ring: &[[f64; 2]]) -> u8 {
    let ring = close_ring(ring);
    finest_resolution_within(&[ring], grid::h3::MAX_RESOLUTION, MAX_COVER_CELLS)
}
