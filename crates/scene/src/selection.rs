use foundation::bounds::GeoPoint;
use foundation::math::Viewport;
use grid::{CellIndex, CellSet, cell_center, cell_resolution, zoom_for_resolution};

/// The user's highlighted cells.
///
/// Every mutation is idempotent and reports whether anything changed, so
/// callers only publish real changes.
///
/// Ordering contract:
/// - Cells iterate in the order they were first selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    cells: CellSet,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        self.cells.contains(cell)
    }

    /// Replaces the whole selection. Returns `true` if it changed.
    pub fn replace(&mut self, cells: CellSet) -> bool {
        if self.cells == cells {
            // Same members; still adopt the new display order.
            self.cells = cells;
            return false;
        }
        self.cells = cells;
        true
    }

    /// Union. Returns how many cells were new.
    pub fn add(&mut self, cells: impl IntoIterator<Item = CellIndex>) -> usize {
        cells.into_iter().filter(|c| self.cells.insert(*c)).count()
    }

    /// Difference. Returns how many cells were removed.
    pub fn remove(&mut self, cells: impl IntoIterator<Item = CellIndex>) -> usize {
        cells.into_iter().filter(|c| self.cells.remove(*c)).count()
    }

    /// Returns `true` if anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.cells.is_empty();
        self.cells.clear();
        changed
    }

    /// Flips membership of one cell. Returns `true` if it is now selected.
    pub fn toggle(&mut self, cell: CellIndex) -> bool {
        if self.cells.remove(cell) {
            return false;
        }
        self.cells.insert(cell);
        true
    }

    /// Click on a background cell.
    ///
    /// With `extend` the cell joins the current selection; without it the
    /// cell becomes the whole selection. Returns `true` if anything changed.
    pub fn click(&mut self, cell: CellIndex, extend: bool) -> bool {
        if extend {
            return self.cells.insert(cell);
        }
        let mut only = CellSet::with_capacity(1);
        only.insert(cell);
        self.replace(only)
    }

    /// Arithmetic mean of the selected cells' centers.
    ///
    /// A planar mean, good enough for recentring the camera. `None` when
    /// nothing is selected.
    pub fn centroid(&self) -> Option<GeoPoint> {
        if self.cells.is_empty() {
            return None;
        }
        let n = self.cells.len() as f64;
        let (lat, lon) = self
            .cells
            .iter()
            .map(cell_center)
            .fold((0.0, 0.0), |(lat, lon), p| (lat + p.lat, lon + p.lon));
        Some(GeoPoint::new(lat / n, lon / n))
    }

    /// Coarsest resolution among the selected cells.
    pub fn min_resolution(&self) -> Option<u8> {
        self.cells.iter().map(cell_resolution).min()
    }

    /// `viewport` moved onto the selection, zoomed so its coarsest cells
    /// show at their own resolution. `None` when nothing is selected.
    pub fn recentre(&self, viewport: &Viewport) -> Option<Viewport> {
        let center = self.centroid()?;
        let zoom = zoom_for_resolution(self.min_resolution()?);
        Some(viewport.recentred(center, zoom))
    }

    /// Canonical strings in selection order, for the text widget.
    pub fn display_strings(&self) -> Vec<String> {
        self.cells.to_strings()
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionState;
    use foundation::math::Viewport;
    use grid::{CellIndex, CellSet};
    use pretty_assertions::assert_eq;

    const A: &str = "8a1fb46622dffff";
    const B: &str = "8a1fb46622affff";
    const PARENT: &str = "851fb467fffffff";

    fn c(s: &str) -> CellIndex {
        s.parse().unwrap()
    }

    #[test]
    fn add_is_idempotent() {
        let mut once = SelectionState::new();
        once.add([c(A), c(B)]);

        let mut twice = SelectionState::new();
        assert_eq!(twice.add([c(A), c(B)]), 2);
        assert_eq!(twice.add([c(A), c(B)]), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_undoes_add() {
        let mut s = SelectionState::new();
        s.add([c(A)]);
        let before = s.clone();

        s.add([c(B)]);
        assert_eq!(s.remove([c(B)]), 1);
        assert_eq!(s, before);
        assert_eq!(s.remove([c(B)]), 0);
    }

    #[test]
    fn replace_and_clear() {
        let mut s = SelectionState::new();
        let set: CellSet = [c(A), c(B)].into_iter().collect();
        assert!(s.replace(set.clone()));
        assert!(!s.replace(set));
        assert_eq!(s.len(), 2);
        assert!(s.clear());
        assert!(!s.clear());
        assert!(s.is_empty());
    }

    #[test]
    fn click_without_extend_replaces() {
        let mut s = SelectionState::new();
        s.add([c(A)]);
        assert!(s.click(c(B), false));
        assert_eq!(s.display_strings(), vec![B]);
        assert!(!s.click(c(B), false));
        assert_eq!(s.display_strings(), vec![B]);
    }

    #[test]
    fn click_with_extend_adds() {
        let mut s = SelectionState::new();
        s.click(c(A), true);
        s.click(c(B), true);
        assert_eq!(s.display_strings(), vec![A, B]);
        assert!(!s.click(c(A), true));
        assert_eq!(s.display_strings(), vec![A, B]);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut s = SelectionState::new();
        assert!(s.toggle(c(A)));
        assert!(!s.toggle(c(A)));
        assert!(s.is_empty());
    }

    #[test]
    fn derived_queries_on_empty_selection() {
        let s = SelectionState::new();
        assert_eq!(s.centroid(), None);
        assert_eq!(s.min_resolution(), None);
        assert_eq!(s.recentre(&Viewport::new(0.0, 0.0, 2.0, 800.0, 600.0)), None);
    }

    #[test]
    fn centroid_is_mean_of_centers() {
        let mut s = SelectionState::new();
        s.add([c(A), c(B)]);
        let pa = grid::cell_center(c(A));
        let pb = grid::cell_center(c(B));
        let got = s.centroid().unwrap();
        assert!((got.lat - (pa.lat + pb.lat) / 2.0).abs() < 1e-12);
        assert!((got.lon - (pa.lon + pb.lon) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn recentre_uses_coarsest_resolution() {
        let mut s = SelectionState::new();
        s.add([c(A), c(PARENT)]);
        assert_eq!(s.min_resolution(), Some(5));

        let vp = Viewport::new(0.0, 0.0, 2.0, 800.0, 600.0);
        let moved = s.recentre(&vp).unwrap();
        // Resolution 5 first appears at zoom 7.
        assert_eq!(moved.zoom, 7.0);
        assert_eq!(moved.width, 800.0);
        let center = s.centroid().unwrap();
        assert_eq!((moved.latitude, moved.longitude), (center.lat, center.lon));
    }
}
