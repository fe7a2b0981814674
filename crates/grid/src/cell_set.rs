use std::collections::HashSet;

use h3o::CellIndex;

/// Set of cells that remembers insertion order.
///
/// Membership is by 64-bit cell value. Equality ignores order.
///
/// Ordering contract:
/// - Iteration yields cells in the order they were first inserted, so lists
///   shown to the user stay stable as cells are added.
#[derive(Debug, Clone, Default)]
pub struct CellSet {
    order: Vec<CellIndex>,
    members: HashSet<CellIndex>,
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        self.members.contains(&cell)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Inserts `cell`. Returns `true` if the set changed.
    pub fn insert(&mut self, cell: CellIndex) -> bool {
        if !self.members.insert(cell) {
            return false;
        }
        self.order.push(cell);
        true
    }

    /// Removes `cell`. Returns `true` if the set changed.
    pub fn remove(&mut self, cell: CellIndex) -> bool {
        if !self.members.remove(&cell) {
            return false;
        }
        self.order.retain(|c| *c != cell);
        true
    }

    /// Iterates cells in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[CellIndex] {
        &self.order
    }

    /// Cells sorted by 64-bit value, for order-independent output.
    pub fn sorted(&self) -> Vec<CellIndex> {
        let mut cells = self.order.clone();
        cells.sort_unstable();
        cells
    }

    /// Canonical strings in insertion order.
    pub fn to_strings(&self) -> Vec<String> {
        self.order.iter().map(ToString::to_string).collect()
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.union_in_place(other);
        out
    }

    pub fn intersect(&self, other: &Self) -> Self {
        self.iter().filter(|c| other.contains(*c)).collect()
    }

    /// Set difference: `self \ other`.
    pub fn diff(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.diff_in_place(other);
        out
    }

    /// Adds every cell of `other`. Returns how many were new.
    pub fn union_in_place(&mut self, other: &Self) -> usize {
        other.iter().filter(|c| self.insert(*c)).count()
    }

    /// Removes every cell of `other`. Returns how many were present.
    pub fn diff_in_place(&mut self, other: &Self) -> usize {
        let before = self.len();
        self.members.retain(|c| !other.contains(*c));
        let members = &self.members;
        self.order.retain(|c| members.contains(c));
        before - self.len()
    }
}

impl PartialEq for CellSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for CellSet {}

impl FromIterator<CellIndex> for CellSet {
    fn from_iter<I: IntoIterator<Item = CellIndex>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl Extend<CellIndex> for CellSet {
    fn extend<I: IntoIterator<Item = CellIndex>>(&mut self, iter: I) {
        for cell in iter {
            self.insert(cell);
        }
    }
}

impl IntoIterator for CellSet {
    type Item = CellIndex;
    type IntoIter = std::vec::IntoIter<CellIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = CellIndex;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, CellIndex>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::CellSet;
    use h3o::CellIndex;
    use pretty_assertions::assert_eq;

    fn c(s: &str) -> CellIndex {
        s.parse().unwrap()
    }

    #[test]
    fn insert_remove_contains_and_len() {
        let mut s = CellSet::new();
        assert!(s.is_empty());
        assert!(s.insert(c("8a1fb46622dffff")));
        assert!(!s.insert(c("8a1fb46622dffff")));
        assert_eq!(s.len(), 1);
        assert!(s.contains(c("8a1fb46622dffff")));

        assert!(s.remove(c("8a1fb46622dffff")));
        assert!(!s.remove(c("8a1fb46622dffff")));
        assert!(s.is_empty());
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let s: CellSet = [c("8a1fb46622dffff"), c("8a1fb46622affff"), c("8a1fb46622dffff")]
            .into_iter()
            .collect();
        assert_eq!(s.to_strings(), vec!["8a1fb46622dffff", "8a1fb46622affff"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: CellSet = [c("8a1fb46622dffff"), c("8a1fb46622affff")].into_iter().collect();
        let b: CellSet = [c("8a1fb46622affff"), c("8a1fb46622dffff")].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn set_ops_union_intersect_diff() {
        let a: CellSet = [c("8a1fb46622dffff"), c("8a1fb46622affff")].into_iter().collect();
        let b: CellSet = [c("8a1fb46622affff"), c("851fb467fffffff")].into_iter().collect();

        assert_eq!(a.union(&b).len(), 3);
        assert_eq!(a.intersect(&b).to_strings(), vec!["8a1fb46622affff"]);
        assert_eq!(a.diff(&b).to_strings(), vec!["8a1fb46622dffff"]);

        let mut d = a.clone();
        assert_eq!(d.diff_in_place(&b), 1);
        assert_eq!(d.diff_in_place(&b), 0);
    }
}
