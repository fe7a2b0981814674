use std::collections::{BTreeMap, BTreeSet};

use h3o::CellIndex;
use tracing::debug;

use crate::cell_set::CellSet;
use crate::h3::{cell_resolution, clamped_resolution};

/// Minimal multi-resolution covering of `cells`.
///
/// A parent replaces its children only when every one of its children is
/// present (seven for hexagons, six for pentagons); merging repeats upward
/// until nothing changes. Cells already covered by an ancestor in the input
/// are dropped. Output is sorted by cell value.
///
/// Each resolution level goes through `h3o`'s compaction, finest first, so
/// parents produced at one level can complete a sibling group at the next.
pub fn compact(cells: &CellSet) -> Vec<CellIndex> {
    let input: BTreeSet<CellIndex> = cells.iter().collect();

    // h3o wants one resolution per call and no nested cells.
    let mut by_res: BTreeMap<u8, BTreeSet<CellIndex>> = BTreeMap::new();
    for cell in &input {
        if has_ancestor_in(*cell, &input) {
            continue;
        }
        by_res
            .entry(cell_resolution(*cell))
            .or_default()
            .insert(*cell);
    }

    let mut out = Vec::with_capacity(input.len());
    while let Some((res, level)) = by_res.pop_last() {
        let mut merged: Vec<CellIndex> = level.into_iter().collect();
        if let Err(err) = CellIndex::compact(&mut merged) {
            debug!(%err, res, "level left uncompacted");
        }
        for cell in merged {
            let r = cell_resolution(cell);
            if r < res {
                by_res.entry(r).or_default().insert(cell);
            } else {
                out.push(cell);
            }
        }
    }

    out.sort_unstable();
    out
}

fn has_ancestor_in(cell: CellIndex, set: &BTreeSet<CellIndex>) -> bool {
    let res = cell_resolution(cell);
    (0..res).any(|r| {
        cell.parent(clamped_resolution(r))
            .is_some_and(|p| set.contains(&p))
    })
}
