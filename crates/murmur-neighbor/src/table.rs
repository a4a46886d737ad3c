//! Flat per-species-pair neighbor matrices.

use rayon::prelude::*;

use crate::record::{fill_row, EscapeSet, NeighborRecord};
use crate::sort::sort_row;
use murmur_agent::AgentFrame;

/// Neighbor matrix for one ordered species pair (focal rows × other cols).
///
/// Storage is two flat `rows × cols` buffers: `raw` in insertion order and
/// `sorted` ascending by `dist2`.  For a same-species table the focal agent
/// appears in its own row; after sorting it is guaranteed to sit at index 0
/// (swapped to the front of the zero-distance prefix), and
/// [`sorted_view`][Self::sorted_view] skips it.
#[derive(Debug)]
pub struct NeighborTable {
    cols:         usize,
    same_species: bool,
    raw:          Vec<NeighborRecord>,
    sorted:       Vec<NeighborRecord>,
}

impl NeighborTable {
    pub fn new(rows: usize, cols: usize, same_species: bool) -> Self {
        NeighborTable {
            cols,
            same_species,
            raw: vec![NeighborRecord::default(); rows * cols],
            sorted: vec![NeighborRecord::default(); rows * cols],
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Rebuild the rows selected by `due` from this tick's frames, in
    /// parallel.  Rows not selected keep their previous contents (stale by
    /// at most one reaction time, as the cadence intends).
    pub fn refresh<F>(
        &mut self,
        focal: &[AgentFrame],
        others: &[AgentFrame],
        escape: &EscapeSet,
        due: F,
    ) where
        F: Fn(usize) -> bool + Sync,
    {
        if self.cols == 0 {
            return;
        }
        debug_assert_eq!(self.raw.len(), focal.len() * self.cols);
        let same_species = self.same_species;
        self.raw
            .par_chunks_mut(self.cols)
            .zip(self.sorted.par_chunks_mut(self.cols))
            .enumerate()
            .filter(|(i, _)| due(*i))
            .for_each(|(i, (raw_row, sorted_row))| {
                fill_row(&focal[i], others, escape, raw_row);
                sorted_row.copy_from_slice(raw_row);
                sort_row(sorted_row);
                if same_species {
                    promote_self(sorted_row, i as u32);
                }
            });
    }

    /// Full row in insertion order (same-species rows include the focal
    /// agent itself).
    #[inline]
    pub fn raw_view(&self, i: usize) -> &[NeighborRecord] {
        &self.raw[i * self.cols..(i + 1) * self.cols]
    }

    /// Row ascending by distance.  Same-species rows exclude the focal
    /// agent, so entry 0 is the nearest true neighbor.
    #[inline]
    pub fn sorted_view(&self, i: usize) -> &[NeighborRecord] {
        let row = &self.sorted[i * self.cols..(i + 1) * self.cols];
        if self.same_species && !row.is_empty() {
            &row[1..]
        } else {
            row
        }
    }
}

/// Move the focal agent's own record to the head of its sorted row.
///
/// Sorting alone leaves it anywhere inside the zero-distance prefix, which
/// may hold co-located neighbors too; a blind skip-first would then drop a
/// real neighbor instead of self.
fn promote_self(sorted_row: &mut [NeighborRecord], own_idx: u32) {
    for j in 0..sorted_row.len() {
        if sorted_row[j].dist2 > 0.0 {
            break;
        }
        if sorted_row[j].idx == own_idx {
            sorted_row.swap(0, j);
            return;
        }
    }
    debug_assert!(false, "focal agent missing from its own sorted row");
}
