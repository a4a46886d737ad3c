//! Distance sorting of neighbor rows.
//!
//! Rows are sorted ascending by `dist2`.  Long rows go through a stable
//! byte-wise LSD radix sort on the key's bit pattern (valid because squared
//! distances are non-negative f32s, whose bits order like the values); short
//! rows use the stable comparison sort, which is faster below the cutoff.
//! Both produce identical orderings.

use crate::record::NeighborRecord;

/// Row length at which radix beats the comparison sort.
const RADIX_CUTOFF: usize = 64;

/// Sort one row ascending by `dist2`, picking the strategy by length.
pub fn sort_row(row: &mut [NeighborRecord]) {
    if row.len() <= RADIX_CUTOFF {
        comparison_sort(row);
    } else {
        radix_sort(row);
    }
}

/// Stable comparison sort on `dist2`.
pub fn comparison_sort(row: &mut [NeighborRecord]) {
    row.sort_by(|a, b| a.dist2.total_cmp(&b.dist2));
}

/// Stable LSD radix sort on the bit pattern of `dist2`, 4 passes of 8 bits.
pub fn radix_sort(row: &mut [NeighborRecord]) {
    let mut scratch = vec![NeighborRecord::default(); row.len()];
    for shift in [0u32, 8, 16, 24] {
        let mut counts = [0usize; 256];
        for r in row.iter() {
            counts[byte_of(r, shift)] += 1;
        }
        if counts.iter().any(|&c| c == row.len()) {
            continue; // single bucket, pass is a no-op
        }
        let mut offset = 0;
        for c in counts.iter_mut() {
            let n = *c;
            *c = offset;
            offset += n;
        }
        for r in row.iter() {
            let b = byte_of(r, shift);
            scratch[counts[b]] = *r;
            counts[b] += 1;
        }
        row.copy_from_slice(&scratch);
    }
}

#[inline]
fn byte_of(r: &NeighborRecord, shift: u32) -> usize {
    ((r.dist2.to_bits() >> shift) & 0xff) as usize
}
