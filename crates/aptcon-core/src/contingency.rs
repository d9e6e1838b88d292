//! Contingency table builder: per-block element counts into a binned
//! co-occurrence matrix for one unordered element pair.

use crate::accumulate::BlockSet;
use crate::types::Matrix;

/// Build the experimental matrix for elements `(a, b)` with `a < b`.
///
/// Cell `[i, j]` counts blocks whose element-`a` count bins to `i` and
/// element-`b` count bins to `j` (bin index = count / bin_size). With
/// `rows = ceil((block_size + 1) / bin_size)` and counts bounded by the
/// block size, every bin index is in range.
pub fn experimental_matrix(
    blocks: &BlockSet,
    a: usize,
    b: usize,
    bin_size: u32,
    rows: usize,
) -> Matrix<u64> {
    debug_assert!(a < b && b < blocks.num_elements);
    let mut matrix = Matrix::new(rows);
    for block in &blocks.blocks {
        let bin_a = (block.counts[a] / bin_size) as usize;
        let bin_b = (block.counts[b] / bin_size) as usize;
        matrix.bump(bin_a, bin_b);
    }
    matrix
}

/// Unordered element pairs `(a, b)` with `a < b`, in axis order.
pub fn element_pairs(num_elements: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for a in 0..num_elements {
        for b in (a + 1)..num_elements {
            pairs.push((a, b));
        }
    }
    pairs
}
