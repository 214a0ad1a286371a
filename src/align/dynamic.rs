//! Banded dynamic-programming fill of the similarity matrix.
//!
//! Fills `m[i][j] = max(feasible predecessor + edge weight)` inside a
//! diagonal corridor around the expected offset. End gaps are free: the
//! first row and column inside the band start at 0, so the matrix scores
//! overlap alignments rather than forcing end-to-end coverage. Everything
//! outside the corridor keeps the `BAND_LIMIT` sentinel for traceback to
//! detect.

use super::matrix::{SimilarityMatrix, BAND_LIMIT};
use crate::params::AlignParams;

/// Band geometry on the `j - i` diagonal of the matrix.
#[derive(Debug, Clone, Copy)]
pub struct BandParams {
    /// Center of the corridor on the `j - i` diagonal. Ignored unless
    /// `use_offset` is set.
    pub expected_offset: i32,
    /// Corridor width towards smaller diagonals.
    pub leftband: usize,
    /// Corridor width towards larger diagonals.
    pub rightband: usize,
    /// When false the whole matrix is computed (no band).
    pub use_offset: bool,
}

impl BandParams {
    /// Full-matrix fill, no banding.
    pub fn unbanded() -> Self {
        Self {
            expected_offset: 0,
            leftband: 0,
            rightband: 0,
            use_offset: false,
        }
    }

    pub fn banded(expected_offset: i32, leftband: usize, rightband: usize) -> Self {
        Self {
            expected_offset,
            leftband,
            rightband,
            use_offset: true,
        }
    }

    /// Column range `[lo, hi]` computed for row `i`, clamped to the matrix.
    #[inline]
    fn columns_for_row(&self, i: usize, len2: usize) -> (usize, usize) {
        if !self.use_offset {
            return (0, len2);
        }
        let center = i as i64 + self.expected_offset as i64;
        let lo = (center - self.leftband as i64).max(0) as usize;
        let hi = (center + self.rightband as i64).min(len2 as i64);
        if hi < 0 {
            (1, 0) // empty
        } else {
            (lo, hi as usize)
        }
    }
}

/// Fills the similarity matrix for one sequence pair within a band.
pub struct DynamicAligner;

impl DynamicAligner {
    /// Fill `matrix` for `seq1` x `seq2`. The matrix is reset to the pair's
    /// dimensions first; cells outside the band remain `BAND_LIMIT`.
    pub fn fill(
        matrix: &mut SimilarityMatrix,
        seq1: &[u8],
        seq2: &[u8],
        params: &AlignParams,
        band: &BandParams,
    ) {
        let len1 = seq1.len();
        let len2 = seq2.len();
        matrix.reset(len1, len2);

        let gap = params.gap_weight();

        // Row 0: free leading gaps in seq1.
        let (lo0, hi0) = band.columns_for_row(0, len2);
        if lo0 <= hi0 {
            for j in lo0..=hi0 {
                matrix.set(0, j, 0);
            }
        }

        for i in 1..=len1 {
            let (lo, hi) = band.columns_for_row(i, len2);
            if lo > hi {
                continue;
            }
            for j in lo..=hi {
                if j == 0 {
                    // Column 0: free leading gaps in seq2.
                    matrix.set(i, 0, 0);
                    continue;
                }
                let mut best = BAND_LIMIT;
                let d = matrix.get(i - 1, j - 1);
                if d != BAND_LIMIT {
                    best = best.max(d + params.diag_weight(seq1[i - 1], seq2[j - 1]));
                }
                let u = matrix.get(i - 1, j);
                if u != BAND_LIMIT {
                    best = best.max(u + gap);
                }
                let l = matrix.get(i, j - 1);
                if l != BAND_LIMIT {
                    best = best.max(l + gap);
                }
                if best != BAND_LIMIT {
                    matrix.set(i, j, best);
                }
            }
        }
    }
}
