//! Similarity matrix for banded pairwise alignment.
//!
//! The matrix is a flat row-major buffer of `(len1+1) * (len2+1)` scores.
//! Cells never touched by the banded fill carry the `BAND_LIMIT` sentinel;
//! traceback treats a sentinel-adjacent cell as "ran into the band edge"
//! and aborts so the caller can retry with a wider band.

/// Sentinel for cells outside the computed band. Low enough that no real
/// score can reach it, high enough that adding an edge weight cannot wrap.
pub const BAND_LIMIT: i32 = i32::MIN / 4;

/// Flat row-major score matrix, reusable across sequence pairs.
pub struct SimilarityMatrix {
    data: Vec<i32>,
    len1: usize,
    len2: usize,
}

impl SimilarityMatrix {
    pub fn new(len1: usize, len2: usize) -> Self {
        Self {
            data: vec![BAND_LIMIT; (len1 + 1) * (len2 + 1)],
            len1,
            len2,
        }
    }

    /// Resize for a new sequence pair and reset every cell to `BAND_LIMIT`.
    /// Keeps the allocation when the new pair is not larger.
    pub fn reset(&mut self, len1: usize, len2: usize) {
        self.len1 = len1;
        self.len2 = len2;
        let needed = (len1 + 1) * (len2 + 1);
        self.data.clear();
        self.data.resize(needed, BAND_LIMIT);
    }

    pub fn len1(&self) -> usize {
        self.len1
    }

    pub fn len2(&self) -> usize {
        self.len2
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        debug_assert!(i <= self.len1 && j <= self.len2);
        self.data[i * (self.len2 + 1) + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: i32) {
        debug_assert!(i <= self.len1 && j <= self.len2);
        self.data[i * (self.len2 + 1) + j] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_matrix_is_all_sentinel() {
        let m = SimilarityMatrix::new(3, 4);
        for i in 0..=3 {
            for j in 0..=4 {
                assert_eq!(m.get(i, j), BAND_LIMIT);
            }
        }
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut m = SimilarityMatrix::new(5, 5);
        m.set(2, 3, 42);
        assert_eq!(m.get(2, 3), 42);
        assert_eq!(m.get(3, 2), BAND_LIMIT);
    }

    #[test]
    fn test_reset_resizes_and_clears() {
        let mut m = SimilarityMatrix::new(2, 2);
        m.set(1, 1, 7);
        m.reset(4, 3);
        assert_eq!(m.len1(), 4);
        assert_eq!(m.len2(), 3);
        assert_eq!(m.get(1, 1), BAND_LIMIT);
        assert_eq!(m.get(4, 3), BAND_LIMIT);
    }
}
