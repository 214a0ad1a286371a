//! Aligned sequence pair produced by traceback.
//!
//! `AlignedDualSeq` owns the two gapped byte strings and derives the
//! figures the acceptance filters need: score over the overlap region,
//! overlap length and the x10000-scaled score ratio.

use crate::params::{is_ambiguous_base, AlignParams, GAP_CHAR};

/// One alignment solution: two equal-length gapped sequences plus scores.
#[derive(Debug, Clone)]
pub struct AlignedDualSeq {
    seq1: Vec<u8>,
    seq2: Vec<u8>,
    id1: u32,
    id2: u32,
    dir1: i8,
    dir2: i8,
    score: i32,
    overlap_len: usize,
    score_ratio: i32,
    clean_ends: bool,
}

impl AlignedDualSeq {
    /// Build from the raw traceback buffers. The overlap region excludes
    /// end-gap columns (leading/trailing columns where either side is a
    /// gap); score and ratio are computed over that region only.
    ///
    /// `suppress_n_gap_penalty` makes gap columns facing an ambiguous base
    /// cost nothing, so sequencing artifacts in N runs do not sink an
    /// otherwise good overlap.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        aligned1: &[u8],
        aligned2: &[u8],
        id1: u32,
        id2: u32,
        dir1: i8,
        dir2: i8,
        suppress_n_gap_penalty: bool,
        params: &AlignParams,
    ) -> Self {
        debug_assert_eq!(aligned1.len(), aligned2.len());
        let total = aligned1.len();

        // Overlap region: first/last column where both sides carry a base.
        let mut start = 0;
        while start < total && (aligned1[start] == GAP_CHAR || aligned2[start] == GAP_CHAR) {
            start += 1;
        }
        let mut end = total;
        while end > start && (aligned1[end - 1] == GAP_CHAR || aligned2[end - 1] == GAP_CHAR) {
            end -= 1;
        }

        let overlap_len = end - start;
        let mut score = 0i32;
        for col in start..end {
            let (a, b) = (aligned1[col], aligned2[col]);
            if a == GAP_CHAR || b == GAP_CHAR {
                let facing = if a == GAP_CHAR { b } else { a };
                if !(suppress_n_gap_penalty && is_ambiguous_base(facing)) {
                    score += params.gap_weight();
                }
            } else {
                score += params.diag_weight(a, b);
            }
        }

        let perfect =
            overlap_len as i64 * params.match_score as i64 * params.score_multiplier as i64;
        let score_ratio = if perfect > 0 {
            (score as i64 * 10000 / perfect) as i32
        } else {
            0
        };

        let clean_ends = overlap_len > 0
            && is_match(aligned1[start], aligned2[start])
            && is_match(aligned1[end - 1], aligned2[end - 1]);

        Self {
            seq1: aligned1.to_vec(),
            seq2: aligned2.to_vec(),
            id1,
            id2,
            dir1,
            dir2,
            score,
            overlap_len,
            score_ratio,
            clean_ends,
        }
    }

    pub fn get_score(&self) -> i32 {
        self.score
    }

    pub fn get_overlap_len(&self) -> usize {
        self.overlap_len
    }

    /// Score ratio on the x10000 scale: 10000 = a perfect overlap.
    pub fn get_score_ratio(&self) -> i32 {
        self.score_ratio
    }

    pub fn has_clean_ends(&self) -> bool {
        self.clean_ends
    }

    pub fn aligned_seq1(&self) -> &[u8] {
        &self.seq1
    }

    pub fn aligned_seq2(&self) -> &[u8] {
        &self.seq2
    }

    pub fn total_len(&self) -> usize {
        self.seq1.len()
    }

    pub fn ids(&self) -> (u32, u32) {
        (self.id1, self.id2)
    }

    pub fn directions(&self) -> (i8, i8) {
        (self.dir1, self.dir2)
    }
}

#[inline]
fn is_match(a: u8, b: u8) -> bool {
    a != GAP_CHAR && b != GAP_CHAR && a.eq_ignore_ascii_case(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ads(a: &[u8], b: &[u8], suppress: bool) -> AlignedDualSeq {
        AlignedDualSeq::new(a, b, 0, 1, 1, 1, suppress, &AlignParams::default())
    }

    #[test]
    fn test_perfect_overlap() {
        let r = ads(b"ACGTACGT", b"ACGTACGT", false);
        assert_eq!(r.get_score(), 8);
        assert_eq!(r.get_overlap_len(), 8);
        assert_eq!(r.get_score_ratio(), 10000);
        assert!(r.has_clean_ends());
    }

    #[test]
    fn test_end_gaps_excluded_from_overlap() {
        let r = ads(b"**GTAC", b"ACGTAC", false);
        assert_eq!(r.get_overlap_len(), 4);
        assert_eq!(r.get_score(), 4);
        assert_eq!(r.get_score_ratio(), 10000);
    }

    #[test]
    fn test_internal_gap_penalized() {
        let r = ads(b"ACG*ACGT", b"ACGTACGT", false);
        assert_eq!(r.get_overlap_len(), 8);
        assert_eq!(r.get_score(), 7 - 2);
        assert!(r.get_score_ratio() < 10000);
    }

    #[test]
    fn test_n_gap_penalty_suppressed() {
        let penalized = ads(b"ACG*ACGT", b"ACGNACGT", false);
        let suppressed = ads(b"ACG*ACGT", b"ACGNACGT", true);
        assert_eq!(suppressed.get_score(), penalized.get_score() + 2);
    }

    #[test]
    fn test_unclean_end_detected() {
        let r = ads(b"TCGTACGA", b"ACGTACGA", false);
        assert!(!r.has_clean_ends());
    }
}
