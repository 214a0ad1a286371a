//! Banded alignment traceback and multi-solution enumeration.
//!
//! `Align` owns a reusable pair of output buffers and walks a previously
//! filled similarity matrix backwards, re-deriving path consistency
//! arithmetically (`predecessor + edge weight == current`) instead of
//! trusting a stored direction array. Every consistent predecessor is
//! explored, so a single call can enumerate several co-optimal solutions;
//! a cutoff counter bounds the blowup in repetitive regions and a band-hit
//! flag aborts tracebacks that touch the band edge so the caller can retry
//! with a wider band.
//!
//! Buffer and cursor mutations follow a strict write/recurse/restore
//! discipline: after every recursive branch returns, `allen` and both read
//! cursors are back at their pre-call values. The characters written past
//! `allen` are stale by then and get overwritten by the next branch.

use log::debug;

use super::dynamic::BandParams;
use super::matrix::{SimilarityMatrix, BAND_LIMIT};
use super::result::AlignedDualSeq;
use crate::error::{internal, Result, SkimError};
use crate::params::{is_ambiguous_base, AlignParams, GAP_CHAR};

/// Direction of the move that led into the current traceback cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    None,
    Diag,
    Up,
    Left,
}

/// Alignment session: bound sequence pair plus reusable traceback state.
pub struct Align {
    params: Option<AlignParams>,

    seq1: Vec<u8>,
    seq2: Vec<u8>,
    id1: u32,
    id2: u32,
    dir1: i8,
    dir2: i8,
    use_offset: bool,
    expected_offset: i32,
    acquired: bool,

    // Output buffers, filled back to front during traceback.
    alseq1: Vec<u8>,
    alseq2: Vec<u8>,
    /// Write cursor: `alseq*[allen..]` is the current partial suffix.
    allen: usize,
    /// Read cursors, one past the next base to consume (0 = exhausted).
    seq1ptr: usize,
    seq2ptr: usize,

    /// Solutions visited in the current align call (cutoff-bounded).
    total_visited: u32,
    /// Solutions accepted since the last `acquire_sequences`.
    distinct_solutions: u32,
    band_hit: bool,

    enforce_clean_ends: bool,
    suppress_n_gap_penalty: bool,
}

impl Align {
    pub fn new() -> Self {
        Self {
            params: None,
            seq1: Vec::new(),
            seq2: Vec::new(),
            id1: 0,
            id2: 0,
            dir1: 1,
            dir2: 1,
            use_offset: false,
            expected_offset: 0,
            acquired: false,
            alseq1: Vec::new(),
            alseq2: Vec::new(),
            allen: 0,
            seq1ptr: 0,
            seq2ptr: 0,
            total_visited: 0,
            distinct_solutions: 0,
            band_hit: false,
            enforce_clean_ends: false,
            suppress_n_gap_penalty: false,
        }
    }

    /// Resolve the parameter set this session will align with.
    pub fn set_params(&mut self, params: AlignParams) {
        self.params = Some(params);
    }

    pub fn params(&self) -> Option<&AlignParams> {
        self.params.as_ref()
    }

    /// Bind a new sequence pair. Resets the per-pair counters and grows the
    /// output buffers if this pair is longer than anything seen before.
    #[allow(clippy::too_many_arguments)]
    pub fn acquire_sequences(
        &mut self,
        seq1: &[u8],
        seq2: &[u8],
        id1: u32,
        id2: u32,
        dir1: i8,
        dir2: i8,
        use_offset: bool,
        expected_offset: i32,
    ) -> Result<()> {
        if self.params.is_none() {
            return Err(SkimError::NotConfigured(
                "acquire_sequences called before set_params",
            ));
        }
        self.seq1.clear();
        self.seq1.extend_from_slice(seq1);
        self.seq2.clear();
        self.seq2.extend_from_slice(seq2);
        self.id1 = id1;
        self.id2 = id2;
        self.dir1 = dir1;
        self.dir2 = dir2;
        self.use_offset = use_offset;
        self.expected_offset = expected_offset;

        let needed = seq1.len() + seq2.len() + 1;
        if self.alseq1.len() < needed {
            self.alseq1.resize(needed, GAP_CHAR);
            self.alseq2.resize(needed, GAP_CHAR);
        }

        self.distinct_solutions = 0;
        self.acquired = true;
        Ok(())
    }

    /// Band geometry for the bound pair: centered on the expected offset
    /// when one was supplied, unbanded otherwise. Callers widen the band
    /// and refill the matrix after a [`Align::band_hit`].
    pub fn band_params(&self, leftband: usize, rightband: usize) -> BandParams {
        if self.use_offset {
            BandParams::banded(self.expected_offset, leftband, rightband)
        } else {
            BandParams::unbanded()
        }
    }

    /// Solutions accepted since the last `acquire_sequences`.
    pub fn distinct_solutions(&self) -> u32 {
        self.distinct_solutions
    }

    /// Solutions visited (accepted or not) by the last align call.
    pub fn solutions_visited(&self) -> u32 {
        self.total_visited
    }

    /// True when the last align call ran into the band edge; the caller
    /// should refill the matrix with a wider band and retry.
    pub fn band_hit(&self) -> bool {
        self.band_hit
    }

    /// Traceback from the matrix corner. Use when the alignment is known to
    /// be end-to-end (or end gaps are already accounted for in the matrix).
    pub fn simple_align(
        &mut self,
        matrix: &SimilarityMatrix,
        out: &mut Vec<AlignedDualSeq>,
        enforce_clean_ends: bool,
        suppress_n_gap_penalty: bool,
    ) -> Result<()> {
        self.begin_traceback(matrix, enforce_clean_ends, suppress_n_gap_penalty)?;
        let (i, j) = (self.seq1.len(), self.seq2.len());
        self.r_align(matrix, i, j, Direction::None, false, out)
    }

    /// Scan the last row and column for the best entry cell, pad the
    /// uncovered tail with gap characters and traceback from there.
    pub fn full_align(
        &mut self,
        matrix: &SimilarityMatrix,
        out: &mut Vec<AlignedDualSeq>,
        enforce_clean_ends: bool,
        suppress_n_gap_penalty: bool,
    ) -> Result<()> {
        self.begin_traceback(matrix, enforce_clean_ends, suppress_n_gap_penalty)?;
        self.term_align(matrix, out)
    }

    fn begin_traceback(
        &mut self,
        matrix: &SimilarityMatrix,
        enforce_clean_ends: bool,
        suppress_n_gap_penalty: bool,
    ) -> Result<()> {
        if !self.acquired {
            return Err(SkimError::NotConfigured(
                "align called before acquire_sequences",
            ));
        }
        if matrix.len1() != self.seq1.len() || matrix.len2() != self.seq2.len() {
            internal!(
                "matrix is {}x{} but sequence pair is {}x{}",
                matrix.len1(),
                matrix.len2(),
                self.seq1.len(),
                self.seq2.len()
            );
        }
        self.allen = self.seq1.len() + self.seq2.len() + 1;
        self.seq1ptr = self.seq1.len();
        self.seq2ptr = self.seq2.len();
        self.total_visited = 0;
        self.band_hit = false;
        self.enforce_clean_ends = enforce_clean_ends;
        self.suppress_n_gap_penalty = suppress_n_gap_penalty;
        Ok(())
    }

    /// Pick the traceback entry cell from the matrix fringe.
    ///
    /// Relative score of a fringe cell is `score * 10000 / min(covered,
    /// other)`; a cell qualifies when it clears both the relative and the
    /// absolute minimum. The best last-row cell wins ties against the best
    /// last-column cell.
    fn term_align(
        &mut self,
        matrix: &SimilarityMatrix,
        out: &mut Vec<AlignedDualSeq>,
    ) -> Result<()> {
        let params = self.params.as_ref().unwrap_or_else(|| unreachable!());
        let len1 = self.seq1.len();
        let len2 = self.seq2.len();
        let min_rel = params.min_relscore as i64;
        let min_score = params.min_score;

        // Best qualifying cell in the last row (i == len1).
        let mut row_best: Option<(usize, i32)> = None;
        for j in 1..=len2 {
            let s = matrix.get(len1, j);
            if s == BAND_LIMIT || s < min_score {
                continue;
            }
            let rel = s as i64 * 10000 / j.min(len1).max(1) as i64;
            if rel < min_rel {
                continue;
            }
            if row_best.map_or(true, |(_, bs)| s > bs) {
                row_best = Some((j, s));
            }
        }

        // Best qualifying cell in the last column (j == len2).
        let mut col_best: Option<(usize, i32)> = None;
        for i in 1..=len1 {
            let s = matrix.get(i, len2);
            if s == BAND_LIMIT || s < min_score {
                continue;
            }
            let rel = s as i64 * 10000 / i.min(len2).max(1) as i64;
            if rel < min_rel {
                continue;
            }
            if col_best.map_or(true, |(_, bs)| s > bs) {
                col_best = Some((i, s));
            }
        }

        // Column wins only on a strictly better score.
        let take_col = match (row_best, col_best) {
            (Some((_, rs)), Some((_, cs))) => cs > rs,
            (None, Some(_)) => true,
            _ => false,
        };

        if take_col {
            let (i, _) = col_best.unwrap_or_else(|| unreachable!());
            // seq1 tail i..len1 is uncovered: align it against gaps.
            for k in (i..len1).rev() {
                let b = self.seq1[k];
                self.unshift(b, GAP_CHAR)?;
                self.seq1ptr -= 1;
            }
            self.r_align(matrix, i, len2, Direction::None, false, out)
        } else if let Some((j, _)) = row_best {
            // seq2 tail j..len2 is uncovered: align it against gaps.
            for k in (j..len2).rev() {
                let b = self.seq2[k];
                self.unshift(GAP_CHAR, b)?;
                self.seq2ptr -= 1;
            }
            self.r_align(matrix, len1, j, Direction::None, false, out)
        } else {
            // Nothing on the fringe clears the thresholds; not an error.
            Ok(())
        }
    }

    /// Push one column onto the front of the alignment buffers.
    #[inline]
    fn unshift(&mut self, c1: u8, c2: u8) -> Result<()> {
        if self.allen == 0 {
            internal!("alignment output buffer underflow");
        }
        self.allen -= 1;
        self.alseq1[self.allen] = c1;
        self.alseq2[self.allen] = c2;
        Ok(())
    }

    /// Recursive traceback from cell `(i, j)`.
    fn r_align(
        &mut self,
        m: &SimilarityMatrix,
        i: usize,
        j: usize,
        last_dir: Direction,
        preceded_by_ambiguous: bool,
        out: &mut Vec<AlignedDualSeq>,
    ) -> Result<()> {
        let params = self.params.as_ref().unwrap_or_else(|| unreachable!());
        let cutoff = params.max_cutoff;

        // Expected pruning: cutoff exhausted or band edge already touched.
        if self.total_visited >= cutoff || self.band_hit {
            return Ok(());
        }

        debug_assert_eq!(self.seq1ptr, i);
        debug_assert_eq!(self.seq2ptr, j);

        if i == 0 && j == 0 {
            return self.materialize(out);
        }

        // Edge rows/columns: forced single gap move, no branching.
        if i == 0 {
            let b2 = self.seq2[j - 1];
            self.unshift(GAP_CHAR, b2)?;
            self.seq2ptr -= 1;
            self.r_align(m, 0, j - 1, Direction::Left, is_ambiguous_base(b2), out)?;
            self.seq2ptr += 1;
            self.allen += 1;
            return Ok(());
        }
        if j == 0 {
            let b1 = self.seq1[i - 1];
            self.unshift(b1, GAP_CHAR)?;
            self.seq1ptr -= 1;
            self.r_align(m, i - 1, 0, Direction::Up, is_ambiguous_base(b1), out)?;
            self.seq1ptr += 1;
            self.allen += 1;
            return Ok(());
        }

        let cur = m.get(i, j);
        let d = m.get(i - 1, j - 1);
        let u = m.get(i - 1, j);
        let l = m.get(i, j - 1);

        // Band edge adjacent: abort this traceback. Branches already taken
        // elsewhere keep whatever solutions they recorded.
        if d == BAND_LIMIT || u == BAND_LIMIT || l == BAND_LIMIT {
            debug!(
                "band limit hit at ({}, {}) for pair ({}, {})",
                i, j, self.id1, self.id2
            );
            self.band_hit = true;
            return Ok(());
        }

        let b1 = self.seq1[i - 1];
        let b2 = self.seq2[j - 1];
        let params = self.params.as_ref().unwrap_or_else(|| unreachable!());
        let mut ok_diag = d + params.diag_weight(b1, b2) == cur;
        let mut ok_up = u + params.gap_weight() == cur;
        let ok_left = l + params.gap_weight() == cur;

        // Ambiguous runs facing each other: prefer the gap over a diagonal
        // walk through the Ns, avoiding misplaced gaps around repeats.
        if ok_diag && ok_up && ok_left && preceded_by_ambiguous {
            ok_diag = false;
        }
        // Anti-sawtooth: keep running gaps running instead of re-entering
        // the diagonal through identical bases.
        if ok_up && last_dir == Direction::Up {
            ok_diag = false;
        }
        if ok_left && last_dir == Direction::Left {
            ok_diag = false;
            ok_up = false;
        }

        if ok_diag {
            self.unshift(b1, b2)?;
            self.seq1ptr -= 1;
            self.seq2ptr -= 1;
            let ambig = is_ambiguous_base(b1) || is_ambiguous_base(b2);
            self.r_align(m, i - 1, j - 1, Direction::Diag, ambig, out)?;
            self.seq1ptr += 1;
            self.seq2ptr += 1;
            self.allen += 1;
        }
        if ok_up {
            self.unshift(b1, GAP_CHAR)?;
            self.seq1ptr -= 1;
            self.r_align(m, i - 1, j, Direction::Up, is_ambiguous_base(b1), out)?;
            self.seq1ptr += 1;
            self.allen += 1;
        }
        if ok_left {
            self.unshift(GAP_CHAR, b2)?;
            self.seq2ptr -= 1;
            self.r_align(m, i, j - 1, Direction::Left, is_ambiguous_base(b2), out)?;
            self.seq2ptr += 1;
            self.allen += 1;
        }

        Ok(())
    }

    /// Terminal cell reached: turn the buffer suffix into a candidate
    /// solution and run it through the acceptance filters.
    fn materialize(&mut self, out: &mut Vec<AlignedDualSeq>) -> Result<()> {
        if self.seq1ptr != 0 || self.seq2ptr != 0 {
            internal!(
                "traceback reached origin with unconsumed bases ({}, {})",
                self.seq1ptr,
                self.seq2ptr
            );
        }
        self.total_visited += 1;

        let params = self.params.as_ref().unwrap_or_else(|| unreachable!());
        let ads = AlignedDualSeq::new(
            &self.alseq1[self.allen..],
            &self.alseq2[self.allen..],
            self.id1,
            self.id2,
            self.dir1,
            self.dir2,
            self.suppress_n_gap_penalty,
            params,
        );
        let accepted = ads.get_score() >= params.min_score
            && ads.get_overlap_len() >= params.min_overlap
            && ads.get_score_ratio() >= params.min_relscore
            && (!self.enforce_clean_ends || ads.has_clean_ends());
        if accepted {
            self.distinct_solutions += 1;
            out.push(ads);
        }
        Ok(())
    }
}

impl Default for Align {
    fn default() -> Self {
        Self::new()
    }
}
