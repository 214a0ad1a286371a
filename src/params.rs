//! Resolved parameter objects for alignment and skimming.
//!
//! Parameters are resolved once per session into immutable value objects and
//! passed down by reference; nothing in the engines caches or mutates them
//! afterwards.

/// Substitution score table indexed by byte pair.
///
/// Case-insensitive: `a` vs `A` scores as a match. Ambiguity codes (anything
/// that is not ACGT) score 0 against everything, so runs of `N` neither help
/// nor hurt an alignment.
pub struct ScoringTable {
    table: Vec<i8>,
}

impl ScoringTable {
    pub fn new(match_score: i8, mismatch_score: i8) -> Self {
        let mut table = vec![0i8; 256 * 256];
        const BASES: [u8; 8] = [b'A', b'C', b'G', b'T', b'a', b'c', b'g', b't'];
        for &x in &BASES {
            for &y in &BASES {
                let score = if x.eq_ignore_ascii_case(&y) {
                    match_score
                } else {
                    mismatch_score
                };
                table[x as usize * 256 + y as usize] = score;
            }
        }
        Self { table }
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.table[a as usize * 256 + b as usize] as i32
    }
}

/// True for every base that is not a plain ACGT, i.e. `N` and the rest of
/// the IUPAC ambiguity codes.
#[inline]
pub fn is_ambiguous_base(b: u8) -> bool {
    !matches!(b, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't')
}

/// Gap character used in alignment output buffers.
pub const GAP_CHAR: u8 = b'*';

/// Resolved alignment parameters, computed once per alignment session.
pub struct AlignParams {
    /// Minimum absolute alignment score for a solution to be kept.
    pub min_score: i32,
    /// Minimum overlap length (columns) for a solution to be kept.
    pub min_overlap: usize,
    /// Minimum relative score on the x10000 scale (10000 = 100.00%).
    pub min_relscore: i32,
    /// Cap on total traceback solutions visited per alignment call.
    pub max_cutoff: u32,
    /// Gap penalty (negative).
    pub gap_penalty: i32,
    /// Multiplier applied to every edge weight.
    pub score_multiplier: i32,
    /// Substitution table.
    pub scoring: ScoringTable,
    /// The score of a perfect base match, used to normalize score ratios.
    pub match_score: i32,
}

impl AlignParams {
    pub fn new(match_score: i8, mismatch_score: i8, gap_penalty: i32) -> Self {
        Self {
            min_score: 15,
            min_overlap: 17,
            min_relscore: 5000,
            max_cutoff: 400,
            gap_penalty,
            score_multiplier: 1,
            scoring: ScoringTable::new(match_score, mismatch_score),
            match_score: match_score as i32,
        }
    }

    /// Edge weight of the diagonal move through bases `a`/`b`.
    #[inline]
    pub fn diag_weight(&self, a: u8, b: u8) -> i32 {
        self.scoring.score(a, b) * self.score_multiplier
    }

    /// Edge weight of a horizontal or vertical (gap) move.
    #[inline]
    pub fn gap_weight(&self) -> i32 {
        self.gap_penalty * self.score_multiplier
    }
}

impl Default for AlignParams {
    fn default() -> Self {
        Self::new(1, -1, -2)
    }
}

/// Resolved skimming parameters.
#[derive(Debug, Clone)]
pub struct SkimParams {
    /// Bases per hash (hash width). At most 30 for the 64-bit rolling hash.
    pub bases_per_hash: u32,
    /// Emit a hash record every this many start positions.
    pub hash_save_stepping: u32,
    /// Index both orientations of every read.
    pub both_strands: bool,
    /// Maximum expected-offset jitter within one match group.
    pub offset_tolerance: i32,
    /// Minimum hash-covered span (bases) for a group to become a candidate.
    pub min_covered_span: u32,
    /// Minimum overlap coverage percentage for a group to become a candidate.
    pub percent_required: u32,
    /// Mask hashes occurring more often than this across the pool.
    pub max_hash_freq: Option<u32>,
}

impl SkimParams {
    /// Settings for adaptor right-clip detection: tight offset tolerance,
    /// single strand handled by the caller providing adaptors per strand.
    pub fn adaptor_search(bases_per_hash: u32) -> Self {
        Self {
            bases_per_hash,
            hash_save_stepping: 1,
            both_strands: true,
            offset_tolerance: 2,
            min_covered_span: 16,
            percent_required: 50,
            max_hash_freq: None,
        }
    }
}

impl Default for SkimParams {
    fn default() -> Self {
        Self {
            bases_per_hash: 16,
            hash_save_stepping: 4,
            both_strands: true,
            offset_tolerance: 2,
            min_covered_span: 16,
            percent_required: 55,
            max_hash_freq: None,
        }
    }
}
