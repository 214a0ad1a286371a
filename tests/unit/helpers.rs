//! Shared helpers for the integration tests.

use skimalign::align::{Align, BandParams, DynamicAligner, SimilarityMatrix};
use skimalign::params::AlignParams;

/// Capture engine debug logs when a test runs with RUST_LOG set.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Alignment parameters that accept everything, for property checks that
/// want to see every enumerated solution.
pub fn permissive_align_params() -> AlignParams {
    let mut p = AlignParams::default();
    p.min_score = 1;
    p.min_overlap = 1;
    p.min_relscore = 0;
    p.max_cutoff = 100_000;
    p
}

/// Fill an unbanded matrix and bind an aligner to the pair.
pub fn prepared_aligner(
    seq1: &[u8],
    seq2: &[u8],
    params: AlignParams,
) -> (Align, SimilarityMatrix) {
    let mut m = SimilarityMatrix::new(0, 0);
    DynamicAligner::fill(&mut m, seq1, seq2, &params, &BandParams::unbanded());
    let mut al = Align::new();
    al.set_params(params);
    al.acquire_sequences(seq1, seq2, 0, 1, 1, 1, false, 0)
        .expect("acquire after set_params");
    (al, m)
}

/// Deterministic pseudo-random DNA for pool construction.
pub fn random_dna(len: usize, seed: u64) -> Vec<u8> {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len).map(|_| BASES[rng.gen_range(0..4)]).collect()
}
