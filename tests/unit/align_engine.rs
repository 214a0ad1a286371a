//! Traceback properties over DP-filled similarity matrices.

use skimalign::align::{Align, BandParams, DynamicAligner, SimilarityMatrix};

use super::helpers::{permissive_align_params, prepared_aligner, random_dna};

#[test]
fn test_every_corner_traceback_solution_scores_the_corner() {
    // Several pairs with ambiguity about gap placement.
    let pairs: [(&[u8], &[u8]); 3] = [
        (b"ACGGTACC", b"ACGTACC"),
        (b"TTAACCGGTT", b"TTACCGGTT"),
        (b"ACGTACGTACGT", b"ACGTACGGACGT"),
    ];
    for (seq1, seq2) in pairs {
        let (mut al, m) = prepared_aligner(seq1, seq2, permissive_align_params());
        let corner = m.get(seq1.len(), seq2.len());
        let mut out = Vec::new();
        al.simple_align(&m, &mut out, false, false).unwrap();
        assert!(!out.is_empty(), "no solution for {:?}", seq1);
        for ads in &out {
            assert_eq!(ads.get_score(), corner);
        }
    }
}

#[test]
fn test_enumeration_count_is_stable_across_runs() {
    let seq1 = random_dna(60, 11);
    let mut seq2 = seq1.clone();
    seq2.remove(30); // one deletion inside a random context
    let (mut al, m) = prepared_aligner(&seq1, &seq2, permissive_align_params());

    let mut out1 = Vec::new();
    al.simple_align(&m, &mut out1, false, false).unwrap();
    let first_distinct = al.distinct_solutions();
    let first_visited = al.solutions_visited();

    al.acquire_sequences(&seq1, &seq2, 0, 1, 1, 1, false, 0).unwrap();
    let mut out2 = Vec::new();
    al.simple_align(&m, &mut out2, false, false).unwrap();

    assert_eq!(out1.len(), out2.len());
    assert_eq!(first_distinct, al.distinct_solutions());
    assert_eq!(first_visited, al.solutions_visited());
}

#[test]
fn test_cutoff_of_one_emits_at_most_one_solution() {
    let mut params = permissive_align_params();
    params.max_cutoff = 1;
    let (mut al, m) = prepared_aligner(b"AACCGGGGTT", b"AACCGGGTT", params);
    let mut out = Vec::new();
    al.simple_align(&m, &mut out, false, false).unwrap();
    assert!(out.len() <= 1);
    assert!(al.distinct_solutions() <= 1);
}

#[test]
fn test_identical_sequences_reach_perfect_ratio() {
    let seq = random_dna(40, 3);
    let (mut al, m) = prepared_aligner(&seq, &seq, permissive_align_params());
    let mut out = Vec::new();
    al.simple_align(&m, &mut out, false, false).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].get_score(), 40);
    assert_eq!(out[0].get_overlap_len(), 40);
    assert_eq!(out[0].get_score_ratio(), 10000);
}

#[test]
fn test_narrow_band_reports_band_hit_instead_of_solutions() {
    let seq1 = random_dna(30, 5);
    let mut seq2 = vec![b'T'; 6];
    seq2.extend_from_slice(&seq1);

    let params = permissive_align_params();
    let mut m = SimilarityMatrix::new(0, 0);
    DynamicAligner::fill(&mut m, &seq1, &seq2, &params, &BandParams::banded(0, 2, 2));
    let mut al = Align::new();
    al.set_params(params);
    al.acquire_sequences(&seq1, &seq2, 0, 1, 1, 1, false, 0).unwrap();

    let mut out = Vec::new();
    al.simple_align(&m, &mut out, false, false).unwrap();
    assert!(al.band_hit());

    // Wide enough band: the shifted pair aligns fine.
    let params = permissive_align_params();
    DynamicAligner::fill(&mut m, &seq1, &seq2, &params, &BandParams::banded(6, 8, 8));
    al.acquire_sequences(&seq1, &seq2, 0, 1, 1, 1, false, 0).unwrap();
    let mut out = Vec::new();
    al.simple_align(&m, &mut out, false, false).unwrap();
    assert!(!al.band_hit());
    assert!(!out.is_empty());
}

#[test]
fn test_full_align_pads_the_uncovered_tail() {
    // 20-base suffix/prefix overlap between two 30-base reads.
    let a = random_dna(30, 21);
    let mut b = a[10..].to_vec();
    b.extend_from_slice(&random_dna(10, 22));

    let mut params = permissive_align_params();
    params.min_overlap = 10;
    let (mut al, m) = prepared_aligner(&a, &b, params);
    let mut out = Vec::new();
    al.full_align(&m, &mut out, false, false).unwrap();
    assert!(!out.is_empty());
    // A perfect 20-column solution is among the enumerated ones, and its
    // buffers cover both uncovered tails.
    assert!(out
        .iter()
        .any(|s| s.get_score_ratio() == 10000 && s.get_overlap_len() >= 20 && s.total_len() >= 40));
}
