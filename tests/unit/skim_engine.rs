//! Index lookup symmetry and parallel-scan determinism.

use skimalign::params::SkimParams;
use skimalign::readpool::{Read, ReadPool};
use skimalign::skim::matcher::collect_matches;
use skimalign::skim::{HashRecord, HashTransformer, SkimIndex, SkimMatch, SkimScanner};

use super::helpers::random_dna;

fn single_strand_params(k: u32) -> SkimParams {
    let mut p = SkimParams::adaptor_search(k);
    p.both_strands = false;
    p
}

/// Build a pool where reads `a` and `b` share a planted segment.
fn planted_pool(seg_len: usize) -> (ReadPool, u32, u32) {
    let shared = random_dna(seg_len, 77);
    let mut pool = ReadPool::new();

    let mut seq_a = random_dna(15, 1);
    seq_a.extend_from_slice(&shared);
    let a = pool.push(Read::new("a", seq_a));

    let mut seq_b = shared.clone();
    seq_b.extend_from_slice(&random_dna(15, 2));
    let b = pool.push(Read::new("b", seq_b));

    (pool, a, b)
}

#[test]
fn test_lookup_symmetry_between_reads() {
    let params = single_strand_params(10);
    let (pool, a, b) = planted_pool(30);
    let index = SkimIndex::build(&pool, &params).unwrap();
    let t = HashTransformer::new(&params).unwrap();

    let mut hashes: Vec<HashRecord> = Vec::new();
    let mut matches_a: Vec<SkimMatch> = Vec::new();
    collect_matches(&index, &t, &pool, a, &mut hashes, &mut matches_a);
    let mut matches_b: Vec<SkimMatch> = Vec::new();
    collect_matches(&index, &t, &pool, b, &mut hashes, &mut matches_b);

    // Shared segment sits at a[15..45] and b[0..30]: the first shared
    // window is (p=15, q=0) from a's side and mirrored from b's side.
    assert!(matches_a
        .iter()
        .any(|m| m.rid2 == b && m.hashpos1 == 15 && m.hashpos2 == 0));
    assert!(matches_b
        .iter()
        .any(|m| m.rid2 == a && m.hashpos1 == 0 && m.hashpos2 == 15));

    // Every a->b match has its b->a mirror.
    for m in matches_a.iter().filter(|m| m.rid2 == b) {
        assert!(matches_b
            .iter()
            .any(|n| n.rid2 == a && n.hashpos1 == m.hashpos2 && n.hashpos2 == m.hashpos1));
    }
}

#[test]
fn test_parallel_scan_matches_serial_scan() {
    // A pool big enough for several batches, with planted overlaps.
    let mut pool = ReadPool::new();
    let shared = random_dna(40, 99);
    for i in 0..40u64 {
        let mut seq = random_dna(30, 1000 + i);
        if i % 3 == 0 {
            seq.extend_from_slice(&shared);
        } else {
            seq.extend_from_slice(&random_dna(40, 2000 + i));
        }
        pool.push(Read::new(format!("r{i}"), seq));
    }

    let mut params = SkimParams::adaptor_search(12);
    params.percent_required = 30;
    let index = SkimIndex::build(&pool, &params).unwrap();
    let scanner = SkimScanner::new(&index, &pool, &params);

    let serial = scanner.find_adaptor_clips(1, 4).unwrap();
    for threads in [2, 4, 7] {
        let parallel = scanner.find_adaptor_clips(threads, 4).unwrap();
        assert_eq!(serial, parallel, "threads = {threads}");
    }
}
