//! End-to-end adaptor detection over a small synthetic pool.

use skimalign::params::SkimParams;
use skimalign::readpool::{Read, ReadPool};
use skimalign::skim::matcher::find_adaptor_right_clip;
use skimalign::skim::{HashTransformer, SkimIndex, SkimScanner};

use super::helpers::{init_test_logging, random_dna};

/// read1[0..20] == read3[5..25]; read2 is unrelated.
fn scenario_pool() -> (ReadPool, u32, u32, u32) {
    let shared = random_dna(20, 4242);
    let mut pool = ReadPool::new();

    let mut seq1 = shared.clone();
    seq1.extend_from_slice(&random_dna(10, 1));
    let r1 = pool.push(Read::new("read1", seq1));

    let r2 = pool.push(Read::new("read2", random_dna(30, 2)));

    let mut seq3 = random_dna(5, 3);
    seq3.extend_from_slice(&shared);
    seq3.extend_from_slice(&random_dna(10, 6));
    let r3 = pool.push(Read::new("read3", seq3));

    (pool, r1, r2, r3)
}

#[test]
fn test_adaptor_query_finds_the_overlapping_read() {
    init_test_logging();
    let (pool, r1, r2, r3) = scenario_pool();
    let mut params = SkimParams::adaptor_search(10);
    params.percent_required = 50;
    let index = SkimIndex::build(&pool, &params).unwrap();
    let t = HashTransformer::new(&params).unwrap();

    let mut hashes = Vec::new();
    let mut matches = Vec::new();
    let mut groups = Vec::new();
    let hit = find_adaptor_right_clip(
        &index,
        &t,
        &pool,
        r1,
        &params,
        &mut hashes,
        &mut matches,
        &mut groups,
    )
    .unwrap()
    .expect("the planted overlap must be detected");

    assert_eq!(hit.rid2, r3);
    assert_ne!(hit.rid2, r2);
    // The match starts at the very beginning of read1 and points into
    // read3 at its 5-base prefix.
    assert_eq!(hit.clip_pos, 0);
    assert_eq!(hit.other_pos, 5);
    assert!(hit.hashes >= 2);
}

#[test]
fn test_scanner_reports_the_same_hit() {
    init_test_logging();
    let (pool, r1, _r2, r3) = scenario_pool();
    let mut params = SkimParams::adaptor_search(10);
    params.percent_required = 50;
    let index = SkimIndex::build(&pool, &params).unwrap();
    let scanner = SkimScanner::new(&index, &pool, &params);

    let results = scanner.find_adaptor_clips(1, 2).unwrap();
    let hit = results[r1 as usize].expect("read1 must hit");
    assert_eq!(hit.rid2, r3);

    // read3 sees the mirrored hit against read1.
    let hit3 = results[r3 as usize].expect("read3 must hit");
    assert_eq!(hit3.rid2, r1);
    assert_eq!(hit3.clip_pos, 5);
}
