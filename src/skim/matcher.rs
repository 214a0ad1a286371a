//! Match collection and offset clustering over the skim index.
//!
//! A query read's hash stream is looked up in the index; every shared hash
//! becomes a match record. Matches are sorted by (other read, orientation,
//! expected offset, position) and scanned in runs: within one other-read,
//! single-orientation run, a new offset group starts whenever consecutive
//! expected offsets drift apart by more than the tolerance. Each group is
//! then scored for how much of the maximum possible overlap its hashes
//! actually tile.

use super::hasher::{hashflag, HashRecord, HashTransformer};
use super::index::SkimIndex;
use crate::error::Result;
use crate::params::SkimParams;
use crate::readpool::ReadPool;

/// One shared hash between the query read and another read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkimMatch {
    pub rid2: u32,
    /// Window start in the query read.
    pub hashpos1: u32,
    /// Window start in the other read (its indexed orientation).
    pub hashpos2: u32,
    /// Expected offset between the reads: `hashpos1 - hashpos2`.
    pub eoffset: i32,
    pub flags: u8,
}

/// An offset-consistent group of matches against one other read.
#[derive(Debug, Clone, Copy)]
pub struct HitGroup {
    pub rid2: u32,
    /// Number of supporting hashes.
    pub hashes: u32,
    /// Query-side extent of the matched windows (start positions).
    pub start1: u32,
    pub end1: u32,
    /// Other-side extent.
    pub start2: u32,
    pub end2: u32,
    pub off_min: i32,
    pub off_max: i32,
    pub mean_offset: i32,
    /// Bases of the query covered by matched windows.
    pub covered_span: u32,
    /// Longest overlap the two reads could share at the mean offset.
    pub max_overlap: u32,
    /// covered span as a percentage of the (stepping-quantized) maximum.
    pub percent: u32,
    pub flags: u8,
}

impl HitGroup {
    /// Supporting hash count discounted by offset jitter; jittery groups
    /// are usually repeat-driven.
    pub fn adjusted_hashes(&self) -> i64 {
        self.hashes as i64 - (self.off_max - self.off_min) as i64
    }

    pub fn accepted(&self, params: &SkimParams) -> bool {
        self.covered_span >= params.min_covered_span && self.percent >= params.percent_required
    }
}

/// Collect every index match for `rid1`'s forward hash stream. The scratch
/// vectors are cleared and reused; nothing is persisted.
pub fn collect_matches(
    index: &SkimIndex,
    transformer: &HashTransformer,
    pool: &ReadPool,
    rid1: u32,
    hash_scratch: &mut Vec<HashRecord>,
    out: &mut Vec<SkimMatch>,
) {
    hash_scratch.clear();
    out.clear();
    let read = pool.get_read(rid1);
    if !read.has_valid_data() {
        return;
    }
    transformer.transform_read(read, rid1, hash_scratch);
    for h in hash_scratch.iter() {
        for m in index.lookup(h.vhash) {
            if m.rid == rid1 {
                continue;
            }
            out.push(SkimMatch {
                rid2: m.rid,
                hashpos1: h.pos,
                hashpos2: m.pos,
                eoffset: h.pos as i32 - m.pos as i32,
                flags: h.flags | m.flags,
            });
        }
    }
}

/// Sort matches and segment them into offset-consistent groups.
///
/// `len1` is the query read's clipped length; other-read lengths come from
/// the pool. Groups are emitted in (rid2, offset) order.
pub fn cluster_matches(
    matches: &mut [SkimMatch],
    pool: &ReadPool,
    len1: usize,
    transformer: &HashTransformer,
    params: &SkimParams,
    out: &mut Vec<HitGroup>,
) {
    out.clear();
    if matches.is_empty() {
        return;
    }
    // Forward and reverse-complement matches live in different coordinate
    // frames; a group must never mix orientations.
    matches.sort_unstable_by_key(|m| {
        (
            m.rid2,
            m.flags & hashflag::REVERSE,
            m.eoffset,
            m.hashpos1,
        )
    });

    let mut run_start = 0usize;
    for i in 1..=matches.len() {
        let split = i == matches.len()
            || matches[i].rid2 != matches[run_start].rid2
            || matches[i].flags & hashflag::REVERSE
                != matches[run_start].flags & hashflag::REVERSE
            || (matches[i].eoffset - matches[i - 1].eoffset).abs() > params.offset_tolerance;
        if split {
            let group = finalize_group(&matches[run_start..i], pool, len1, transformer, params);
            out.push(group);
            run_start = i;
        }
    }
}

fn finalize_group(
    members: &[SkimMatch],
    pool: &ReadPool,
    len1: usize,
    transformer: &HashTransformer,
    params: &SkimParams,
) -> HitGroup {
    debug_assert!(!members.is_empty());
    let rid2 = members[0].rid2;
    let k = transformer.bases_per_hash();
    let step = params.hash_save_stepping;

    let mut start1 = u32::MAX;
    let mut end1 = 0u32;
    let mut start2 = u32::MAX;
    let mut end2 = 0u32;
    let mut off_min = i32::MAX;
    let mut off_max = i32::MIN;
    let mut off_sum = 0i64;
    let mut flags = 0u8;
    for m in members {
        start1 = start1.min(m.hashpos1);
        end1 = end1.max(m.hashpos1 + k);
        start2 = start2.min(m.hashpos2);
        end2 = end2.max(m.hashpos2 + k);
        off_min = off_min.min(m.eoffset);
        off_max = off_max.max(m.eoffset);
        off_sum += m.eoffset as i64;
        flags |= m.flags;
    }
    let mean_offset = (off_sum / members.len() as i64) as i32;
    let covered_span = end1 - start1;

    // Longest overlap the offset geometry allows, bounded by both reads.
    let len2 = pool.get_read(rid2).len_clipped_seq() as i64;
    let max_overlap = if mean_offset >= 0 {
        (len1 as i64 - mean_offset as i64).min(len2)
    } else {
        (len2 + mean_offset as i64).min(len1 as i64)
    }
    .max(0) as u32;

    // With stepping, only every step-th window exists: the densest possible
    // tiling covers (maxnumhashes-1)*step + k bases, not the full overlap.
    let (maxnumhashes, coverable) = if max_overlap >= k {
        let n = (max_overlap - k) / step + 1;
        (n, (n - 1) * step + k)
    } else {
        (0, 0)
    };

    let mut percent = if coverable > 0 {
        (covered_span as u64 * 100 / coverable as u64) as u32
    } else {
        0
    };
    if percent >= 100 {
        // 100% only when the offset never wavered and enough hashes exist
        // to fully tile the overlap; otherwise "almost perfect, unconfirmed".
        if off_min == off_max && members.len() as u32 >= maxnumhashes {
            percent = 100;
        } else {
            percent = 99;
        }
    }

    HitGroup {
        rid2,
        hashes: members.len() as u32,
        start1,
        end1,
        start2,
        end2,
        off_min,
        off_max,
        mean_offset,
        covered_span,
        max_overlap,
        percent,
        flags,
    }
}

/// Outcome of an adaptor scan: the winning candidate plus the
/// smallest-offset alternate, which is tracked for inspection but never
/// drives the clip decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptorScan {
    pub best: Option<HitGroup>,
    pub leftmost: Option<HitGroup>,
}

/// Select candidates among accepted groups: most (offset-adjusted)
/// supporting hashes wins; the smallest-mean-offset candidate rides along.
pub fn check_for_potential_adaptor_hits(groups: &[HitGroup], params: &SkimParams) -> AdaptorScan {
    let mut scan = AdaptorScan::default();
    for g in groups {
        if !g.accepted(params) {
            continue;
        }
        if scan
            .best
            .map_or(true, |b| g.adjusted_hashes() > b.adjusted_hashes())
        {
            scan.best = Some(*g);
        }
        if scan
            .leftmost
            .map_or(true, |b| g.mean_offset < b.mean_offset)
        {
            scan.leftmost = Some(*g);
        }
    }
    scan
}

/// An adaptor hit on one read: which indexed read matched, where the match
/// begins in the query (the right-clip position) and where it begins in the
/// matched read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptorHit {
    pub rid2: u32,
    pub clip_pos: u32,
    pub other_pos: u32,
    pub hashes: u32,
}

/// Full per-read adaptor query: hash, look up, cluster, select.
#[allow(clippy::too_many_arguments)]
pub fn find_adaptor_right_clip(
    index: &SkimIndex,
    transformer: &HashTransformer,
    pool: &ReadPool,
    rid1: u32,
    params: &SkimParams,
    hash_scratch: &mut Vec<HashRecord>,
    match_scratch: &mut Vec<SkimMatch>,
    group_scratch: &mut Vec<HitGroup>,
) -> Result<Option<AdaptorHit>> {
    collect_matches(index, transformer, pool, rid1, hash_scratch, match_scratch);
    let len1 = pool.get_read(rid1).len_clipped_seq();
    cluster_matches(match_scratch, pool, len1, transformer, params, group_scratch);
    let scan = check_for_potential_adaptor_hits(group_scratch, params);
    Ok(scan.best.map(|g| AdaptorHit {
        rid2: g.rid2,
        clip_pos: g.start1,
        other_pos: g.start2,
        hashes: g.hashes,
    }))
}
