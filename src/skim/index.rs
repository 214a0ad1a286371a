//! Sorted shortcut-bucket index over all hash records of a read pool.
//!
//! Instead of a hash table, records live in one flat array sorted by
//! (bucket prefix, full hash, read id, position). A bounds table gives the
//! `[begin, end)` sub-range for every possible prefix value; `None` is the
//! explicit empty-bucket representation. When the hash is wider than the
//! bucket prefix, a binary search inside the bucket narrows the range to
//! exact hash equality.

use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::hasher::{HashRecord, HashTransformer};
use crate::error::Result;
use crate::params::SkimParams;
use crate::readpool::{reverse_complement, ReadPool};

/// Cap on the bucket-prefix width; wider hashes fall back to binary search
/// inside their bucket.
pub const MAX_BUCKET_BITS: u32 = 22;

pub struct SkimIndex {
    records: Vec<HashRecord>,
    /// `[begin, end)` record range per prefix value; `None` = empty bucket.
    buckets: Vec<Option<(u32, u32)>>,
    bucket_mask: u64,
    /// True when hashes are wider than the bucket prefix and buckets can
    /// hold several distinct hash values.
    search_in_bucket: bool,
}

impl SkimIndex {
    /// Build the index from every valid read in the pool, both orientations
    /// unless `params.both_strands` is off.
    pub fn build(pool: &ReadPool, params: &SkimParams) -> Result<Self> {
        let transformer = HashTransformer::new(params)?;

        let mut records: Vec<HashRecord> = Vec::new();
        let mut rc_scratch: Vec<u8>;
        for rid in 0..pool.size() as u32 {
            let read = pool.get_read(rid);
            if !read.has_valid_data() {
                continue;
            }
            transformer.transform_read(read, rid, &mut records);
            if params.both_strands {
                rc_scratch = reverse_complement(read.clipped_seq());
                transformer.transform_seq(&rc_scratch, rid, true, &mut records);
            }
        }
        debug!(
            "skim index: {} hash records from {} reads",
            records.len(),
            pool.size()
        );

        // Mask over-represented hashes before sorting; repeats would
        // otherwise flood every query's match list.
        if let Some(limit) = params.max_hash_freq {
            let mut census: FxHashMap<u64, u32> = FxHashMap::default();
            for r in &records {
                *census.entry(r.vhash).or_insert(0) += 1;
            }
            let before = records.len();
            records.retain(|r| census[&r.vhash] <= limit);
            debug!(
                "skim index: masked {} records of over-represented hashes",
                before - records.len()
            );
        }

        let hash_bits = 2 * params.bases_per_hash;
        let bucket_bits = hash_bits.min(MAX_BUCKET_BITS);
        let bucket_mask = (1u64 << bucket_bits) - 1;
        let search_in_bucket = hash_bits > bucket_bits;

        records.par_sort_unstable_by_key(|r| (r.vhash & bucket_mask, r.vhash, r.rid, r.pos));

        let mut buckets: Vec<Option<(u32, u32)>> = vec![None; 1usize << bucket_bits];
        let mut run_start = 0usize;
        while run_start < records.len() {
            let key = records[run_start].vhash & bucket_mask;
            let mut run_end = run_start + 1;
            while run_end < records.len() && records[run_end].vhash & bucket_mask == key {
                run_end += 1;
            }
            buckets[key as usize] = Some((run_start as u32, run_end as u32));
            run_start = run_end;
        }

        Ok(Self {
            records,
            buckets,
            bucket_mask,
            search_in_bucket,
        })
    }

    /// All records whose hash equals `hash` exactly.
    pub fn lookup(&self, hash: u64) -> &[HashRecord] {
        let bucket = (hash & self.bucket_mask) as usize;
        let Some((begin, end)) = self.buckets[bucket] else {
            return &[];
        };
        let slice = &self.records[begin as usize..end as usize];
        if !self.search_in_bucket {
            return slice;
        }
        // Bucket holds several hash values: narrow to the exact one.
        let lo = slice.partition_point(|r| r.vhash < hash);
        let hi = slice.partition_point(|r| r.vhash <= hash);
        &slice[lo..hi]
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
