//! Rolling hash transformation of read sequences.
//!
//! Every window of `bases_per_hash` bases becomes one hash record. The hash
//! is a 2-bit-per-base code kept in a u64 accumulator, updated in O(1) per
//! position by shifting the oldest base out and the newest in. Alongside
//! the hash, each record aggregates an ambiguity/tag bitmask over the
//! window: one shift-register tracks which of the last k bases were
//! ambiguous, and per-bit counters track the read-supplied per-base flags.

use crate::error::{internal, Result};
use crate::params::{is_ambiguous_base, SkimParams};
use crate::readpool::Read;

/// Hard cap on the hash width: 2 bits per base in a u64 word, with the top
/// bits kept free so bucket-prefix arithmetic never overflows.
pub const MAX_BASES_PER_HASH: u32 = 30;

/// Record flags. Bits 2..8 carry the read's per-base hash-stat flags,
/// OR-aggregated over the window; readers supplying their own flags must
/// keep bits 0 and 1 clear.
pub mod hashflag {
    /// At least one base in the window is an ambiguity code.
    pub const HAS_AMBIGUOUS: u8 = 1 << 0;
    /// The record was produced from the reverse-complement orientation.
    pub const REVERSE: u8 = 1 << 1;
}

/// One hash record: hash value, owning read, window start position (clipped
/// coordinates of the transformed orientation) and the aggregated bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRecord {
    pub vhash: u64,
    pub rid: u32,
    pub pos: u32,
    pub flags: u8,
}

/// Converts clipped read sequences into hash record streams.
#[derive(Debug, Clone, Copy)]
pub struct HashTransformer {
    bases_per_hash: u32,
    stepping: u32,
}

impl HashTransformer {
    pub fn new(params: &SkimParams) -> Result<Self> {
        if params.bases_per_hash == 0 || params.bases_per_hash > MAX_BASES_PER_HASH {
            internal!(
                "bases per hash must be in 1..={}, got {}",
                MAX_BASES_PER_HASH,
                params.bases_per_hash
            );
        }
        if params.hash_save_stepping == 0 {
            internal!("hash save stepping must be at least 1");
        }
        Ok(Self {
            bases_per_hash: params.bases_per_hash,
            stepping: params.hash_save_stepping,
        })
    }

    pub fn bases_per_hash(&self) -> u32 {
        self.bases_per_hash
    }

    /// Transform a read's clipped sequence (forward orientation), carrying
    /// the read's per-base hash-stat flags into the records.
    pub fn transform_read(&self, read: &Read, rid: u32, out: &mut Vec<HashRecord>) {
        if !read.has_valid_data() {
            return;
        }
        self.transform(read.clipped_seq(), rid, false, |pos| read.base_flag(pos), out);
    }

    /// Transform a raw sequence with no per-base metadata.
    pub fn transform_seq(
        &self,
        seq: &[u8],
        rid: u32,
        reverse: bool,
        out: &mut Vec<HashRecord>,
    ) {
        self.transform(seq, rid, reverse, |_| 0, out);
    }

    /// Core rolling loop. Appends to `out`; emits nothing for sequences
    /// shorter than the hash width.
    fn transform<F>(&self, seq: &[u8], rid: u32, reverse: bool, base_flags: F, out: &mut Vec<HashRecord>)
    where
        F: Fn(usize) -> u8,
    {
        let k = self.bases_per_hash as usize;
        if seq.len() < k {
            return;
        }

        let hashmask: u64 = (1u64 << (2 * k)) - 1;
        let winmask: u32 = (1u32 << k) - 1;

        let mut code: u64 = 0;
        let mut ambig_win: u32 = 0;
        // Per-bit counts of the read-supplied flags inside the window.
        let mut flagcnt = [0u32; 8];

        let orient = if reverse { hashflag::REVERSE } else { 0 };

        for (p, &b) in seq.iter().enumerate() {
            code = ((code << 2) | encode_base(b)) & hashmask;
            ambig_win = ((ambig_win << 1) | u32::from(is_ambiguous_base(b))) & winmask;

            let f = base_flags(p) & !0b11;
            add_flag_counts(&mut flagcnt, f, 1);
            if p >= k {
                let old = base_flags(p - k) & !0b11;
                add_flag_counts(&mut flagcnt, old, -1);
            }

            if p + 1 < k {
                continue;
            }
            let start = p + 1 - k;
            if start % self.stepping as usize != 0 {
                continue;
            }

            let mut flags = orient;
            if ambig_win != 0 {
                flags |= hashflag::HAS_AMBIGUOUS;
            }
            flags |= collect_flag_bits(&flagcnt);
            out.push(HashRecord {
                vhash: code,
                rid,
                pos: start as u32,
                flags,
            });
        }
    }
}

/// 2-bit base code; ambiguity codes collapse to 0 and are tracked via the
/// window mask instead.
#[inline]
fn encode_base(b: u8) -> u64 {
    match b {
        b'A' | b'a' => 0,
        b'C' | b'c' => 1,
        b'G' | b'g' => 2,
        b'T' | b't' => 3,
        _ => 0,
    }
}

#[inline]
fn add_flag_counts(cnt: &mut [u32; 8], flags: u8, delta: i32) {
    let mut f = flags;
    while f != 0 {
        let bit = f.trailing_zeros() as usize;
        cnt[bit] = (cnt[bit] as i32 + delta) as u32;
        f &= f - 1;
    }
}

#[inline]
fn collect_flag_bits(cnt: &[u32; 8]) -> u8 {
    let mut flags = 0u8;
    for (bit, &c) in cnt.iter().enumerate() {
        if c > 0 {
            flags |= 1 << bit;
        }
    }
    flags
}
