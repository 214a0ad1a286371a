//! Narrow read-container interfaces consumed by the engines.
//!
//! The real assembler keeps reads in a far richer container (qualities,
//! tags, template info, file provenance); the skimming and alignment cores
//! only ever touch the clipped sequence, its length, a validity flag and
//! per-base hash-stat flags, so that is all this module exposes.

/// One sequencing read: raw bases plus clip bounds.
///
/// Positions handed to the engines are always in clipped coordinates.
pub struct Read {
    name: String,
    seq: Vec<u8>,
    clip_left: usize,
    clip_right: usize,
    /// Per-base tag/hash-stat flags, clipped coordinates. Empty = no flags.
    base_flags: Vec<u8>,
}

impl Read {
    pub fn new(name: impl Into<String>, seq: Vec<u8>) -> Self {
        let clip_right = seq.len();
        Self {
            name: name.into(),
            seq,
            clip_left: 0,
            clip_right,
            base_flags: Vec::new(),
        }
    }

    pub fn with_clips(mut self, clip_left: usize, clip_right: usize) -> Self {
        debug_assert!(clip_left <= clip_right && clip_right <= self.seq.len());
        self.clip_left = clip_left;
        self.clip_right = clip_right;
        self
    }

    pub fn with_base_flags(mut self, flags: Vec<u8>) -> Self {
        self.base_flags = flags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_valid_data(&self) -> bool {
        !self.seq.is_empty() && self.clip_right > self.clip_left
    }

    pub fn len_clipped_seq(&self) -> usize {
        self.clip_right - self.clip_left
    }

    pub fn clipped_seq(&self) -> &[u8] {
        &self.seq[self.clip_left..self.clip_right]
    }

    /// Hash-stat flag for a base in clipped coordinates.
    #[inline]
    pub fn base_flag(&self, pos: usize) -> u8 {
        self.base_flags.get(pos).copied().unwrap_or(0)
    }
}

/// Flat pool of reads addressed by dense ids.
#[derive(Default)]
pub struct ReadPool {
    reads: Vec<Read>,
}

impl ReadPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, read: Read) -> u32 {
        self.reads.push(read);
        (self.reads.len() - 1) as u32
    }

    pub fn size(&self) -> usize {
        self.reads.len()
    }

    pub fn get_read(&self, id: u32) -> &Read {
        &self.reads[id as usize]
    }
}

/// Reverse complement of a nucleotide sequence; ambiguity codes map to `N`.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            b'a' => b't',
            b'c' => b'g',
            b'g' => b'c',
            b't' => b'a',
            _ => b'N',
        })
        .collect()
}
