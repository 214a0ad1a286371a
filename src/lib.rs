//! Core alignment and read-overlap-detection engine of a sequence
//! assembler.
//!
//! Two tightly coupled subsystems:
//!
//! - [`align`]: banded dynamic-programming alignment with recursive
//!   traceback that enumerates co-optimal solutions under a cutoff.
//! - [`skim`]: rolling-hash transformation of reads, a sorted
//!   shortcut-bucket index across a read pool, offset clustering of hash
//!   hits into candidate overlaps, and a worker-thread scan driver.
//!
//! File formats, CLI handling and the full read containers live outside
//! this crate; the engines consume the narrow interfaces in [`readpool`]
//! and [`params`].

pub mod align;
pub mod error;
pub mod params;
pub mod readpool;
pub mod skim;

pub use error::{Result, SkimError};
