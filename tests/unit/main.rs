//! Integration tests for the alignment and skimming engines.
//!
//! `align_engine` covers traceback properties over filled matrices,
//! `skim_engine` covers index lookup symmetry and parallel-scan
//! determinism, and `end_to_end` runs adaptor detection over a small
//! synthetic read pool.

mod helpers;

mod align_engine;
mod end_to_end;
mod skim_engine;
