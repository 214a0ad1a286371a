//! K-mer hash skimming: candidate overlap and adaptor detection.

pub mod hasher;
pub mod index;
pub mod matcher;
pub mod pool;

pub use hasher::{HashRecord, HashTransformer};
pub use index::SkimIndex;
pub use matcher::{AdaptorHit, AdaptorScan, HitGroup, SkimMatch};
pub use pool::SkimScanner;
