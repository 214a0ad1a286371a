//! Banded pairwise alignment: similarity matrix, DP fill, traceback.

pub mod aligner;
pub mod dynamic;
pub mod matrix;
pub mod result;

pub use aligner::Align;
pub use dynamic::{BandParams, DynamicAligner};
pub use matrix::{SimilarityMatrix, BAND_LIMIT};
pub use result::AlignedDualSeq;
