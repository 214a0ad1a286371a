//! Error taxonomy for the skimming and alignment engines.
//!
//! Internal-consistency violations (caller contract breaches, buffer
//! underflows, bad thread ids) are fatal and carry a diagnostic message.
//! Expected pruning events during traceback (cutoff reached, band limit
//! hit) are *not* errors and never surface here; they are silent early
//! returns inside the aligner.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkimError {
    /// Invariant violation inside the engine. Indicates a bug or a caller
    /// contract breach, not a recoverable runtime condition.
    #[error("internal error: {0}")]
    Internal(String),

    /// An operation was invoked before the session was configured.
    #[error("not configured: {0}")]
    NotConfigured(&'static str),

    /// A worker/thread index outside the pool was requested.
    #[error("thread index {got} out of range (pool size {size})")]
    ThreadRange { got: usize, size: usize },
}

pub type Result<T> = std::result::Result<T, SkimError>;

/// Shorthand for raising an internal-consistency error.
macro_rules! internal {
    ($($arg:tt)*) => {
        return Err($crate::error::SkimError::Internal(format!($($arg)*)))
    };
}

pub(crate) use internal;
