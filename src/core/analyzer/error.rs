//! Control-flow errors of the grammar walk and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

/// Why a production stopped before completing.
///
/// `EndOfInput` and `Resync` never escape a successful analysis: the
/// statement loop absorbs them after the corresponding diagnostic has been
/// reported. Only `Cancelled` reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The token stream ended inside a production.
    #[error("unexpected end of input")]
    EndOfInput,
    /// The current statement was abandoned at a recovery point.
    #[error("statement abandoned at line {line}")]
    Resync { line: u32 },
    /// The caller requested cancellation.
    #[error("analysis cancelled")]
    Cancelled,
}

/// A cloneable cancellation signal shared between the caller and an analysis.
///
/// ## Examples
/// ```
/// # use fpp_rs::core::analyzer::CancellationFlag;
/// let flag = CancellationFlag::new();
/// let handle = flag.clone();
/// assert!(!flag.is_cancelled());
/// handle.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect at the next statement boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
