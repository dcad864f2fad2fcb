//! Errors reported by the checked slice entry points.

use thiserror::Error;

/// Why a checked load or store was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The slice holds fewer elements than the batch is wide.
    #[error("slice holds {got} lanes, batch needs {needed}")]
    TooShort { needed: usize, got: usize },

    /// The slice does not start at the backend's required alignment.
    #[error("address {addr:#x} is not aligned to {align} bytes")]
    Misaligned { align: usize, addr: usize },
}
