//! Recoverable errors.
//!
//! Contract violations inside the recording hot path are debug assertions and
//! size overflow aborts; only conditions a caller can act on are surfaced here.

use thiserror::Error;

/// Failure of a whole recorded pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The buffer manager could not map GPU memory at some point during the
    /// pass. Every draw was still written (to scratch memory), but the pass
    /// cannot be submitted and must be re-recorded.
    #[error("GPU buffer mapping failed while recording the draw pass")]
    BufferMappingFailed,
}

/// Invalid geometry input at an API boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("invalid fill type value {0}")]
    InvalidFillType(u8),
}
