//! Error types for pf-engine

use thiserror::Error;

/// Engine error type
///
/// These use the `PE` prefix (Pennyflow Engine) to avoid collisions with
/// core error codes which use plain `E` codes.
#[derive(Error, Debug)]
pub enum EngineError {
    /// PE001: The execution log resolved to zero usable records
    #[error("[PE001] No execution data: the log resolved to zero usable records")]
    NoExecutionData,

    /// PE002: Core error propagation
    #[error("[PE002] Core error: {0}")]
    Core(#[from] pf_core::CoreError),
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
