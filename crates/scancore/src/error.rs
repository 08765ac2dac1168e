//! Error types for scan strategies.

use thiserror::Error;

/// Errors a strategy can report for a single run.
///
/// None of these are fatal to the harness: a failing strategy is recorded
/// with an error status and the remaining strategies still run.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The pattern was empty. Rejected before any strategy is dispatched.
    #[error("Empty search pattern")]
    EmptyPattern,

    /// The regex engine could not compile the pattern.
    #[error("Unable to compile pattern \"{pattern}\": {message}")]
    Compile { pattern: String, message: String },

    /// The requested scratch capacity is too small for the compiled pattern.
    #[error("Unable to allocate scratch space of {capacity} bytes: {message}")]
    ScratchAlloc { capacity: usize, message: String },

    /// The engine ran out of scratch space while scanning.
    #[error("Scratch space exhausted at offset {offset:#x} after {clears} cache clears")]
    ScratchExhausted { offset: usize, clears: usize },

    /// Any other failure reported by the regex engine during a scan.
    #[error("Engine error: {0}")]
    Engine(String),
}

impl ScanError {
    /// Create a Compile error.
    pub fn compile(pattern: &[u8], msg: impl Into<String>) -> Self {
        ScanError::Compile {
            pattern: String::from_utf8_lossy(pattern).into_owned(),
            message: msg.into(),
        }
    }
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;
