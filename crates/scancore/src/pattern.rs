//! Validated search pattern.

use crate::error::{ScanError, ScanResult};
use std::fmt;

/// Pattern id carried by every match event. There is only ever one pattern.
pub const PATTERN_ID: u32 = 0;

/// A non-empty byte pattern shared read-only by all strategies.
///
/// Construction is the only place an empty pattern can be rejected, so every
/// strategy may index `as_bytes()[0]` and compute `len() - 1` freely.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bytes: Box<[u8]>,
}

impl Pattern {
    /// Build a pattern, rejecting empty input.
    pub fn new(bytes: impl Into<Vec<u8>>) -> ScanResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ScanError::EmptyPattern);
        }
        Ok(Pattern {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// First byte of the pattern.
    pub fn first(&self) -> u8 {
        self.bytes[0]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: patterns are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern")
            .field(&String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}
