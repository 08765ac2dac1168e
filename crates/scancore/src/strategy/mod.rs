//! Scan strategy implementations.
//!
//! Every strategy searches the same `(haystack, pattern)` pair and reports
//! matches into a caller-owned [`MatchSink`].
//!
//! ## Strategy Types
//!
//! - `ByteScan` - counts occurrences of the pattern's first byte (inexact baseline)
//! - `NaiveScan` - brute-force double loop
//! - `VectorizedScan` - brute force with lane accumulators the compiler can vectorize
//! - `EngineScan` - overlapping search with the `regex-automata` lazy DFA
//! - `NullScan` - placeholder, never matches

pub mod byte_scan;
pub mod engine;
pub mod naive;
pub mod null;
pub mod vectorized;

use crate::error::ScanResult;
use crate::pattern::Pattern;
use crate::sink::MatchSink;

pub use byte_scan::ByteScan;
pub use engine::{CompiledPattern, EngineConfig, EngineMatch, EngineScan, ScanOutcome, Scratch};
pub use naive::NaiveScan;
pub use null::NullScan;
pub use vectorized::{VectorizedScan, MAX_LANES};

/// One substring-search algorithm under comparison.
///
/// `scan` must never panic on any haystack, including ones shorter than the
/// pattern. Failures are returned and only abort the current run.
pub trait ScanStrategy: Send + Sync {
    /// Search `haystack` for `pattern`, reporting every match into `sink`.
    fn scan(&self, haystack: &[u8], pattern: &Pattern, sink: &mut dyn MatchSink) -> ScanResult<()>;

    /// Whether the hit count is the true number of (overlapping) occurrences.
    ///
    /// Inexact strategies are left out of the consistency check.
    fn is_exact(&self) -> bool {
        true
    }
}

/// Number of start offsets at which a `needle_len` pattern fits in a
/// `haystack_len` buffer. Zero when the pattern is longer than the buffer.
#[inline]
pub(crate) fn candidate_starts(haystack_len: usize, needle_len: usize) -> usize {
    haystack_len
        .checked_sub(needle_len)
        .map_or(0, |last| last + 1)
}
