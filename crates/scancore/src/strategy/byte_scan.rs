//! ByteScan: first-byte frequency baseline.
//!
//! Reports a match at every occurrence of the pattern's first byte and ignores
//! the rest of the pattern. This overcounts whenever the first byte appears
//! outside a full occurrence (`"aXaY"` / `"aX"` gives 2, not 1). It is kept as
//! the cheapest possible baseline, not as a substring matcher.

use crate::error::ScanResult;
use crate::pattern::{Pattern, PATTERN_ID};
use crate::sink::{MatchEvent, MatchSink};
use crate::strategy::ScanStrategy;

#[derive(Debug, Default, Clone, Copy)]
pub struct ByteScan;

impl ScanStrategy for ByteScan {
    fn scan(&self, haystack: &[u8], pattern: &Pattern, sink: &mut dyn MatchSink) -> ScanResult<()> {
        for offset in memchr::memchr_iter(pattern.first(), haystack) {
            sink.record(MatchEvent::new(offset, PATTERN_ID));
        }
        Ok(())
    }

    fn is_exact(&self) -> bool {
        false
    }
}
