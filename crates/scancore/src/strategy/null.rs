//! NullScan: registry placeholder.

use crate::error::ScanResult;
use crate::pattern::Pattern;
use crate::sink::MatchSink;
use crate::strategy::ScanStrategy;

/// Succeeds immediately without touching the haystack or the sink.
///
/// Shows up in reports as a completed run with zero hits, never as a failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScan;

impl ScanStrategy for NullScan {
    fn scan(&self, _haystack: &[u8], _pattern: &Pattern, _sink: &mut dyn MatchSink) -> ScanResult<()> {
        Ok(())
    }

    fn is_exact(&self) -> bool {
        false
    }
}
