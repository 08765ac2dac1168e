//! VectorizedScan: brute force with independent lane accumulators.
//!
//! Start offsets are processed in blocks of `lanes` consecutive positions.
//! Each position in a block owns one accumulator, so the inner loop carries no
//! dependency through a shared counter and the compiler is free to vectorize
//! it. The accumulators are folded into the sink once, after the scan.
//!
//! The lane count is `min(pattern.len(), MAX_LANES)`. Lanes are indexed by the
//! start offset's position inside its block, never by a position inside the
//! pattern, so no pattern length can index past the accumulator array.

use crate::error::ScanResult;
use crate::pattern::Pattern;
use crate::sink::MatchSink;
use crate::strategy::{candidate_starts, ScanStrategy};
use tracing::trace;

/// Upper bound on the number of accumulators.
pub const MAX_LANES: usize = 16;

#[derive(Debug, Default, Clone, Copy)]
pub struct VectorizedScan;

impl VectorizedScan {
    /// Number of accumulator lanes used for `pattern`.
    pub fn lanes_for(pattern: &Pattern) -> usize {
        pattern.len().min(MAX_LANES)
    }
}

#[inline(always)]
fn matches_at(haystack: &[u8], needle: &[u8], start: usize) -> u64 {
    (haystack[start..start + needle.len()] == *needle) as u64
}

impl ScanStrategy for VectorizedScan {
    fn scan(&self, haystack: &[u8], pattern: &Pattern, sink: &mut dyn MatchSink) -> ScanResult<()> {
        let needle = pattern.as_bytes();
        let starts = candidate_starts(haystack.len(), needle.len());
        let lanes = Self::lanes_for(pattern);
        let mut acc = [0u64; MAX_LANES];

        let full_blocks = starts / lanes;
        for block in 0..full_blocks {
            let base = block * lanes;
            for (lane, slot) in acc[..lanes].iter_mut().enumerate() {
                *slot += matches_at(haystack, needle, base + lane);
            }
        }

        // Tail: fewer than `lanes` start offsets left.
        let tail_base = full_blocks * lanes;
        for (lane, start) in (tail_base..starts).enumerate() {
            acc[lane] += matches_at(haystack, needle, start);
        }

        let total: u64 = acc.iter().sum();
        trace!(lanes, starts, total, "vectorized scan folded accumulators");
        sink.absorb(total);
        Ok(())
    }
}
