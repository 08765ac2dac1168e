//! NaiveScan: brute-force double loop.

use crate::error::ScanResult;
use crate::pattern::{Pattern, PATTERN_ID};
use crate::sink::{MatchEvent, MatchSink};
use crate::strategy::{candidate_starts, ScanStrategy};

/// Compares the pattern byte by byte at every start offset, stopping at the
/// first mismatch. Reports overlapping matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveScan;

impl ScanStrategy for NaiveScan {
    fn scan(&self, haystack: &[u8], pattern: &Pattern, sink: &mut dyn MatchSink) -> ScanResult<()> {
        let needle = pattern.as_bytes();
        let last = needle.len() - 1;

        for i in 0..candidate_starts(haystack.len(), needle.len()) {
            for (j, &b) in needle.iter().enumerate() {
                if b != haystack[i + j] {
                    break;
                }
                if j == last {
                    sink.record(MatchEvent::new(i, PATTERN_ID));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;

    fn run(haystack: &[u8], pattern: &[u8]) -> CollectingSink {
        let pattern = Pattern::new(pattern.to_vec()).unwrap();
        let mut sink = CollectingSink::new();
        NaiveScan.scan(haystack, &pattern, &mut sink).unwrap();
        sink
    }

    #[test]
    fn test_overlapping_matches() {
        let sink = run(b"aaaa", b"aa");
        assert_eq!(sink.count(), 3);
        assert_eq!(sink.offsets(), vec![0, 1, 2]);
    }

    #[test]
    fn test_pattern_longer_than_haystack() {
        assert_eq!(run(b"hi", b"hello").count(), 0);
        assert_eq!(run(b"", b"x").count(), 0);
        // L == P - 1: the range computation must not wrap.
        assert_eq!(run(b"abc", b"abcd").count(), 0);
    }

    #[test]
    fn test_exact_length_match() {
        assert_eq!(run(b"hello", b"hello").offsets(), vec![0]);
    }

    #[test]
    fn test_match_at_end() {
        assert_eq!(run(b"hello world", b"world").offsets(), vec![6]);
    }

    #[test]
    fn test_first_byte_recurs() {
        assert_eq!(run(b"aXaY", b"aX").count(), 1);
        assert_eq!(run(b"abcabc", b"ab").count(), 2);
    }

    #[test]
    fn test_binary_data() {
        let sink = run(b"\x00\x01\x02\x00\x01", b"\x00\x01");
        assert_eq!(sink.offsets(), vec![0, 3]);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(run(b"Hello hello", b"hello").offsets(), vec![6]);
    }
}
