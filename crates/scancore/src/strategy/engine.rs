//! EngineScan: overlapping search with the `regex-automata` lazy DFA.
//!
//! A run goes through three stages, each visible in the API:
//!
//! 1. [`CompiledPattern::compile`] builds a lazy DFA from the pattern
//!    (case-sensitive, `.` matches `\n`, Unicode mode off so every pattern
//!    and haystack byte stands for itself).
//! 2. [`CompiledPattern::alloc_scratch`] creates the per-run [`Scratch`]
//!    space the lazy DFA fills with states while it searches.
//! 3. [`CompiledPattern::scan`] walks the whole haystack and calls the
//!    handler once per match before returning.
//!
//! Matches are reported by end offset, one per `(pattern, end)` pair, which
//! for a plain literal is exactly the number of overlapping occurrences.
//!
//! # Example (Rust)
//!
//! ```rust,ignore
//! let compiled = CompiledPattern::compile(&pattern, &EngineConfig::default())?;
//! let mut scratch = compiled.alloc_scratch();
//! compiled.scan(data, &mut scratch, |m| {
//!     println!("match ending at {}", m.end);
//!     ControlFlow::Continue(())
//! })?;
//! ```

use crate::error::{ScanError, ScanResult};
use crate::pattern::Pattern;
use crate::sink::{MatchEvent, MatchSink};
use crate::strategy::ScanStrategy;
use regex_automata::hybrid::dfa::{Cache, OverlappingState, DFA};
use regex_automata::hybrid::BuildError;
use regex_automata::nfa::thompson;
use regex_automata::util::syntax;
use regex_automata::{Input, MatchError, MatchErrorKind, MatchKind};
use std::ops::ControlFlow;
use tracing::debug;

/// Default lazy DFA cache capacity (2 MiB, the engine's own default).
pub const DEFAULT_CACHE_CAPACITY: usize = 2 * (1 << 20);

/// Tuning knobs for the regex engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound, in bytes, on the scratch space used by one scan.
    pub cache_capacity: usize,
    /// Give up after the scratch space has been cleared this many times.
    /// `None` never gives up.
    pub max_cache_clears: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_cache_clears: None,
        }
    }
}

/// A match reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMatch {
    /// Id of the pattern that matched.
    pub id: u32,
    /// Start offset. The forward DFA does not track it, so this is `None`.
    pub start: Option<usize>,
    /// Offset one past the last matched byte.
    pub end: usize,
    /// Reserved, always zero.
    pub flags: u32,
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The whole haystack was searched.
    Completed,
    /// The handler asked to stop early.
    Terminated,
}

// =============================================================================
// CompiledPattern
// =============================================================================

/// A pattern compiled into the engine's representation.
#[derive(Debug)]
pub struct CompiledPattern {
    dfa: DFA,
}

/// Per-run working memory for a [`CompiledPattern`].
#[derive(Debug)]
pub struct Scratch {
    cache: Cache,
}

impl Scratch {
    /// Heap memory currently held, in bytes.
    pub fn memory_usage(&self) -> usize {
        self.cache.memory_usage()
    }
}

impl CompiledPattern {
    /// Compile `pattern` with dot-matches-newline semantics.
    ///
    /// The pattern is interpreted as a byte-oriented regular expression.
    /// Bytes that are not valid UTF-8 are matched literally.
    ///
    /// A `cache_capacity` below what the compiled pattern needs is reported
    /// as [`ScanError::ScratchAlloc`], not as a compile error.
    pub fn compile(pattern: &Pattern, config: &EngineConfig) -> ScanResult<Self> {
        let source = regex_source(pattern.as_bytes());

        match build_dfa(&source, config, false) {
            Ok(dfa) => Ok(CompiledPattern { dfa }),
            // Retry with the capacity check off to tell an undersized cache
            // apart from a pattern that does not compile at all.
            Err(e) if build_dfa(&source, config, true).is_ok() => Err(ScanError::ScratchAlloc {
                capacity: config.cache_capacity,
                message: e.to_string(),
            }),
            Err(e) => Err(ScanError::compile(pattern.as_bytes(), e.to_string())),
        }
    }

    /// Allocate scratch space sized for this compiled pattern.
    pub fn alloc_scratch(&self) -> Scratch {
        Scratch {
            cache: self.dfa.create_cache(),
        }
    }

    /// Search all of `haystack`, calling `on_match` for every match.
    ///
    /// Returns only after every match has been delivered, or as soon as
    /// `on_match` returns `ControlFlow::Break`.
    pub fn scan<F>(&self, haystack: &[u8], scratch: &mut Scratch, mut on_match: F) -> ScanResult<ScanOutcome>
    where
        F: FnMut(EngineMatch) -> ControlFlow<()>,
    {
        let input = Input::new(haystack);
        let mut state = OverlappingState::start();

        loop {
            if let Err(e) = self
                .dfa
                .try_search_overlapping_fwd(&mut scratch.cache, &input, &mut state)
            {
                return Err(search_error(e, scratch.cache.clear_count()));
            }

            let Some(hm) = state.get_match() else {
                return Ok(ScanOutcome::Completed);
            };

            let m = EngineMatch {
                id: hm.pattern().as_u32(),
                start: None,
                end: hm.offset(),
                flags: 0,
            };
            if on_match(m).is_break() {
                return Ok(ScanOutcome::Terminated);
            }
        }
    }
}

fn build_dfa(source: &str, config: &EngineConfig, skip_capacity_check: bool) -> Result<DFA, BuildError> {
    DFA::builder()
        .configure(
            DFA::config()
                .match_kind(MatchKind::All)
                .cache_capacity(config.cache_capacity)
                .skip_cache_capacity_check(skip_capacity_check)
                .minimum_cache_clear_count(config.max_cache_clears),
        )
        .syntax(
            syntax::Config::new()
                .dot_matches_new_line(true)
                .unicode(false)
                .utf8(false),
        )
        .thompson(thompson::Config::new().utf8(false))
        .build(source)
}

/// Regex source for a byte pattern: valid UTF-8 runs are copied as they are,
/// every other byte becomes a `\xNN` escape.
fn regex_source(bytes: &[u8]) -> String {
    let mut source = String::with_capacity(bytes.len());
    let mut rest = bytes;

    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                source.push_str(valid);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                source.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let invalid = e.error_len().unwrap_or(after.len());
                for b in &after[..invalid] {
                    source.push_str(&format!("\\x{:02X}", b));
                }
                rest = &after[invalid..];
            }
        }
    }
    source
}

/// Map an engine search failure onto the scan error taxonomy.
fn search_error(err: MatchError, clears: usize) -> ScanError {
    match err.kind() {
        MatchErrorKind::GaveUp { offset } => ScanError::ScratchExhausted {
            offset: *offset,
            clears,
        },
        _ => ScanError::Engine(err.to_string()),
    }
}

// =============================================================================
// EngineScan
// =============================================================================

/// Strategy wrapper: compile, allocate scratch, scan, tear down.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngineScan {
    config: EngineConfig,
}

impl EngineScan {
    pub fn new(config: EngineConfig) -> Self {
        EngineScan { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl ScanStrategy for EngineScan {
    fn scan(&self, haystack: &[u8], pattern: &Pattern, sink: &mut dyn MatchSink) -> ScanResult<()> {
        let compiled = CompiledPattern::compile(pattern, &self.config)?;
        let mut scratch = compiled.alloc_scratch();

        let outcome = compiled.scan(haystack, &mut scratch, |m| {
            sink.record(MatchEvent::new(m.end, m.id));
            ControlFlow::Continue(())
        })?;

        debug!(
            "engine scan {:?}: scratch={} bytes",
            outcome,
            scratch.memory_usage()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{CollectingSink, CountingSink};
    use crate::strategy::NaiveScan;

    fn pattern(p: &str) -> Pattern {
        Pattern::new(p.as_bytes().to_vec()).unwrap()
    }

    fn engine_count(haystack: &[u8], p: &str) -> u64 {
        let mut sink = CountingSink::new();
        EngineScan::default()
            .scan(haystack, &pattern(p), &mut sink)
            .unwrap();
        sink.count()
    }

    fn naive_count(haystack: &[u8], p: &str) -> u64 {
        let mut sink = CountingSink::new();
        NaiveScan.scan(haystack, &pattern(p), &mut sink).unwrap();
        sink.count()
    }

    #[test]
    fn test_overlapping_literal() {
        assert_eq!(engine_count(b"aaaa", "aa"), 3);
    }

    #[test]
    fn test_reports_end_offsets() {
        let mut sink = CollectingSink::new();
        EngineScan::default()
            .scan(b"hay needle hay needle", &pattern("needle"), &mut sink)
            .unwrap();
        assert_eq!(sink.offsets(), vec![10, 21]);
        assert!(sink.events().iter().all(|e| e.pattern_id == 0));
    }

    #[test]
    fn test_literals_agree_with_naive() {
        let haystack = b"int main(int argc) { int x; printf(\"int\"); }\nint\n";
        for p in ["int", "i", "main", "nt", "missing", "\n"] {
            assert_eq!(engine_count(haystack, p), naive_count(haystack, p), "pattern {:?}", p);
        }
    }

    #[test]
    fn test_dot_matches_newline() {
        assert_eq!(engine_count(b"a\nb", "a.b"), 1);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(engine_count(b"Hello hello", "hello"), 1);
    }

    #[test]
    fn test_invalid_utf8_haystack() {
        assert_eq!(engine_count(b"\xff\xfeab\xffab\x00", "ab"), 2);
    }

    #[test]
    fn test_pattern_longer_than_haystack() {
        assert_eq!(engine_count(b"ab", "abc"), 0);
    }

    #[test]
    fn test_compile_error() {
        let err = CompiledPattern::compile(&pattern("a(b"), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::Compile { .. }));
        assert!(err.to_string().contains("a(b"));
    }

    #[test]
    fn test_non_utf8_pattern_matches_bytes() {
        let p = Pattern::new(vec![0xff, 0xfe]).unwrap();
        let haystack = b"\xff\xfe..\xff\xfe";
        let mut engine = CountingSink::new();
        EngineScan::default().scan(haystack, &p, &mut engine).unwrap();
        let mut naive = CountingSink::new();
        NaiveScan.scan(haystack, &p, &mut naive).unwrap();
        assert_eq!(engine.count(), 2);
        assert_eq!(engine.count(), naive.count());
    }

    #[test]
    fn test_dot_matches_any_byte() {
        assert_eq!(engine_count(b"a\xffb", "a.b"), 1);
        assert_eq!(engine_count(b"a\x00b", "a.b"), 1);
    }

    #[test]
    fn test_multibyte_utf8_pattern() {
        assert_eq!(engine_count("caf\u{e9} caf\u{e9}".as_bytes(), "caf\u{e9}"), 2);
    }

    #[test]
    fn test_regex_source_escapes_invalid_bytes() {
        assert_eq!(regex_source(b"ab"), "ab");
        assert_eq!(regex_source(b"a\xffb"), "a\\xFFb");
        assert_eq!(regex_source(b"\xc3"), "\\xC3");
        assert_eq!(regex_source(&[0xc3, 0xa9, 0xfe]), "\u{e9}\\xFE");
    }

    #[test]
    fn test_zero_cache_capacity_is_scratch_alloc_error() {
        let config = EngineConfig {
            cache_capacity: 0,
            max_cache_clears: None,
        };
        let mut sink = CountingSink::new();
        let err = EngineScan::new(config)
            .scan(b"int main() { int x; }", &pattern("int"), &mut sink)
            .unwrap_err();
        assert!(matches!(err, ScanError::ScratchAlloc { capacity: 0, .. }));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_syntax_error_with_zero_capacity_is_still_compile_error() {
        let config = EngineConfig {
            cache_capacity: 0,
            max_cache_clears: None,
        };
        let err = CompiledPattern::compile(&pattern("a(b"), &config).unwrap_err();
        assert!(matches!(err, ScanError::Compile { .. }));
    }

    #[test]
    fn test_compile_error_leaves_sink_untouched() {
        let mut sink = CountingSink::new();
        let res = EngineScan::default().scan(b"a(b", &pattern("a(b"), &mut sink);
        assert!(res.is_err());
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_handler_can_terminate_early() {
        let compiled = CompiledPattern::compile(&pattern("x"), &EngineConfig::default()).unwrap();
        let mut scratch = compiled.alloc_scratch();
        let mut seen = Vec::new();
        let outcome = compiled
            .scan(b"xxxxx", &mut scratch, |m| {
                seen.push(m.end);
                if seen.len() == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Terminated);
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_scan_completes() {
        let compiled = CompiledPattern::compile(&pattern("ab"), &EngineConfig::default()).unwrap();
        let mut scratch = compiled.alloc_scratch();
        let outcome = compiled
            .scan(b"ab ab", &mut scratch, |m| {
                assert_eq!(m.start, None);
                assert_eq!(m.flags, 0);
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Completed);
    }

    #[test]
    fn test_gave_up_maps_to_scratch_exhausted() {
        let err = search_error(MatchError::gave_up(42), 7);
        assert!(matches!(
            err,
            ScanError::ScratchExhausted { offset: 42, clears: 7 }
        ));
    }

    #[test]
    fn test_quit_maps_to_engine_error() {
        let err = search_error(MatchError::quit(0xff, 3), 0);
        assert!(matches!(err, ScanError::Engine(_)));
    }
}
