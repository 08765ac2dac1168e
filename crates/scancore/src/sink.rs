//! Match sinks.
//!
//! A sink is owned by exactly one strategy run. The harness creates a fresh
//! one for every invocation, so counts never leak between strategies and no
//! synchronization is needed even when strategies run in parallel.

use serde::Serialize;

/// A single match occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchEvent {
    /// Zero-based byte offset. Start of the match for the built-in
    /// strategies, end of the match for the regex engine.
    pub offset: usize,
    /// Id of the pattern that matched.
    pub pattern_id: u32,
}

impl MatchEvent {
    pub fn new(offset: usize, pattern_id: u32) -> Self {
        MatchEvent { offset, pattern_id }
    }
}

/// Destination for match occurrences during a scan.
pub trait MatchSink {
    /// Record one match.
    fn record(&mut self, event: MatchEvent);

    /// Add `hits` matches counted outside the sink (e.g. folded accumulators).
    fn absorb(&mut self, hits: u64);

    /// Total number of matches seen so far.
    fn count(&self) -> u64;

    /// Zero the sink.
    fn reset(&mut self);
}

// =============================================================================
// CountingSink
// =============================================================================

/// Sink that only keeps a running total.
#[derive(Debug, Default, Clone)]
pub struct CountingSink {
    hits: u64,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchSink for CountingSink {
    #[inline]
    fn record(&mut self, _event: MatchEvent) {
        self.hits += 1;
    }

    fn absorb(&mut self, hits: u64) {
        self.hits += hits;
    }

    fn count(&self) -> u64 {
        self.hits
    }

    fn reset(&mut self) {
        self.hits = 0;
    }
}

// =============================================================================
// CollectingSink
// =============================================================================

/// Sink that keeps every recorded event.
///
/// Absorbed hits carry no offsets, so `count()` may exceed `events().len()`.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    events: Vec<MatchEvent>,
    absorbed: u64,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in the order they were reported.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Offsets of the recorded events.
    pub fn offsets(&self) -> Vec<usize> {
        self.events.iter().map(|e| e.offset).collect()
    }
}

impl MatchSink for CollectingSink {
    fn record(&mut self, event: MatchEvent) {
        self.events.push(event);
    }

    fn absorb(&mut self, hits: u64) {
        self.absorbed += hits;
    }

    fn count(&self) -> u64 {
        self.events.len() as u64 + self.absorbed
    }

    fn reset(&mut self) {
        self.events.clear();
        self.absorbed = 0;
    }
}
