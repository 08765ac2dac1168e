//! Strategy registry and the benchmark harness.
//!
//! The harness runs every registered strategy once against the same
//! haystack and pattern, in registration order, giving each invocation its
//! own [`CountingSink`] and timing it with a monotonic clock. A failing
//! strategy is recorded as such and the run moves on.

use crate::pattern::Pattern;
use crate::report::{Report, Status, StrategyResult};
use crate::sink::{CountingSink, MatchSink};
use crate::strategy::{ByteScan, EngineConfig, EngineScan, NaiveScan, NullScan, ScanStrategy, VectorizedScan};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

/// Registry names of the built-in strategies.
pub const BYTE_SCAN: &str = "byte-scan";
pub const ENGINE_SCAN: &str = "engine-scan";
pub const NAIVE_SCAN: &str = "naive-scan";
pub const VECTORIZED_SCAN: &str = "vectorized-scan";
pub const NULL_SCAN: &str = "null-scan";

/// A named strategy.
pub struct RegistryEntry {
    name: String,
    strategy: Box<dyn ScanStrategy>,
}

impl RegistryEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> &dyn ScanStrategy {
        self.strategy.as_ref()
    }
}

/// Ordered collection of strategies. Insertion order is report order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in strategies, in their canonical order.
    pub fn standard(engine: EngineConfig) -> Self {
        let mut registry = Registry::new();
        registry
            .register(BYTE_SCAN, ByteScan)
            .register(ENGINE_SCAN, EngineScan::new(engine))
            .register(NAIVE_SCAN, NaiveScan)
            .register(VECTORIZED_SCAN, VectorizedScan)
            .register(NULL_SCAN, NullScan);
        registry
    }

    /// Append a strategy under `name`.
    pub fn register<S>(&mut self, name: impl Into<String>, strategy: S) -> &mut Self
    where
        S: ScanStrategy + 'static,
    {
        self.entries.push(RegistryEntry {
            name: name.into(),
            strategy: Box::new(strategy),
        });
        self
    }

    /// Keep only the entries whose name satisfies `keep`. Order is preserved.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.entries.retain(|e| keep(&e.name));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drives every registered strategy over one input.
#[derive(Debug)]
pub struct Harness {
    registry: Registry,
}

impl Harness {
    pub fn new(registry: Registry) -> Self {
        Harness { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the strategies one after another.
    pub fn run(&self, haystack: &[u8], pattern: &Pattern) -> Report {
        debug!(
            "Running {} strategies over {} bytes (pattern {} bytes)",
            self.registry.len(),
            haystack.len(),
            pattern.len()
        );
        let results = self
            .registry
            .entries
            .iter()
            .map(|entry| run_entry(entry, haystack, pattern))
            .collect();
        Report::new(haystack.len(), pattern.len(), results)
    }

    /// Run the strategies concurrently on the Rayon pool.
    ///
    /// Each strategy still gets a private sink, and results come back in
    /// registry order. Durations include any contention with the other
    /// strategies running at the same time.
    pub fn run_parallel(&self, haystack: &[u8], pattern: &Pattern) -> Report {
        debug!(
            "Running {} strategies in parallel on {} threads",
            self.registry.len(),
            rayon::current_num_threads()
        );
        let results = self
            .registry
            .entries
            .par_iter()
            .map(|entry| run_entry(entry, haystack, pattern))
            .collect();
        Report::new(haystack.len(), pattern.len(), results)
    }
}

/// Fresh sink, timed invoke, capture.
fn run_entry(entry: &RegistryEntry, haystack: &[u8], pattern: &Pattern) -> StrategyResult {
    let mut sink = CountingSink::new();

    let start = Instant::now();
    let outcome = entry.strategy.scan(haystack, pattern, &mut sink);
    let elapsed = start.elapsed();

    let status = match outcome {
        Ok(()) => {
            debug!("{}: {} hits in {:?}", entry.name, sink.count(), elapsed);
            Status::Done
        }
        Err(e) => {
            warn!("{} failed after {} hits: {}", entry.name, sink.count(), e);
            Status::Failed {
                message: e.to_string(),
            }
        }
    };

    StrategyResult {
        name: entry.name.clone(),
        status,
        hit_count: sink.count(),
        elapsed,
        exact: entry.strategy.is_exact(),
    }
}
