//! Substring search strategies and the harness that times and compares them.
//!
//! This crate provides:
//!
//! - A validated [`Pattern`] type (never empty)
//! - [`MatchSink`] implementations that receive matches from a scan
//! - The [`ScanStrategy`] trait and five strategies: a first-byte baseline,
//!   a naive double loop, a lane-accumulating variant of it, an overlapping
//!   lazy-DFA regex search, and a placeholder that never matches
//! - A [`Harness`] that runs a [`Registry`] of named strategies over one
//!   buffer, sequentially or in parallel, and returns a [`Report`]
//!
//! # Example
//!
//! ```rust,ignore
//! use scancore::{EngineConfig, Harness, Pattern, Registry};
//!
//! let harness = Harness::new(Registry::standard(EngineConfig::default()));
//! let report = harness.run(b"int main() { int x; }", &Pattern::new("int")?);
//! print!("{}", report);
//! ```

pub mod error;
pub mod harness;
pub mod pattern;
pub mod report;
pub mod sink;
pub mod strategy;

// Re-export key types at crate root.
pub use error::{ScanError, ScanResult};
pub use harness::{Harness, Registry, RegistryEntry};
pub use pattern::{Pattern, PATTERN_ID};
pub use report::{Consistency, Report, Status, StrategyResult};
pub use sink::{CollectingSink, CountingSink, MatchEvent, MatchSink};
pub use strategy::{
    ByteScan, CompiledPattern, EngineConfig, EngineMatch, EngineScan, NaiveScan, NullScan,
    ScanOutcome, ScanStrategy, Scratch, VectorizedScan,
};
