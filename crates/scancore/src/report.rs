//! Per-strategy results and the run report.

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Serialize a `Duration` as fractional milliseconds.
fn serialize_millis<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(millis(d))
}

fn millis(d: &Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Outcome of one strategy run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Status {
    /// The strategy ran to completion (possibly with zero hits).
    Done,
    /// The strategy reported an error; other strategies were unaffected.
    Failed { message: String },
}

impl Status {
    pub fn is_done(&self) -> bool {
        matches!(self, Status::Done)
    }

    /// Short label used in the text report.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Done => "DONE",
            Status::Failed { .. } => "ERROR",
        }
    }
}

/// Result of invoking one registered strategy once.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResult {
    pub name: String,
    pub status: Status,
    /// Hits held by the run's sink when the strategy returned. For a failed
    /// run this is whatever was recorded before the failure.
    pub hit_count: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    /// Whether the strategy claims an exact occurrence count.
    pub exact: bool,
}

impl StrategyResult {
    /// Elapsed wall-clock time in fractional milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        millis(&self.elapsed)
    }
}

impl fmt::Display for StrategyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>24}: {:>8} hit {:>12}] Time measured: {:>10.3} ms.",
            self.name,
            self.status.label(),
            self.hit_count,
            self.elapsed_ms()
        )
    }
}

/// Agreement between the exact strategies of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum Consistency {
    /// Every exact, completed strategy reported `hit_count`.
    Agreed { hit_count: u64, strategies: usize },
    /// At least two exact, completed strategies disagree.
    Divergent { counts: Vec<(String, u64)> },
    /// No exact strategy completed, so there is nothing to compare.
    Unchecked,
}

/// All results of one harness run, in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub haystack_len: usize,
    pub pattern_len: usize,
    pub results: Vec<StrategyResult>,
}

impl Report {
    pub fn new(haystack_len: usize, pattern_len: usize, results: Vec<StrategyResult>) -> Self {
        Report {
            haystack_len,
            pattern_len,
            results,
        }
    }

    /// Compare hit counts of the exact strategies that completed.
    pub fn consistency(&self) -> Consistency {
        let counts: Vec<(String, u64)> = self
            .results
            .iter()
            .filter(|r| r.exact && r.status.is_done())
            .map(|r| (r.name.clone(), r.hit_count))
            .collect();

        let Some(&(_, first)) = counts.first() else {
            return Consistency::Unchecked;
        };

        if counts.iter().all(|(_, c)| *c == first) {
            Consistency::Agreed {
                hit_count: first,
                strategies: counts.len(),
            }
        } else {
            Consistency::Divergent { counts }
        }
    }

    /// Look up a result by strategy name.
    pub fn get(&self, name: &str) -> Option<&StrategyResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// Number of strategies that failed.
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.status.is_done()).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, status: Status, hits: u64, exact: bool) -> StrategyResult {
        StrategyResult {
            name: name.into(),
            status,
            hit_count: hits,
            elapsed: Duration::from_micros(1500),
            exact,
        }
    }

    #[test]
    fn test_result_line_format() {
        let r = result("naive-scan", Status::Done, 42, true);
        assert_eq!(
            r.to_string(),
            "[              naive-scan:     DONE hit           42] Time measured:      1.500 ms."
        );
    }

    #[test]
    fn test_failed_label() {
        let r = result(
            "engine-scan",
            Status::Failed { message: "bad".into() },
            0,
            true,
        );
        assert!(r.to_string().contains("   ERROR hit"));
    }

    #[test]
    fn test_consistency_agreed_ignores_inexact_and_failed() {
        let report = Report::new(
            10,
            2,
            vec![
                result("byte-scan", Status::Done, 9, false),
                result("engine-scan", Status::Failed { message: "x".into() }, 0, true),
                result("naive-scan", Status::Done, 3, true),
                result("vectorized-scan", Status::Done, 3, true),
                result("null-scan", Status::Done, 0, false),
            ],
        );
        assert_eq!(
            report.consistency(),
            Consistency::Agreed { hit_count: 3, strategies: 2 }
        );
        assert_eq!(report.failures(), 1);
    }

    #[test]
    fn test_consistency_divergent() {
        let report = Report::new(
            10,
            2,
            vec![
                result("naive-scan", Status::Done, 3, true),
                result("vectorized-scan", Status::Done, 4, true),
            ],
        );
        match report.consistency() {
            Consistency::Divergent { counts } => assert_eq!(counts.len(), 2),
            other => panic!("expected divergence, got {:?}", other),
        }
    }

    #[test]
    fn test_consistency_unchecked() {
        let report = Report::new(1, 1, vec![result("null-scan", Status::Done, 0, false)]);
        assert_eq!(report.consistency(), Consistency::Unchecked);
    }

    #[test]
    fn test_report_serialize() {
        let report = Report::new(4, 2, vec![result("naive-scan", Status::Done, 3, true)]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"hit_count\":3"));
        assert!(json.contains("\"elapsed_ms\":1.5"));
        assert!(json.contains("\"state\":\"done\""));
    }

    #[test]
    fn test_failed_status_serialize() {
        let status = Status::Failed { message: "boom".into() };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"state":"failed","message":"boom"}"#);
    }
}
