//! Suite report types and section formatting.

use crate::runner::MeasurementAverage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format a top-level section heading
pub fn h1(title: &str) -> String {
    let rule = "=".repeat(title.len().max(16));
    format!("\n{}\n{}\n{}\n", rule, title, rule)
}

/// Format a sub-section heading
pub fn h2(title: &str) -> String {
    format!("\n{}\n{}\n", title, "-".repeat(title.len()))
}

/// One recorded measurement: suite, parameter point, engine variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Suite name (e.g. `RenderComponentThroughput`)
    pub suite: String,
    /// Parameter point label (e.g. `10s`, `3MiB`)
    pub case: String,
    /// Engine variant app id (`jsc`, `v8`, `hermes`)
    pub variant: String,
    /// Averaged metrics for this point
    pub metrics: BTreeMap<String, u64>,
}

/// Collected results of a suite run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Entries in execution order
    pub entries: Vec<ReportEntry>,
}

impl SuiteReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one averaged measurement
    pub fn add(&mut self, suite: &str, case: &str, variant: &str, average: MeasurementAverage) {
        self.entries.push(ReportEntry {
            suite: suite.to_string(),
            case: case.to_string(),
            variant: variant.to_string(),
            metrics: average.metrics,
        });
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether anything was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the report as sectioned human-readable text.
    ///
    /// Entries are grouped by parameter point in execution order, the way
    /// the suites emit them.
    pub fn format_text(&self) -> String {
        let mut output = String::new();
        let mut current_case: Option<&str> = None;

        if let Some(first) = self.entries.first() {
            output.push_str(&h1(&format!("{} Suite", first.suite)));
        }
        for entry in &self.entries {
            if current_case != Some(entry.case.as_str()) {
                output.push_str(&h2(&format!("{} {}", entry.suite, entry.case)));
                current_case = Some(entry.case.as_str());
            }
            let metrics = entry
                .metrics
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&format!("{:<8} {}\n", entry.variant, metrics));
        }
        output
    }

    /// Export the report as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
