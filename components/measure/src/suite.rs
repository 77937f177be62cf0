//! Suite orchestration.
//!
//! A suite runs every engine variant across every parameter point, in
//! declaration order, one measurement at a time. Any failure aborts the
//! run; there is no partial-suite continuation.

use crate::device::{DeviceControlPort, InstallRequest};
use crate::error::MeasureResult;
use crate::report::SuiteReport;
use crate::runner::{average, ThroughputRunner, TtiMeasurement};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Render intervals measured by the throughput suite, in milliseconds
pub const THROUGHPUT_INTERVALS_MS: [u64; 3] = [10_000, 60_000, 180_000];

/// Payload sizes measured by the TTI suite, in bytes
pub const TTI_PAYLOAD_SIZES: [usize; 3] = [
    3 * 1024 * 1024,
    10 * 1024 * 1024,
    15 * 1024 * 1024,
];

/// One engine variant of the test application.
#[derive(Debug, Clone)]
pub struct EngineVariant {
    /// App flavor identifier, also used as the report label
    pub app_id: String,
    /// Install arguments carrying the prepared distribution path
    pub install: InstallRequest,
}

/// Sequences measurements across engine variants and parameter points.
pub struct SuiteOrchestrator<'a> {
    port: &'a dyn DeviceControlPort,
    variants: Vec<EngineVariant>,
    trial_count: u32,
    deadline: Option<Duration>,
    fixture_path: PathBuf,
}

impl<'a> SuiteOrchestrator<'a> {
    /// Create an orchestrator over the given variants.
    ///
    /// `fixture_path` is the bundled data fixture the TTI suite swaps;
    /// `deadline` bounds each signal wait (`None` preserves unbounded
    /// waits).
    pub fn new<P: Into<PathBuf>>(
        port: &'a dyn DeviceControlPort,
        variants: Vec<EngineVariant>,
        trial_count: u32,
        deadline: Option<Duration>,
        fixture_path: P,
    ) -> Self {
        Self {
            port,
            variants,
            trial_count,
            deadline,
            fixture_path: fixture_path.into(),
        }
    }

    /// Run the render-throughput suite.
    ///
    /// All variants are installed up front so installs do not churn
    /// between measurement points; the variants coexist on the device as
    /// separately identified installations.
    pub fn run_throughput(&self, intervals_ms: &[u64]) -> MeasureResult<SuiteReport> {
        info!("RenderComponentThroughput suite");
        for variant in &self.variants {
            self.port.install(&variant.install)?;
        }

        let mut report = SuiteReport::new();
        for &interval_ms in intervals_ms {
            let case = format!("{}s", interval_ms / 1000);
            for variant in &self.variants {
                info!(variant = %variant.app_id, %case, "throughput point");
                let mut runner =
                    ThroughputRunner::new(self.port, &variant.app_id, interval_ms, self.deadline);
                let avg = average(&mut runner, self.trial_count)?;
                report.add("RenderComponentThroughput", &case, &variant.app_id, avg);
            }
        }
        Ok(report)
    }

    /// Run the time-to-interactive suite.
    ///
    /// TTI reinstalls each variant inside the fixture-swap scope so the
    /// generated payload gets packaged; the batched up-front install of
    /// the throughput suite does not apply here.
    pub fn run_tti(&self, payload_sizes: &[usize]) -> MeasureResult<SuiteReport> {
        info!("TTI suite");
        let mut report = SuiteReport::new();
        for &size in payload_sizes {
            let case = format!("{}MiB", size / (1024 * 1024));
            for variant in &self.variants {
                info!(variant = %variant.app_id, %case, "tti point");
                let measurement = TtiMeasurement::new(
                    &variant.app_id,
                    size,
                    &self.fixture_path,
                    self.trial_count,
                    self.deadline,
                );
                let avg = measurement.run(self.port, &variant.install)?;
                report.add("TTI", &case, &variant.app_id, avg);
            }
        }
        Ok(report)
    }
}
