//! Measurement runners and trial averaging.
//!
//! A runner drives one trial of a measurement protocol end-to-end through
//! the device port and produces a set of named integer metrics. The
//! averager repeats a runner a fixed number of times and reduces the
//! metrics with integer-truncated division.

use crate::device::{DeviceControlPort, InstallRequest};
use crate::error::{MeasureError, MeasureResult};
use crate::fixture::FixtureSwap;
use crate::waiter::ResultWaiter;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Raw observation of a single trial: metric name to integer value
#[derive(Debug, Clone)]
pub struct MeasurementTrial {
    /// The trial's metrics
    pub metrics: BTreeMap<String, u64>,
}

/// Integer mean of each metric across a fixed number of trials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementAverage {
    /// Metric name to truncated mean
    pub metrics: BTreeMap<String, u64>,
}

/// One measurement protocol, invoked once per trial.
pub trait MeasurementRunner {
    /// Run a single trial and return its raw metrics.
    fn run_trial(&mut self) -> MeasureResult<MeasurementTrial>;
}

/// Run `trial_count` trials sequentially and average each metric.
///
/// Division truncates: sub-unit precision is deliberately discarded.
/// Trials are never parallelized; the device under test is exclusive.
pub fn average(
    runner: &mut dyn MeasurementRunner,
    trial_count: u32,
) -> MeasureResult<MeasurementAverage> {
    if trial_count == 0 {
        return Err(MeasureError::InvalidArgument(
            "trial_count must be >= 1".to_string(),
        ));
    }

    let mut sums: BTreeMap<String, u64> = BTreeMap::new();
    for _ in 0..trial_count {
        let trial = runner.run_trial()?;
        for (name, value) in trial.metrics {
            *sums.entry(name).or_insert(0) += value;
        }
    }

    let metrics = sums
        .into_iter()
        .map(|(name, sum)| (name, sum / u64::from(trial_count)))
        .collect();
    Ok(MeasurementAverage { metrics })
}

/// Render-throughput measurement: how many component renders the app
/// completes in a fixed interval, plus its memory footprint.
pub struct ThroughputRunner<'a> {
    port: &'a dyn DeviceControlPort,
    waiter: ResultWaiter,
    app_id: String,
    interval_ms: u64,
    deadline: Option<Duration>,
    count_pattern: Regex,
}

impl<'a> ThroughputRunner<'a> {
    /// Create a runner for one app flavor and render interval.
    pub fn new(
        port: &'a dyn DeviceControlPort,
        app_id: &str,
        interval_ms: u64,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            port,
            waiter: ResultWaiter::new(),
            app_id: app_id.to_string(),
            interval_ms,
            deadline,
            count_pattern: Regex::new(r"count=(\d+)").expect("static pattern"),
        }
    }
}

impl MeasurementRunner for ThroughputRunner<'_> {
    fn run_trial(&mut self) -> MeasureResult<MeasurementTrial> {
        self.port.stop_all_apps()?;
        self.port.clear_log()?;
        self.port.start(
            &self.app_id,
            &format!("/RenderComponentThroughput?interval={}", self.interval_ms),
        )?;

        let mut stream = self.port.read_log_stream()?;
        let count =
            self.waiter
                .wait_for_pattern(stream.as_mut(), &self.count_pattern, None, self.deadline)?;
        let memory = self.port.read_memory(&self.app_id)?;

        let mut metrics = BTreeMap::new();
        metrics.insert("result".to_string(), count);
        metrics.insert("memory".to_string(), memory);
        Ok(MeasurementTrial { metrics })
    }
}

/// Time-to-interactive measurement: one trial of launching the TTI screen
/// and waiting for the app's `TTI=<ms>` signal.
pub struct TtiRunner<'a> {
    port: &'a dyn DeviceControlPort,
    waiter: ResultWaiter,
    app_id: String,
    deadline: Option<Duration>,
    tti_pattern: Regex,
}

/// Log tag the app emits TTI signals under
const TTI_TRIGGER_TAG: &str = "MeasureTTI";

impl<'a> TtiRunner<'a> {
    /// Create a runner for one app flavor.
    pub fn new(port: &'a dyn DeviceControlPort, app_id: &str, deadline: Option<Duration>) -> Self {
        Self {
            port,
            waiter: ResultWaiter::new(),
            app_id: app_id.to_string(),
            deadline,
            tti_pattern: Regex::new(r"TTI=(\d+)").expect("static pattern"),
        }
    }
}

impl MeasurementRunner for TtiRunner<'_> {
    fn run_trial(&mut self) -> MeasureResult<MeasurementTrial> {
        self.port.stop_all_apps()?;
        self.port.clear_log()?;
        self.port.start(&self.app_id, "/TTI")?;

        let mut stream = self.port.read_log_stream()?;
        let tti = self.waiter.wait_for_pattern(
            stream.as_mut(),
            &self.tti_pattern,
            Some(TTI_TRIGGER_TAG),
            self.deadline,
        )?;

        let mut metrics = BTreeMap::new();
        metrics.insert("tti".to_string(), tti);
        Ok(MeasurementTrial { metrics })
    }
}

/// A full TTI measurement for one app flavor at one payload size.
///
/// Swaps the bundled data fixture for a generated payload, reinstalls the
/// app so the swapped fixture is packaged, averages the trials, and
/// restores the fixture whether or not the trials succeed.
pub struct TtiMeasurement {
    app_id: String,
    payload_size: usize,
    fixture_path: PathBuf,
    trial_count: u32,
    deadline: Option<Duration>,
}

impl TtiMeasurement {
    /// Configure a TTI measurement.
    pub fn new<P: Into<PathBuf>>(
        app_id: &str,
        payload_size: usize,
        fixture_path: P,
        trial_count: u32,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            app_id: app_id.to_string(),
            payload_size,
            fixture_path: fixture_path.into(),
            trial_count,
            deadline,
        }
    }

    /// Run the measurement end-to-end through the device port.
    pub fn run(
        &self,
        port: &dyn DeviceControlPort,
        install: &InstallRequest,
    ) -> MeasureResult<MeasurementAverage> {
        let swap = FixtureSwap::enter(&self.fixture_path, self.payload_size)?;

        let result = (|| {
            port.install(install)?;
            let mut runner = TtiRunner::new(port, &self.app_id, self.deadline);
            average(&mut runner, self.trial_count)
        })();

        match result {
            Ok(avg) => {
                // Surface restore failures on the happy path; the drop
                // fallback already covered the error path.
                swap.restore()?;
                info!(app = %self.app_id, size = self.payload_size, ?avg.metrics, "tti");
                Ok(avg)
            }
            Err(e) => Err(e),
        }
    }
}
