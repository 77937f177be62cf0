//! Measurement engine for the jsbench harness
//!
//! This crate drives benchmark measurements against the test application on
//! a connected device. It includes:
//!
//! - The device control interface and its adb-backed implementation
//! - A polling result waiter with first-match pattern semantics
//! - Measurement runners for render throughput and time-to-interactive
//! - Trial averaging with integer-truncated means
//! - A scoped fixture swap guaranteeing restoration on all exit paths
//! - The suite orchestrator and report types
//!
//! # Examples
//!
//! ```rust,no_run
//! use measure::{average, DeviceControlPort, ThroughputRunner};
//!
//! fn measure(port: &dyn DeviceControlPort) -> measure::MeasureResult<()> {
//!     let mut runner = ThroughputRunner::new(port, "v8", 10_000, None);
//!     let avg = average(&mut runner, 3)?;
//!     println!("v8 {:?}", avg.metrics);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adb;
pub mod device;
pub mod error;
pub mod fixture;
pub mod report;
pub mod runner;
pub mod suite;
pub mod waiter;

pub use device::{DeviceControlPort, InstallRequest, LogStream};
pub use error::{MeasureError, MeasureResult};
pub use fixture::FixtureSwap;
pub use report::{ReportEntry, SuiteReport};
pub use runner::{
    average, MeasurementAverage, MeasurementRunner, MeasurementTrial, ThroughputRunner,
    TtiMeasurement, TtiRunner,
};
pub use suite::{EngineVariant, SuiteOrchestrator, THROUGHPUT_INTERVALS_MS, TTI_PAYLOAD_SIZES};
pub use waiter::ResultWaiter;
