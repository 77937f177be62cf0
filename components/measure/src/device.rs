//! The device control interface consumed by the measurement runners.
//!
//! Runners never talk to a device directly; they go through
//! [`DeviceControlPort`], which keeps the measurement logic testable with a
//! scripted fake. The adb-backed implementation lives in [`crate::adb`].

use crate::error::MeasureResult;
use dist_cache::Abi;

/// A live log stream produced by an external process.
///
/// `next_line` never blocks: it returns `Ok(None)` when no new line has
/// been appended yet. Polling cadence is the waiter's concern.
pub trait LogStream {
    /// Return the next appended line, or `None` if nothing new is available.
    fn next_line(&mut self) -> MeasureResult<Option<String>>;
}

/// Arguments for installing one engine variant of the test application.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// App flavor identifier (`jsc`, `v8`, `hermes`)
    pub app_id: String,
    /// Maven-repo property pointing at the prepared distribution,
    /// e.g. `V8_DIST_REPO=/path/to/js_dist/v8_751/package/dist`
    pub maven_repo_prop: String,
    /// Target ABI for the build
    pub abi: Abi,
    /// Pass build output through instead of discarding it
    pub verbose: bool,
}

/// Control surface for the device under test.
///
/// The device is a single exclusive resource; callers must not overlap
/// operations from multiple runners.
pub trait DeviceControlPort {
    /// Force-stop every managed app on the device
    fn stop_all_apps(&self) -> MeasureResult<()>;

    /// Clear the device log buffer
    fn clear_log(&self) -> MeasureResult<()>;

    /// Start an app flavor with a navigation target (deep link path)
    fn start(&self, app_id: &str, navigation_target: &str) -> MeasureResult<()>;

    /// Read the app's current memory footprint in kilobytes
    fn read_memory(&self, app_id: &str) -> MeasureResult<u64>;

    /// Open a handle on the live device log
    fn read_log_stream(&self) -> MeasureResult<Box<dyn LogStream>>;

    /// Build and install one engine variant of the test application
    fn install(&self, request: &InstallRequest) -> MeasureResult<()>;
}
