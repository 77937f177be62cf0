//! adb-backed implementation of the device control port.
//!
//! Every device interaction is an explicit argument-vector subprocess with
//! its exit status checked; nothing is composed as a shell string.

use crate::device::{DeviceControlPort, InstallRequest, LogStream};
use crate::error::{MeasureError, MeasureResult};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

/// Android package prefix shared by all flavors of the test application
const APP_PACKAGE_PREFIX: &str = "com.rnbenchmark";

/// Deep link scheme the test application registers
const DEEP_LINK_SCHEME: &str = "rnbench";

fn run_checked(op: &str, cmd: &mut Command) -> MeasureResult<Output> {
    debug!(op, "run: {:?}", cmd);
    let output = cmd.output().map_err(|e| MeasureError::Device {
        op: op.to_string(),
        reason: format!("spawn failed: {}", e),
    })?;
    if !output.status.success() {
        return Err(MeasureError::Device {
            op: op.to_string(),
            reason: format!(
                "{} ({})",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(output)
}

/// Log stream backed by a spawned `adb logcat` child.
///
/// A reader thread drains the child's stdout into a channel so that
/// `next_line` can poll without blocking; the measurement logic itself
/// stays single-threaded.
pub struct AdbLogStream {
    child: Child,
    lines: Receiver<String>,
}

impl AdbLogStream {
    fn spawn() -> MeasureResult<Self> {
        let mut child = Command::new("adb")
            .args(["logcat", "-v", "brief"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MeasureError::Device {
                op: "read_log_stream".to_string(),
                reason: format!("spawn failed: {}", e),
            })?;
        let stdout = child.stdout.take().ok_or_else(|| MeasureError::Device {
            op: "read_log_stream".to_string(),
            reason: "no stdout handle on logcat child".to_string(),
        })?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self { child, lines: rx })
    }
}

impl LogStream for AdbLogStream {
    fn next_line(&mut self) -> MeasureResult<Option<String>> {
        match self.lines.try_recv() {
            Ok(line) => Ok(Some(line)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(MeasureError::Device {
                op: "read_log_stream".to_string(),
                reason: "logcat stream ended".to_string(),
            }),
        }
    }
}

impl Drop for AdbLogStream {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Device control implemented over `adb` and the app's gradle wrapper.
pub struct AdbDevicePort {
    app_ids: Vec<String>,
    project_dir: PathBuf,
}

impl AdbDevicePort {
    /// Create a port managing the given app flavors, with the gradle
    /// project for installs rooted at `project_dir`.
    pub fn new<P: Into<PathBuf>>(app_ids: Vec<String>, project_dir: P) -> Self {
        Self {
            app_ids,
            project_dir: project_dir.into(),
        }
    }

    fn package_name(app_id: &str) -> String {
        format!("{}.{}", APP_PACKAGE_PREFIX, app_id)
    }
}

impl DeviceControlPort for AdbDevicePort {
    fn stop_all_apps(&self) -> MeasureResult<()> {
        for app_id in &self.app_ids {
            let package = Self::package_name(app_id);
            run_checked(
                "stop_all_apps",
                Command::new("adb").args(["shell", "am", "force-stop", package.as_str()]),
            )?;
        }
        Ok(())
    }

    fn clear_log(&self) -> MeasureResult<()> {
        run_checked("clear_log", Command::new("adb").args(["logcat", "-c"]))?;
        Ok(())
    }

    fn start(&self, app_id: &str, navigation_target: &str) -> MeasureResult<()> {
        let link = format!("{}://{}{}", DEEP_LINK_SCHEME, app_id, navigation_target);
        run_checked(
            "start",
            Command::new("adb").args([
                "shell",
                "am",
                "start",
                "-a",
                "android.intent.action.VIEW",
                "-d",
                link.as_str(),
            ]),
        )?;
        Ok(())
    }

    fn read_memory(&self, app_id: &str) -> MeasureResult<u64> {
        let package = Self::package_name(app_id);
        let output = run_checked(
            "read_memory",
            Command::new("adb").args(["shell", "dumpsys", "meminfo", package.as_str()]),
        )?;
        let text = String::from_utf8_lossy(&output.stdout);
        parse_meminfo_total(&text).ok_or_else(|| MeasureError::Device {
            op: "read_memory".to_string(),
            reason: format!("no TOTAL row in meminfo for {}", app_id),
        })
    }

    fn read_log_stream(&self) -> MeasureResult<Box<dyn LogStream>> {
        Ok(Box::new(AdbLogStream::spawn()?))
    }

    fn install(&self, request: &InstallRequest) -> MeasureResult<()> {
        let mut cmd = Command::new("./gradlew");
        cmd.current_dir(&self.project_dir)
            .arg(format!(":{}:installRelease", request.app_id))
            .arg(format!("-P{}", request.maven_repo_prop))
            .arg(format!("-PABI={}", request.abi));
        if !request.verbose {
            cmd.arg("--quiet");
        }
        run_checked("install", &mut cmd)?;
        Ok(())
    }
}

/// Extract the PSS total (in kilobytes) from `dumpsys meminfo` output.
fn parse_meminfo_total(text: &str) -> Option<u64> {
    text.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        // The summary row is a bare "TOTAL", not the "TOTAL:" app-summary row.
        if fields.next() != Some("TOTAL") {
            return None;
        }
        fields.next().and_then(|field| field.parse().ok())
    })
}
