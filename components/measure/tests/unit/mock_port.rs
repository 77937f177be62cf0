//! Scripted in-memory device port shared by the runner and suite tests.

use measure::{DeviceControlPort, InstallRequest, LogStream, MeasureError, MeasureResult};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Stream that replays a fixed script, then reports nothing new.
pub struct ScriptedStream {
    lines: VecDeque<String>,
}

impl LogStream for ScriptedStream {
    fn next_line(&mut self) -> MeasureResult<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Device port that records calls and serves scripted log streams.
///
/// Each `read_log_stream` call consumes the next script; an exhausted
/// script queue yields an empty stream (the waiter then times out).
pub struct MockPort {
    pub calls: RefCell<Vec<String>>,
    pub scripts: RefCell<VecDeque<Vec<String>>>,
    pub memory_kb: u64,
    pub fail_install: bool,
}

impl MockPort {
    pub fn new(scripts: &[&[&str]]) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            scripts: RefCell::new(
                scripts
                    .iter()
                    .map(|script| script.iter().map(|l| l.to_string()).collect())
                    .collect(),
            ),
            memory_kb: 4096,
            fail_install: false,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl DeviceControlPort for MockPort {
    fn stop_all_apps(&self) -> MeasureResult<()> {
        self.record("stop_all_apps".to_string());
        Ok(())
    }

    fn clear_log(&self) -> MeasureResult<()> {
        self.record("clear_log".to_string());
        Ok(())
    }

    fn start(&self, app_id: &str, navigation_target: &str) -> MeasureResult<()> {
        self.record(format!("start {}{}", app_id, navigation_target));
        Ok(())
    }

    fn read_memory(&self, app_id: &str) -> MeasureResult<u64> {
        self.record(format!("read_memory {}", app_id));
        Ok(self.memory_kb)
    }

    fn read_log_stream(&self) -> MeasureResult<Box<dyn LogStream>> {
        self.record("read_log_stream".to_string());
        let lines = self
            .scripts
            .borrow_mut()
            .pop_front()
            .map(|script| script.into_iter().collect())
            .unwrap_or_default();
        Ok(Box::new(ScriptedStream { lines }))
    }

    fn install(&self, request: &InstallRequest) -> MeasureResult<()> {
        self.record(format!("install {} {}", request.app_id, request.maven_repo_prop));
        if self.fail_install {
            return Err(MeasureError::Device {
                op: "install".to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}
