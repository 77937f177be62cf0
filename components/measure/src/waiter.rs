//! Polling result waiter.
//!
//! Measurements signal completion by printing a line like `count=1234` or
//! `TTI=567` into the device log. The waiter polls the live stream until
//! the first line matching a pattern appears and extracts its value.

use crate::device::LogStream;
use crate::error::{MeasureError, MeasureResult};
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Blocks until a signal pattern appears in a live log stream.
pub struct ResultWaiter {
    poll_interval: Duration,
}

impl ResultWaiter {
    /// Create a waiter with the default polling cadence
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Override the sleep between empty stream reads
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Wait until a line matching `pattern` appears; return capture group 1
    /// parsed as an integer.
    ///
    /// The first matching line in stream order wins; later matches are
    /// never considered. If `trigger` is set, only lines containing that
    /// tag are examined (the tag is a filter passed through from the
    /// measurement protocol). With `deadline: None` the wait is unbounded,
    /// matching the original protocol; a deadline turns a silent stream
    /// into a `Timeout` error.
    pub fn wait_for_pattern(
        &self,
        stream: &mut dyn LogStream,
        pattern: &Regex,
        trigger: Option<&str>,
        deadline: Option<Duration>,
    ) -> MeasureResult<u64> {
        let started = Instant::now();
        let expired = || deadline.is_some_and(|limit| started.elapsed() >= limit);
        let timeout = || MeasureError::Timeout {
            pattern: pattern.to_string(),
            waited_ms: started.elapsed().as_millis(),
        };

        debug!(pattern = %pattern, ?trigger, "wait_for_pattern");
        loop {
            while let Some(line) = stream.next_line()? {
                let considered = trigger.map_or(true, |tag| line.contains(tag));
                if considered {
                    if let Some(captures) = pattern.captures(&line) {
                        trace!(line, "signal line matched");
                        let value = captures.get(1).ok_or_else(|| MeasureError::Signal {
                            reason: format!("pattern '{}' has no capture group", pattern),
                        })?;
                        return value.as_str().parse().map_err(|e| MeasureError::Signal {
                            reason: format!("'{}' is not an integer: {}", value.as_str(), e),
                        });
                    }
                }
                // A stream that never drains must not starve the deadline.
                if expired() {
                    return Err(timeout());
                }
            }
            if expired() {
                return Err(timeout());
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}

impl Default for ResultWaiter {
    fn default() -> Self {
        Self::new()
    }
}
