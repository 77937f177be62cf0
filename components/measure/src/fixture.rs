//! Scoped fixture-file swap.
//!
//! The time-to-interactive measurement controls its payload size by
//! replacing the app's bundled data fixture with a generated file of the
//! requested byte weight. The swap is a guard: the original file is moved
//! aside on entry and moved back when the guard drops, on every exit path.

use crate::error::{MeasureError, MeasureResult};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Description marker written into generated fixture payloads
const FAKE_DATA_DESCRIPTION: &str = "GENERATE_FAKE_DATA";

#[derive(Serialize)]
struct FakePayload<'a> {
    description: &'a str,
    size: usize,
    data: String,
}

/// Generate the replacement fixture content for a payload size.
///
/// The repeated filler sized to the request is the externally observable
/// payload-size knob.
fn generate_payload(size: usize) -> String {
    let payload = FakePayload {
        description: FAKE_DATA_DESCRIPTION,
        size,
        data: "a".repeat(size),
    };
    serde_json::to_string(&payload).expect("payload is plain data")
}

/// Guard holding a fixture file in the swapped state.
///
/// Dropping the guard restores the original file. Callers that want to
/// observe restoration failures should finish the scope with
/// [`restore`](Self::restore) instead of relying on drop.
#[derive(Debug)]
pub struct FixtureSwap {
    path: PathBuf,
    backup: PathBuf,
    restored: bool,
}

impl FixtureSwap {
    /// Move the fixture aside and write a generated payload of `size`
    /// filler bytes in its place.
    pub fn enter<P: AsRef<Path>>(path: P, size: usize) -> MeasureResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut backup = path.clone().into_os_string();
        backup.push(".bak");
        let backup = PathBuf::from(backup);

        debug!(path = %path.display(), size, "fixture swap enter");
        fs::rename(&path, &backup).map_err(|source| MeasureError::Fixture {
            path: path.clone(),
            source,
        })?;

        if let Err(source) = fs::write(&path, generate_payload(size)) {
            // Undo the rename so a failed enter leaves no swapped state.
            let _ = fs::rename(&backup, &path);
            return Err(MeasureError::Fixture { path, source });
        }

        Ok(Self {
            path,
            backup,
            restored: false,
        })
    }

    fn restore_inner(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        // Rename replaces the generated file atomically.
        fs::rename(&self.backup, &self.path)?;
        self.restored = true;
        Ok(())
    }

    /// Restore the original fixture now, surfacing any rename failure.
    pub fn restore(mut self) -> MeasureResult<()> {
        self.restore_inner().map_err(|source| MeasureError::Fixture {
            path: self.path.clone(),
            source,
        })
    }
}

impl Drop for FixtureSwap {
    fn drop(&mut self) {
        if let Err(e) = self.restore_inner() {
            warn!(path = %self.path.display(), error = %e, "fixture restore failed in drop");
        }
    }
}
