//! The durable on-disk distribution cache.
//!
//! `prepare` fetches and extracts a distribution exactly once per identity;
//! the fetched stream is piped straight through gzip decoding into tar
//! extraction, with no intermediate archive file on disk. `binary_size`
//! works from the prepared cache entry only: it extracts the engine shared
//! library into a scratch file, strips it, and reports the stripped size.

use crate::catalog::{Abi, DistributionSpec};
use crate::error::{DistError, DistResult};
use crate::strip;
use flate2::read::GzDecoder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Sub-path inside a cache entry that holds the installable maven layout
const INSTALLABLE_SUBPATH: &str = "package/dist";

/// Source of distribution archives.
///
/// The production implementation is [`HttpFetcher`]; tests inject fakes to
/// observe fetch counts and serve canned archives.
pub trait Fetcher {
    /// Open a byte stream for the archive at `url`.
    fn fetch(&self, identity: &str, url: &str) -> DistResult<Box<dyn Read>>;
}

/// Fetches archives over HTTP with a blocking client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with default client settings
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, identity: &str, url: &str) -> DistResult<Box<dyn Read>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DistError::Fetch {
                identity: identity.to_string(),
                reason: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(DistError::Fetch {
                identity: identity.to_string(),
                reason: format!("http status {}", status),
            });
        }
        Ok(Box::new(response))
    }
}

/// On-disk cache of prepared engine distributions.
///
/// Entries are keyed by catalog identity and persist across runs. Prepared
/// entries are only read afterwards; concurrent `prepare` calls for the
/// same identity are not coordinated (the harness is strictly sequential).
pub struct DistCache {
    root: PathBuf,
    toolchain_root: Option<PathBuf>,
    fetcher: Box<dyn Fetcher>,
}

impl DistCache {
    /// Create a cache rooted at `root`, fetching over HTTP.
    ///
    /// `toolchain_root` is the NDK root used for strip-tool lookup; `None`
    /// means size measurement will fail with `MissingConfig`.
    pub fn new<P: Into<PathBuf>>(root: P, toolchain_root: Option<PathBuf>) -> Self {
        Self::with_fetcher(root, toolchain_root, Box::new(HttpFetcher::new()))
    }

    /// Create a cache with a custom archive source
    pub fn with_fetcher<P: Into<PathBuf>>(
        root: P,
        toolchain_root: Option<PathBuf>,
        fetcher: Box<dyn Fetcher>,
    ) -> Self {
        Self {
            root: root.into(),
            toolchain_root,
            fetcher,
        }
    }

    /// Cache entry directory for a spec
    pub fn entry_dir(&self, spec: &DistributionSpec) -> PathBuf {
        self.root.join(&spec.identity)
    }

    /// Installable maven-layout path inside a prepared entry
    pub fn installable_path(&self, spec: &DistributionSpec) -> PathBuf {
        self.entry_dir(spec).join(INSTALLABLE_SUBPATH)
    }

    /// Ensure the distribution is fetched and extracted; return the
    /// installable path.
    ///
    /// Idempotent: if the installable path already exists the fetch and
    /// extraction are skipped entirely, with no integrity re-check.
    pub fn prepare(&self, spec: &DistributionSpec) -> DistResult<PathBuf> {
        let entry_dir = self.entry_dir(spec);
        let installable = self.installable_path(spec);
        if installable.is_dir() {
            debug!(identity = %spec.identity, "prepare: cache hit");
            return Ok(installable);
        }

        info!(identity = %spec.identity, url = %spec.fetch_url, "prepare: fetch and extract");
        fs::create_dir_all(&entry_dir)?;

        let stream = self.fetcher.fetch(&spec.identity, &spec.fetch_url)?;
        let decoder = GzDecoder::new(stream);
        let mut archive = tar::Archive::new(decoder);
        archive
            .unpack(&entry_dir)
            .map_err(|e| DistError::Extract {
                identity: spec.identity.clone(),
                reason: e.to_string(),
            })?;

        if !installable.is_dir() {
            return Err(DistError::Extract {
                identity: spec.identity.clone(),
                reason: format!("archive did not contain {}", INSTALLABLE_SUBPATH),
            });
        }
        Ok(installable)
    }

    /// Measure the stripped size in bytes of the engine shared library for
    /// `abi`.
    ///
    /// Requires a prior [`prepare`](Self::prepare) for the spec. The cached
    /// archive is never mutated; the library is extracted to a scratch file,
    /// stripped there, measured and discarded.
    pub fn binary_size(&self, spec: &DistributionSpec, abi: Abi) -> DistResult<u64> {
        let entry_dir = self.entry_dir(spec);
        if !entry_dir.exists() {
            return Err(DistError::NotPrepared {
                identity: spec.identity.clone(),
                path: entry_dir,
            });
        }
        let toolchain_root = self
            .toolchain_root
            .as_deref()
            .ok_or(DistError::MissingConfig)?;

        let member_archive = self.find_archive_member(spec)?;
        let member_path = format!("jni/{}/{}", abi.dir_name(), spec.binary_name);
        let raw = extract_member(&spec.identity, &member_archive, &member_path)?;

        let mut scratch = tempfile::NamedTempFile::new()?;
        scratch.write_all(&raw)?;
        scratch.flush()?;
        let raw_size = raw.len() as u64;

        let tool = strip::find_strip_tool(toolchain_root, abi)?;
        strip::strip_in_place(&spec.identity, &tool, scratch.path())?;
        let stripped_size = fs::metadata(scratch.path())?.len();
        debug!(
            identity = %spec.identity,
            abi = %abi,
            raw_size,
            stripped_size,
            "binary_size"
        );
        // Scratch file is deleted when `scratch` drops.
        Ok(stripped_size)
    }

    /// First archive member matching the spec's glob, in lexical order.
    fn find_archive_member(&self, spec: &DistributionSpec) -> DistResult<PathBuf> {
        let pattern = self
            .entry_dir(spec)
            .join(&spec.archive_member_glob)
            .to_string_lossy()
            .into_owned();
        let mut matches: Vec<PathBuf> = glob::glob(&pattern)
            .map_err(|e| DistError::ArtifactNotFound {
                identity: spec.identity.clone(),
                pattern: format!("{} ({})", spec.archive_member_glob, e),
            })?
            .filter_map(|m| m.ok())
            .collect();
        matches.sort();
        matches
            .into_iter()
            .next()
            .ok_or_else(|| DistError::ArtifactNotFound {
                identity: spec.identity.clone(),
                pattern: spec.archive_member_glob.clone(),
            })
    }
}

/// Extract a single member from a zip-format archive to memory.
///
/// Invoked as `unzip -p <archive> <member>` with the exit status checked,
/// so a missing member is an extraction failure rather than empty output.
fn extract_member(identity: &str, archive: &Path, member: &str) -> DistResult<Vec<u8>> {
    debug!(archive = %archive.display(), member, "extract_member");
    let output = Command::new("unzip")
        .arg("-p")
        .arg(archive)
        .arg(member)
        .output()
        .map_err(|e| DistError::Extract {
            identity: identity.to_string(),
            reason: format!("unzip spawn failed: {}", e),
        })?;
    if !output.status.success() {
        return Err(DistError::Extract {
            identity: identity.to_string(),
            reason: format!(
                "unzip {} from {} failed with {}",
                member,
                archive.display(),
                output.status
            ),
        });
    }
    Ok(output.stdout)
}
