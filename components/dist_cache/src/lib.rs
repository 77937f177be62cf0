//! Engine distribution cache for the jsbench harness
//!
//! This crate manages the third-party JavaScript engine distributions the
//! benchmark compares. It provides:
//!
//! - A fixed catalog of downloadable engine distributions
//! - A durable on-disk cache with idempotent prepare (fetch + extract once)
//! - Binary size measurement: extract the engine shared library for an ABI,
//!   strip it with the matching toolchain, and report the stripped size
//!
//! # Examples
//!
//! ```rust,no_run
//! use dist_cache::{Abi, DistCache, DistCatalog};
//!
//! let catalog = DistCatalog::builtin();
//! let cache = DistCache::new("js_dist", Some("/opt/ndk".into()));
//! let spec = catalog.get("v8_751").unwrap();
//! let dist_path = cache.prepare(spec)?;
//! let size = cache.binary_size(spec, Abi::Armv7)?;
//! println!("{} -> {} ({} bytes stripped)", spec.identity, dist_path.display(), size);
//! # Ok::<(), dist_cache::DistError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod catalog;
pub mod error;
pub mod strip;

pub use cache::{DistCache, Fetcher, HttpFetcher};
pub use catalog::{Abi, DistCatalog, DistributionSpec};
pub use error::{DistError, DistResult};
