//! jsbench CLI Library
//!
//! Provides argument parsing and the harness entry points for the
//! `jsbench` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod cli;
pub mod error;

pub use cli::{Cli, Suite};
pub use error::{CliError, CliResult};
