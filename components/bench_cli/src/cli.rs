//! Command line argument definitions.

use crate::error::{CliError, CliResult};
use clap::Parser;
use dist_cache::Abi;

fn parse_abi(value: &str) -> Result<Abi, String> {
    Abi::parse(value)
        .ok_or_else(|| format!("unknown abi '{}' (armeabi-v7a, arm64-v8a, x86, x86_64)", value))
}

/// JavaScript engine benchmark harness
#[derive(Parser, Debug)]
#[command(name = "jsbench", version)]
pub struct Cli {
    /// Enable verbose log
    #[arg(short, long)]
    pub verbose: bool,

    /// Run all benchmarks
    #[arg(short, long)]
    pub all: bool,

    /// Show JS dist config only
    #[arg(long)]
    pub config_only: bool,

    /// Target ABI for installs and binary size measurement
    #[arg(long, default_value = "armeabi-v7a", value_parser = parse_abi)]
    pub abi: Abi,

    /// Benchmark suites to run - supported arguments:
    /// RenderComponentThroughput, TTI
    pub suites: Vec<String>,
}

/// A benchmark suite the harness can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// Render throughput over fixed intervals
    RenderComponentThroughput,
    /// Time-to-interactive across payload sizes
    Tti,
}

impl Suite {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "RenderComponentThroughput" => Some(Suite::RenderComponentThroughput),
            "TTI" => Some(Suite::Tti),
            _ => None,
        }
    }
}

impl Cli {
    /// Resolve the suite selection from `--all` and the positional names.
    ///
    /// An unknown suite name is an error rather than a silent no-op.
    pub fn selected_suites(&self) -> CliResult<Vec<Suite>> {
        if self.all {
            return Ok(vec![Suite::RenderComponentThroughput, Suite::Tti]);
        }
        self.suites
            .iter()
            .map(|name| Suite::parse(name).ok_or_else(|| CliError::UnknownSuite(name.clone())))
            .collect()
    }
}
