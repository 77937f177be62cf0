//! Harness entry points: config display and suite execution.

use crate::cli::{Cli, Suite};
use crate::error::{CliError, CliResult};
use dist_cache::{DistCache, DistCatalog, DistError, DistributionSpec};
use measure::adb::AdbDevicePort;
use measure::report::h1;
use measure::{EngineVariant, InstallRequest, SuiteOrchestrator};
use measure::{THROUGHPUT_INTERVALS_MS, TTI_PAYLOAD_SIZES};
use std::path::PathBuf;
use tracing::info;

/// On-disk root of the distribution cache, relative to the harness root
const DIST_CACHE_DIR: &str = "js_dist";

/// Bundled data fixture the TTI suite swaps
const TTI_FIXTURE_PATH: &str = "src/TTI/data.json";

/// Trials averaged per measurement point
const TRIALS_PER_MEASUREMENT: u32 = 3;

/// JSC distribution compared by the harness
const JSC_DIST: &str = "jsc_official_245459";

/// V8 distribution compared by the harness (hermes rides the same repo)
const V8_DIST: &str = "v8_751";

/// Run the harness for the parsed command line.
pub fn run(cli: &Cli) -> CliResult<()> {
    let suites = cli.selected_suites()?;

    // The toolchain root is required configuration; failing late inside a
    // size computation would waste a device run.
    let toolchain_root = std::env::var_os("NDK_PATH")
        .map(PathBuf::from)
        .ok_or(DistError::MissingConfig)?;

    let catalog = DistCatalog::builtin();
    let cache = DistCache::new(DIST_CACHE_DIR, Some(toolchain_root));
    let jsc = lookup(&catalog, JSC_DIST)?;
    let v8 = lookup(&catalog, V8_DIST)?;

    let jsc_dist = cache.prepare(jsc)?;
    let v8_dist = cache.prepare(v8)?;

    show_config(&cache, cli, &[jsc, v8])?;
    if cli.config_only {
        return Ok(());
    }

    let app_ids = ["jsc", "v8", "hermes"];
    let variants = vec![
        engine_variant("jsc", format!("JSC_DIST_REPO={}", jsc_dist.display()), cli),
        engine_variant("v8", format!("V8_DIST_REPO={}", v8_dist.display()), cli),
        engine_variant("hermes", format!("V8_DIST_REPO={}", v8_dist.display()), cli),
    ];
    let port = AdbDevicePort::new(app_ids.iter().map(|id| id.to_string()).collect(), ".");
    let orchestrator = SuiteOrchestrator::new(
        &port,
        variants,
        TRIALS_PER_MEASUREMENT,
        None,
        TTI_FIXTURE_PATH,
    );

    for suite in suites {
        let report = match suite {
            Suite::RenderComponentThroughput => {
                orchestrator.run_throughput(&THROUGHPUT_INTERVALS_MS)?
            }
            Suite::Tti => orchestrator.run_tti(&TTI_PAYLOAD_SIZES)?,
        };
        println!("{}", report.format_text());
    }
    Ok(())
}

fn lookup<'a>(catalog: &'a DistCatalog, identity: &str) -> CliResult<&'a DistributionSpec> {
    catalog
        .get(identity)
        .ok_or_else(|| CliError::UnknownDistribution(identity.to_string()))
}

fn engine_variant(app_id: &str, maven_repo_prop: String, cli: &Cli) -> EngineVariant {
    EngineVariant {
        app_id: app_id.to_string(),
        install: InstallRequest {
            app_id: app_id.to_string(),
            maven_repo_prop,
            abi: cli.abi,
            verbose: cli.verbose,
        },
    }
}


/// Print catalog metadata and measured binary sizes.
///
/// A size computation failure aborts with the failing stage; it is never
/// reported as a placeholder number.
fn show_config(cache: &DistCache, cli: &Cli, specs: &[&DistributionSpec]) -> CliResult<()> {
    println!("{}", h1("Config"));
    println!("ABI: {}\n", cli.abi);
    for spec in specs {
        info!(identity = %spec.identity, "measuring binary size");
        let size = cache.binary_size(spec, cli.abi)?;
        println!("{} version: {}", spec.identity, spec.version);
        println!("{} meta: {}", spec.identity, spec.meta.join(", "));
        println!("{} binary size: {} bytes\n", spec.identity, size);
    }
    Ok(())
}
