use crate::mock_port::MockPort;
use dist_cache::Abi;
use measure::{EngineVariant, InstallRequest, MeasureError, SuiteOrchestrator};
use std::fs;
use std::time::Duration;

const DEADLINE: Option<Duration> = Some(Duration::from_millis(200));

fn variant(app_id: &str, prop: &str) -> EngineVariant {
    EngineVariant {
        app_id: app_id.to_string(),
        install: InstallRequest {
            app_id: app_id.to_string(),
            maven_repo_prop: format!("{}=/js_dist/{}/package/dist", prop, app_id),
            abi: Abi::Armv7,
            verbose: false,
        },
    }
}

#[test]
fn test_throughput_suite_installs_up_front() {
    // Two variants x two intervals, one trial each.
    let port = MockPort::new(&[
        &["count=10"],
        &["count=20"],
        &["count=30"],
        &["count=40"],
    ]);
    let variants = vec![variant("jsc", "JSC_DIST_REPO"), variant("v8", "V8_DIST_REPO")];
    let orchestrator = SuiteOrchestrator::new(&port, variants, 1, DEADLINE, "unused.json");

    let report = orchestrator.run_throughput(&[10_000, 60_000]).unwrap();
    assert_eq!(report.len(), 4);

    let calls = port.calls();
    // Both installs precede any measurement traffic.
    assert!(calls[0].starts_with("install jsc"));
    assert!(calls[1].starts_with("install v8"));
    assert!(calls[2..].iter().all(|c| !c.starts_with("install")));

    // Declaration order: every variant at 10s before any at 60s.
    let entries: Vec<(&str, &str)> = report
        .entries
        .iter()
        .map(|e| (e.case.as_str(), e.variant.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![("10s", "jsc"), ("10s", "v8"), ("60s", "jsc"), ("60s", "v8")]
    );
    assert_eq!(report.entries[3].metrics["result"], 40);
}

#[test]
fn test_throughput_suite_aborts_on_failure() {
    // Second measurement gets no signal and times out; the suite halts.
    let port = MockPort::new(&[&["count=10"]]);
    let variants = vec![variant("jsc", "JSC_DIST_REPO"), variant("v8", "V8_DIST_REPO")];
    let orchestrator = SuiteOrchestrator::new(&port, variants, 1, DEADLINE, "unused.json");

    let err = orchestrator.run_throughput(&[10_000]).unwrap_err();
    assert!(matches!(err, MeasureError::Timeout { .. }));
}

#[test]
fn test_tti_suite_runs_each_size_and_variant() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("data.json");
    fs::write(&fixture, b"{\"real\":1}").unwrap();

    let port = MockPort::new(&[
        &["I/MeasureTTI: TTI=100"],
        &["I/MeasureTTI: TTI=300"],
    ]);
    let variants = vec![variant("v8", "V8_DIST_REPO")];
    let orchestrator = SuiteOrchestrator::new(&port, variants, 1, DEADLINE, &fixture);

    let report = orchestrator
        .run_tti(&[1024 * 1024, 2 * 1024 * 1024])
        .unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.entries[0].case, "1MiB");
    assert_eq!(report.entries[1].case, "2MiB");
    assert_eq!(report.entries[0].metrics["tti"], 100);
    assert_eq!(report.entries[1].metrics["tti"], 300);

    // One reinstall per measurement point, inside the fixture scope.
    let installs = port
        .calls()
        .iter()
        .filter(|c| c.starts_with("install"))
        .count();
    assert_eq!(installs, 2);

    assert_eq!(fs::read(&fixture).unwrap(), b"{\"real\":1}");
}

#[test]
fn test_tti_suite_report_text() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("data.json");
    fs::write(&fixture, b"{}").unwrap();

    let port = MockPort::new(&[&["I/MeasureTTI: TTI=42"]]);
    let variants = vec![variant("v8", "V8_DIST_REPO")];
    let orchestrator = SuiteOrchestrator::new(&port, variants, 1, DEADLINE, &fixture);

    let report = orchestrator.run_tti(&[3 * 1024 * 1024]).unwrap();
    let text = report.format_text();
    assert!(text.contains("TTI Suite"));
    assert!(text.contains("TTI 3MiB"));
    assert!(text.contains("tti=42"));
}
