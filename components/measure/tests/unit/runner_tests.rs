use crate::mock_port::MockPort;
use dist_cache::Abi;
use measure::{
    average, InstallRequest, MeasureError, MeasurementRunner, ThroughputRunner, TtiMeasurement,
};
use std::fs;
use std::time::Duration;

const DEADLINE: Option<Duration> = Some(Duration::from_millis(200));

fn install_request(app_id: &str) -> InstallRequest {
    InstallRequest {
        app_id: app_id.to_string(),
        maven_repo_prop: format!("V8_DIST_REPO=/js_dist/{}/package/dist", app_id),
        abi: Abi::Armv7,
        verbose: false,
    }
}

#[test]
fn test_throughput_trial_sequence() {
    let port = MockPort::new(&[&["I/ReactNativeJS: count=7"]]);
    let mut runner = ThroughputRunner::new(&port, "v8", 10_000, DEADLINE);

    let trial = runner.run_trial().unwrap();
    assert_eq!(trial.metrics["result"], 7);
    assert_eq!(trial.metrics["memory"], 4096);

    let calls = port.calls();
    assert_eq!(
        calls,
        vec![
            "stop_all_apps",
            "clear_log",
            "start v8/RenderComponentThroughput?interval=10000",
            "read_log_stream",
            "read_memory v8",
        ]
    );
}

#[test]
fn test_throughput_average_over_trials() {
    let port = MockPort::new(&[
        &["count=10"],
        &["count=20"],
        &["noise", "count=30", "count=999"],
    ]);
    let mut runner = ThroughputRunner::new(&port, "jsc", 10_000, DEADLINE);

    let avg = average(&mut runner, 3).unwrap();
    assert_eq!(avg.metrics["result"], 20);
    assert_eq!(avg.metrics["memory"], 4096);
}

#[test]
fn test_throughput_missing_signal_is_fatal() {
    // Empty script: the waiter sees no count line and hits the deadline.
    let port = MockPort::new(&[]);
    let mut runner = ThroughputRunner::new(&port, "v8", 10_000, DEADLINE);

    let err = runner.run_trial().unwrap_err();
    assert!(matches!(err, MeasureError::Timeout { .. }));
}

#[test]
fn test_tti_measurement_reinstalls_and_averages() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("data.json");
    fs::write(&fixture, b"{\"real\":1}").unwrap();

    let port = MockPort::new(&[
        &["I/MeasureTTI: TTI=100"],
        &["I/Other: TTI=999", "I/MeasureTTI: TTI=200"],
    ]);
    let measurement = TtiMeasurement::new("v8", 64, &fixture, 2, DEADLINE);

    let avg = measurement.run(&port, &install_request("v8")).unwrap();
    assert_eq!(avg.metrics["tti"], 150);

    let calls = port.calls();
    assert_eq!(calls[0], "install v8 V8_DIST_REPO=/js_dist/v8/package/dist");
    assert_eq!(calls.iter().filter(|c| *c == "clear_log").count(), 2);

    // Fixture back to its original content, no backup left behind.
    assert_eq!(fs::read(&fixture).unwrap(), b"{\"real\":1}");
    assert!(!dir.path().join("data.json.bak").exists());
}

#[test]
fn test_tti_measurement_restores_fixture_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("data.json");
    fs::write(&fixture, b"{\"real\":1}").unwrap();

    let mut port = MockPort::new(&[]);
    port.fail_install = true;
    let measurement = TtiMeasurement::new("v8", 64, &fixture, 2, DEADLINE);

    let err = measurement.run(&port, &install_request("v8")).unwrap_err();
    assert!(matches!(err, MeasureError::Device { .. }));

    assert_eq!(fs::read(&fixture).unwrap(), b"{\"real\":1}");
    assert!(!dir.path().join("data.json.bak").exists());
}

#[test]
fn test_tti_swaps_fixture_before_install() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = dir.path().join("data.json");
    fs::write(&fixture, b"{\"real\":1}").unwrap();

    // Install fails immediately; if the swap happened first, the backup
    // must have existed at failure time and been restored afterwards.
    let mut port = MockPort::new(&[]);
    port.fail_install = true;
    let measurement = TtiMeasurement::new("v8", 32, &fixture, 1, DEADLINE);
    measurement.run(&port, &install_request("v8")).unwrap_err();

    assert_eq!(port.calls().len(), 1);
    assert_eq!(fs::read(&fixture).unwrap(), b"{\"real\":1}");
}
