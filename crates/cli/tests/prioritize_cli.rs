//! Runs the `qscheduler-prioritize` binary against snapshot files.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

const POOL: &str = r#"
[config.account_configs.a1]
max_fanout = 1

[state.balances]
a1 = [0.0, 1.0]

[[state.requests]]
id = "r1"
account_id = "a1"
enqueue_time = { seconds = 1700000000 }

[[state.requests]]
id = "r2"
account_id = "a1"
enqueue_time = { seconds = 1700000060 }
"#;

fn snapshot_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// The binary with no snapshot or format configured through the environment.
#[allow(deprecated)]
fn prioritize_cmd() -> Command {
    let mut cmd = Command::cargo_bin("qscheduler-prioritize").expect("binary should be built");
    cmd.env_remove("QSCHEDULER_SNAPSHOT");
    cmd.env_remove("QSCHEDULER_FORMAT");
    cmd
}

#[test]
fn prints_text_bands() {
    let file = snapshot_file(".toml", POOL);
    prioritize_cmd()
        .arg("--snapshot")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            "P1 (1 request)\n\
             \x20 r1  account=a1  enqueued=2023-11-14T22:13:20Z\n\
             FreeBucket (1 request)\n\
             \x20 r2  account=a1  enqueued=2023-11-14T22:14:20Z\n",
        );
}

#[test]
fn prints_json_for_one_band() {
    let file = snapshot_file(".toml", POOL);
    let output = prioritize_cmd()
        .arg("--snapshot")
        .arg(file.path())
        .args(["--format", "json", "--priority", "1"])
        .output()
        .expect("qscheduler-prioritize should execute");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let band = value.as_array().unwrap();
    assert_eq!(band.len(), 1);
    assert_eq!(band[0]["request"]["id"], "r1");
    assert_eq!(band[0]["priority"], 1);
}

#[test]
fn reads_json_snapshots_from_env() {
    let json = r#"{
        "state": {
            "balances": { "a1": [2.0] },
            "requests": [ { "id": "r1", "account_id": "a1" } ]
        }
    }"#;
    let file = snapshot_file(".json", json);
    let output = prioritize_cmd()
        .env("QSCHEDULER_SNAPSHOT", file.path())
        .env("QSCHEDULER_FORMAT", "json")
        .output()
        .expect("qscheduler-prioritize should execute");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["priority"], 0);
}

#[test]
fn fails_on_invalid_snapshot() {
    let file = snapshot_file(".toml", "[[state.requests]]\nid = \"\"\n");
    prioritize_cmd()
        .arg("--snapshot")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load snapshot"))
        .stderr(predicate::str::contains("empty request id"));
}

#[test]
fn requires_a_snapshot() {
    prioritize_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--snapshot"));
}
