//! # CLI Integration Tests / CLI 集成测试
//!
//! Runs the `capture-replay-check` binary end to end. Precondition checks
//! work everywhere; the full runs use shell-script stand-ins for `gapit` and
//! `adb` and are Unix-only.
//!
//! 端到端运行 `capture-replay-check` 二进制文件。前置条件检查在所有平台上运行；
//! 完整运行使用 shell 脚本替代 `gapit` 和 `adb`，仅限 Unix。

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn check_cmd() -> Command {
    let mut cmd = Command::cargo_bin("capture-replay-check").unwrap();
    cmd.arg("--lang").arg("en");
    cmd
}

#[test]
fn test_missing_positional_arguments() {
    check_cmd().assert().failure();
}

#[test]
fn test_agi_dir_must_exist() {
    let temp_dir = common::temp();
    let params = common::write_params(temp_dir.path());

    check_cmd()
        .arg(temp_dir.path().join("no_such_build"))
        .arg(temp_dir.path())
        .arg("--params")
        .arg(&params)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid AGI build directory"));
}

#[test]
fn test_out_dir_must_be_a_directory() {
    let temp_dir = common::temp();
    let params = common::write_params(temp_dir.path());

    check_cmd()
        .arg(temp_dir.path())
        .arg(&params)
        .arg("--params")
        .arg(&params)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid output directory"));
}

#[test]
fn test_missing_required_parameter() {
    let temp_dir = common::temp();
    let params = temp_dir.path().join("params.json");
    std::fs::write(&params, r#"{"apk": "app.apk", "package": "com.example.app"}"#).unwrap();

    check_cmd()
        .arg(temp_dir.path())
        .arg(temp_dir.path())
        .arg("--params")
        .arg(&params)
        .assert()
        .failure()
        .stderr(predicate::str::contains("activity"));
}

#[cfg(unix)]
#[test]
fn test_successful_run() {
    let agi_dir = common::temp();
    let out_dir = common::temp();
    let adb = common::install_fake_tools(agi_dir.path());
    let params = common::write_params(agi_dir.path());
    let html = out_dir.path().join("report.html");

    check_cmd()
        .arg(agi_dir.path())
        .arg(out_dir.path())
        .arg("--params")
        .arg(&params)
        .arg("--adb")
        .arg(&adb)
        .arg("--html")
        .arg(&html)
        .assert()
        .success()
        .stdout(predicate::str::contains("CAPTURE/REPLAY CHECK PASSED"));

    for suffix in ["gfxtrace", "frame.png", "png", "profiling.json", "framegraph.json"] {
        assert!(common::artifact(out_dir.path(), suffix).exists(), "missing {suffix}");
    }
    let page = std::fs::read_to_string(&html).unwrap();
    assert!(page.contains("com.example.app"));
}

#[cfg(unix)]
#[test]
fn test_video_failure_exit_code() {
    let agi_dir = common::temp();
    let out_dir = common::temp();
    let adb = common::install_fake_tools(agi_dir.path());
    let params = common::write_params(agi_dir.path());

    check_cmd()
        .arg(agi_dir.path())
        .arg(out_dir.path())
        .arg("--params")
        .arg(&params)
        .arg("--adb")
        .arg(&adb)
        .env("FAKE_GAPIT_FAIL_VIDEO", "2")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("STEP FAILURE DETECTED"))
        .stdout(predicate::str::contains("gapit video failed"));

    for suffix in ["png", "profiling.json", "framegraph.json"] {
        assert!(!common::artifact(out_dir.path(), suffix).exists(), "unexpected {suffix}");
    }
}

#[cfg(unix)]
#[test]
fn test_install_failure_exit_code() {
    let agi_dir = common::temp();
    let out_dir = common::temp();
    let adb = common::install_fake_tools(agi_dir.path());
    let params = common::write_params(agi_dir.path());

    check_cmd()
        .arg(agi_dir.path())
        .arg(out_dir.path())
        .arg("--params")
        .arg(&params)
        .arg("--adb")
        .arg(&adb)
        .env("FAKE_ADB_EXIT", "9")
        .assert()
        .code(1);

    assert!(!common::artifact(out_dir.path(), "gfxtrace").exists());
}
