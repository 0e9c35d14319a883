use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const SERVICE: &str = "\
service: demo
provider:
  name: aws
  runtime: nodejs18.x
functions:
  fnA:
    handler: a/b.handlerA
  fnB:
    handler: c.handlerB
    recap-dev:
      disable: true
  fnC:
    handler: py/app.main
    runtime: python3.11
";

fn recap_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("recap"));
    cmd.current_dir(dir).env("NO_COLOR", "1").env("RUST_LOG", "warn");
    cmd
}

fn service_dir(manifest_deps: Option<&str>) -> TempDir {
    let dir = TempDir::new().expect("service dir");
    fs::write(dir.path().join("serverless.yml"), SERVICE).expect("write service");
    if let Some(deps) = manifest_deps {
        fs::write(
            dir.path().join("package.json"),
            format!(r#"{{"dependencies": {{{deps}}}}}"#),
        )
        .expect("write manifest");
    }
    dir
}

const CLIENT: &str = r#""@recap.dev/client": "^1.0.0""#;

#[test]
fn run_writes_wrapper_and_rewritten_service() {
    let dir = service_dir(Some(CLIENT));
    recap_cmd(dir.path())
        .args(["run", "--output", "out/serverless.yml"])
        .assert()
        .success()
        .stdout(contains("wrapped 1 function(s)"))
        .stdout(contains("fnA → recap.dev_handlers/fnA-recap-dev.handlerA"))
        .stdout(contains("fnB (disabled)"))
        .stdout(contains("runtime \"python3.11\" not supported"));

    let wrapper = fs::read_to_string(dir.path().join("recap.dev_handlers/fnA-recap-dev.js"))
        .expect("wrapper written");
    assert!(wrapper.contains("require('../a/b.js')"));

    let rewritten = fs::read_to_string(dir.path().join("out/serverless.yml")).expect("output");
    assert!(rewritten.contains("handler: recap.dev_handlers/fnA-recap-dev.handlerA"));
    assert!(rewritten.contains("handler: c.handlerB"));

    let original = fs::read_to_string(dir.path().join("serverless.yml")).unwrap();
    assert_eq!(original, SERVICE, "source service file is never rewritten");
}

#[test]
fn run_fails_when_client_not_declared() {
    let dir = service_dir(Some(r#""lodash": "^4""#));
    recap_cmd(dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(contains("@recap.dev/client"));
    assert!(!dir.path().join("recap.dev_handlers").exists());
}

#[test]
fn run_without_manifest_succeeds() {
    let dir = service_dir(None);
    recap_cmd(dir.path())
        .arg("run")
        .assert()
        .success()
        .stderr(contains("could not verify @recap.dev/client"));
    assert!(dir.path().join("recap.dev_handlers/fnA-recap-dev.js").exists());
}

#[test]
fn dry_run_prints_config_and_writes_nothing() {
    let dir = service_dir(Some(CLIENT));
    recap_cmd(dir.path())
        .args(["run", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("handler: recap.dev_handlers/fnA-recap-dev.handlerA"))
        .stderr(contains("[dry-run]"));
    assert!(!dir.path().join("recap.dev_handlers").exists());
}

#[test]
fn run_without_output_prints_rewritten_service() {
    let dir = service_dir(Some(CLIENT));
    let output = recap_cmd(dir.path()).arg("run").output().expect("run recap");
    assert!(output.status.success());
    assert!(dir.path().join("recap.dev_handlers/fnA-recap-dev.js").exists());

    let printed: serde_yaml::Value =
        serde_yaml::from_slice(&output.stdout).expect("stdout is the service YAML");
    assert_eq!(
        printed["functions"]["fnA"]["handler"],
        "recap.dev_handlers/fnA-recap-dev.handlerA"
    );
    assert_eq!(printed["functions"]["fnB"]["handler"], "c.handlerB");
    let summary = String::from_utf8_lossy(&output.stderr);
    assert!(summary.contains("wrapped 1 function(s)"));
}

#[test]
fn service_dir_flag_works_from_elsewhere() {
    let dir = service_dir(Some(CLIENT));
    let elsewhere = TempDir::new().unwrap();
    recap_cmd(elsewhere.path())
        .arg("run")
        .arg("--service-dir")
        .arg(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("recap.dev_handlers/fnA-recap-dev.js").exists());
}

#[test]
fn artifact_hook_cleans_up() {
    let dir = service_dir(Some(CLIENT));
    recap_cmd(dir.path())
        .args(["hook", "after:package:initialize"])
        .assert()
        .success();
    assert!(dir.path().join("recap.dev_handlers").exists());

    recap_cmd(dir.path())
        .args(["hook", "after:package:createDeploymentArtifacts"])
        .assert()
        .success()
        .stdout(contains("removed generated handlers"));
    assert!(!dir.path().join("recap.dev_handlers").exists());
}

#[test]
fn unknown_hook_is_rejected() {
    let dir = service_dir(Some(CLIENT));
    recap_cmd(dir.path())
        .args(["hook", "before:deploy:deploy"])
        .assert()
        .failure()
        .stderr(contains("unknown lifecycle event"))
        .stderr(contains("recap:run:init"));
}

#[test]
fn clean_is_idempotent() {
    let dir = service_dir(Some(CLIENT));
    recap_cmd(dir.path()).arg("clean").assert().success().stdout(contains("nothing to clean"));
}

#[test]
fn list_json_reports_functions_and_skips() {
    let dir = service_dir(None);
    let output = recap_cmd(dir.path())
        .args(["list", "--json"])
        .output()
        .expect("run recap list");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["handlers_dir"], "recap.dev_handlers");
    assert_eq!(json["functions"][0]["key"], "fnA");
    assert_eq!(json["functions"][0]["method"], "handlerA");
    assert_eq!(json["skipped"][0]["reason"], "disabled");
    assert_eq!(json["skipped"][1]["reason"], "unsupported_runtime");
    assert!(!dir.path().join("recap.dev_handlers").exists());
}

#[test]
fn missing_service_file_is_reported() {
    let dir = TempDir::new().unwrap();
    recap_cmd(dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(contains("service configuration not found"));
}
