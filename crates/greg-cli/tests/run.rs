#![cfg(unix)]

use std::fs;

mod common;

use common::{stderr, stdout_lines, two_package_workspace, write_manifest};
use serde_json::json;

#[test]
fn runs_script_where_declared_and_skips_elsewhere() {
    let ws = two_package_workspace("greg-build");

    let assert = ws.command().arg("build").assert().success();

    let lines = stdout_lines(&assert);
    assert_eq!(lines.len(), 2, "one line per package: {lines:?}");
    assert!(
        lines[0].starts_with("packages/a: ") && lines[0].ends_with("run build"),
        "run line should be aligned and name the command: {lines:?}"
    );
    assert_eq!(lines[1], "packages/b: skip");
    assert_eq!(ws.runner_calls(), ["a run build"]);
}

#[test]
fn verbose_skip_lists_declared_scripts() {
    let ws = two_package_workspace("greg-verbose");

    let assert = ws.command().args(["-v", "build"]).assert().success();

    let err = stderr(&assert);
    assert!(err.contains("script not declared"), "debug skip event: {err}");
    assert!(err.contains(r#"available=["test"]"#), "declared scripts: {err}");
}

#[test]
fn scope_limits_runs_to_named_directories() {
    let ws = two_package_workspace("greg-scope");

    let assert = ws
        .command()
        .args(["build", "--scope", "packages/b"])
        .assert()
        .success();

    assert_eq!(
        stdout_lines(&assert),
        ["packages/a: skip", "packages/b: skip"]
    );
    assert!(ws.runner_calls().is_empty());
}

#[test]
fn repeated_scopes_and_forwarded_args() {
    let ws = two_package_workspace("greg-args");
    write_manifest(
        &ws.package("packages/b"),
        &json!({"name": "b", "scripts": {"build": "tsc -b"}}),
    );
    write_manifest(
        &ws.package("packages/c"),
        &json!({"name": "c", "scripts": {"build": "tsc"}}),
    );

    ws.command()
        .args(["build", "-s", "packages/a", "--scope", "./packages/b/"])
        .args(["--", "--prod", "fast"])
        .assert()
        .success();

    assert_eq!(
        ws.runner_calls(),
        ["a run build --prod fast", "b run build --prod fast"]
    );
}

#[test]
fn hyphenated_args_forward_without_separator() {
    let ws = two_package_workspace("greg-hyphen");

    ws.command()
        .args(["build", "--prod", "-x"])
        .assert()
        .success();

    assert_eq!(ws.runner_calls(), ["a run build --prod -x"]);
}

#[test]
fn runs_from_a_package_subdirectory_use_the_nearest_manifest() {
    let ws = two_package_workspace("greg-nested");
    let nested = ws.package("packages/a/src");
    fs::create_dir_all(&nested).expect("nested dir");

    let assert = ws.command().current_dir(&nested).arg("build").assert().success();

    assert!(stdout_lines(&assert).is_empty());
    assert!(ws.runner_calls().is_empty());
}

#[test]
fn missing_workspace_root_is_fatal() {
    let ws = two_package_workspace("greg-noroot");
    let outside = ws.temp.path().join("outside");
    fs::create_dir_all(&outside).expect("outside dir");

    let assert = ws.command().current_dir(&outside).arg("build").assert().code(3);

    assert!(stdout_lines(&assert).is_empty());
    assert!(
        stderr(&assert).contains("no package.json found"),
        "root error should be logged: {}",
        stderr(&assert)
    );
}

#[test]
fn malformed_root_manifest_is_fatal() {
    let ws = two_package_workspace("greg-badroot");
    fs::write(ws.root.join("package.json"), "{ \"workspaces\": [").expect("write root");

    let assert = ws.command().arg("build").assert().code(3);

    assert!(stdout_lines(&assert).is_empty());
    assert!(stderr(&assert).contains("failed to parse"));
}

#[test]
fn usage_errors_keep_clap_exit_code() {
    let ws = two_package_workspace("greg-usage");

    let assert = ws.command().args(["--scope", "packages/a"]).assert().code(2);

    assert!(stdout_lines(&assert).is_empty());
    assert!(ws.runner_calls().is_empty());
}

#[test]
fn missing_script_reported_by_runner_is_a_skip() {
    let ws = two_package_workspace("greg-missing");
    ws.mark("packages/a", "missing");

    let assert = ws.command().arg("build").assert().success();

    assert!(stderr(&assert).contains("Missing script"));
    assert_eq!(ws.runner_calls(), ["a run build"]);
}

#[test]
fn failing_script_sets_exit_code_without_stopping_siblings() {
    let ws = two_package_workspace("greg-fail");
    write_manifest(
        &ws.package("packages/b"),
        &json!({"name": "b", "scripts": {"build": "tsc"}}),
    );
    ws.mark("packages/a", "fail");

    let assert = ws.command().arg("build").assert().code(1);

    let err = stderr(&assert);
    assert!(err.contains("boom"), "child stderr should stream: {err}");
    assert!(
        err.contains("exited with status 1") && err.contains("packages/a"),
        "failure should be logged with its package: {err}"
    );
    assert_eq!(ws.runner_calls(), ["a run build", "b run build"]);
}

#[test]
fn unstartable_runner_fails_each_package() {
    let ws = two_package_workspace("greg-spawn");

    let assert = ws
        .command()
        .env("GREG_RUNNER", ws.temp.path().join("no-such-runner"))
        .arg("build")
        .assert()
        .code(1);

    assert!(stderr(&assert).contains("failed to start"));
}

#[test]
fn empty_workspace_succeeds_silently() {
    let ws = two_package_workspace("greg-empty");
    write_manifest(&ws.root, &json!({"name": "mono"}));

    let assert = ws.command().arg("build").assert().success();

    assert!(stdout_lines(&assert).is_empty());
}
