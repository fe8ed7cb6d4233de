#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::{assert::Assert, cargo::cargo_bin_cmd};
use serde_json::json;
use tempfile::TempDir;

/// Shell stand-in for `npm`: logs `<package dir name> <args>` and fails when
/// the package contains a `fail` or `missing` marker file.
const FAKE_RUNNER: &str = r#"#!/bin/sh
printf '%s %s\n' "$(basename "$(pwd)")" "$*" >> "$GREG_TEST_LOG"
if [ -f missing ]; then
  echo "npm ERR! Missing script: \"$2\"" >&2
  exit 1
fi
if [ -f fail ]; then
  echo "boom" >&2
  exit 1
fi
exit 0
"#;

pub struct Workspace {
    pub temp: TempDir,
    pub root: PathBuf,
    pub runner: PathBuf,
    pub log: PathBuf,
}

impl Workspace {
    pub fn package(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn mark(&self, rel: &str, marker: &str) {
        fs::write(self.package(rel).join(marker), "").expect("write marker");
    }

    /// Lines the fake runner logged, sorted.
    pub fn runner_calls(&self) -> Vec<String> {
        let mut lines: Vec<String> = fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect();
        lines.sort();
        lines
    }

    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("greg");
        cmd.current_dir(&self.root)
            .env("GREG_RUNNER", &self.runner)
            .env("GREG_TEST_LOG", &self.log)
            .env("NO_COLOR", "1")
            .env_remove("LOG_LEVEL");
        cmd
    }
}

/// `packages/a` declares `build`, `packages/b` declares `test`.
pub fn two_package_workspace(prefix: &str) -> Workspace {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let root = temp.path().join("mono");
    write_manifest(&root, &json!({"name": "mono", "workspaces": ["packages/*"]}));
    write_manifest(
        &root.join("packages/a"),
        &json!({"name": "a", "scripts": {"build": "tsc"}}),
    );
    write_manifest(
        &root.join("packages/b"),
        &json!({"name": "b", "scripts": {"test": "jest"}}),
    );
    let runner = temp.path().join("fake-npm");
    install_runner(&runner);
    let log = temp.path().join("runner.log");
    Workspace {
        temp,
        root,
        runner,
        log,
    }
}

pub fn write_manifest(dir: &Path, value: &serde_json::Value) {
    fs::create_dir_all(dir).expect("create package dir");
    fs::write(
        dir.join("package.json"),
        serde_json::to_string_pretty(value).expect("manifest json"),
    )
    .expect("write manifest");
}

fn install_runner(path: &Path) {
    fs::write(path, FAKE_RUNNER).expect("write fake runner");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod runner");
    }
}

pub fn stdout_lines(assert: &Assert) -> Vec<String> {
    let mut lines: Vec<String> = String::from_utf8_lossy(&assert.get_output().stdout)
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).to_string()
}
