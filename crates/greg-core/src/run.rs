use std::{fmt, panic, path::Path, path::PathBuf, thread};

use camino::Utf8PathBuf;
use greg_domain::{
    discover_workspace_root, enumerate_packages, read_manifest, PackageEntry, RootManifest,
    WorkspaceError, MANIFEST_FILE,
};
use tracing::debug;

use crate::effects::TaskRunner;
use crate::process::RunOutput;
use crate::report::{column_width, Reporter, StatusLine};
use crate::scope::{apply_scope, ScopeSet};

/// Substring npm prints on stderr when `npm run` cannot find the script.
///
/// Matching on it is a heuristic: it depends on the runner's wording and is
/// only consulted after the manifest already declared the script.
pub const MISSING_SCRIPT_MARKER: &str = "missing script";

/// A script invocation requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub script: String,
    pub args: Vec<String>,
    pub scope: Vec<String>,
}

impl RunRequest {
    #[must_use]
    pub fn new(script: impl Into<String>, args: Vec<String>, scope: Vec<String>) -> Self {
        Self {
            script: script.into(),
            args,
            scope,
        }
    }

    /// Arguments handed to the task runner: `run <script> <args...>`.
    #[must_use]
    pub fn runner_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        args.push("run".to_string());
        args.push(self.script.clone());
        args.extend(self.args.iter().cloned());
        args
    }

    fn command_line(&self, program: &str) -> String {
        let mut parts = vec![program.to_string()];
        parts.extend(self.runner_args());
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Manifest,
    Spawn,
    Exit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Manifest => "manifest",
            Phase::Spawn => "spawn",
            Phase::Exit => "exit",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Manifest(#[from] WorkspaceError),
    #[error("failed to start `{program}`: {reason}")]
    RunnerSpawnFailed { program: String, reason: String },
    #[error("`{command}` exited with status {code}")]
    RunnerNonZeroExit { command: String, code: i32 },
}

impl RunError {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            RunError::Manifest(_) => Phase::Manifest,
            RunError::RunnerSpawnFailed { .. } => Phase::Spawn,
            RunError::RunnerNonZeroExit { .. } => Phase::Exit,
        }
    }
}

/// What happened to a single package during a run.
#[derive(Debug)]
pub enum RunResult {
    Ran { code: i32 },
    SkippedNotInScope,
    SkippedScriptUndefined,
    Failed(RunError),
}

impl RunResult {
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            RunResult::SkippedNotInScope | RunResult::SkippedScriptUndefined
        )
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, RunResult::Failed(_))
    }
}

#[derive(Debug)]
pub struct PackageOutcome {
    pub dir: Utf8PathBuf,
    pub result: RunResult,
}

#[derive(Debug)]
pub struct RunSummary {
    pub root: PathBuf,
    /// One entry per enumerated package, in enumeration order.
    pub outcomes: Vec<PackageOutcome>,
}

impl RunSummary {
    #[must_use]
    pub fn ran(&self) -> usize {
        self.count(|result| matches!(result, RunResult::Ran { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(RunResult::is_skip)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(RunResult::is_failure)
    }

    /// `1` when any package failed, `0` otherwise. Skips never fail a run.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(self.failed() > 0)
    }

    fn count(&self, predicate: impl Fn(&RunResult) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.result))
            .count()
    }
}

/// True when a failed runner process only complained that the script is missing.
#[must_use]
pub fn is_missing_script_failure(output: &RunOutput) -> bool {
    !output.success()
        && output
            .stderr
            .to_ascii_lowercase()
            .contains(MISSING_SCRIPT_MARKER)
}

/// Locates the workspace around `start` and runs `request` in every package.
///
/// Packages run concurrently; a failure in one never stops the others and is
/// recorded in the returned summary instead.
///
/// # Errors
///
/// Returns an error before any package is touched when no workspace root is
/// found, the root manifest cannot be read or parsed, or a workspace pattern
/// is invalid.
pub fn run_workspace(
    start: &Path,
    request: &RunRequest,
    runner: &dyn TaskRunner,
    reporter: &dyn Reporter,
) -> Result<RunSummary, WorkspaceError> {
    let root = discover_workspace_root(start)?;
    let manifest: RootManifest = read_manifest(&root.join(MANIFEST_FILE))?;
    let packages = enumerate_packages(&root, manifest.workspace_patterns())?;
    let width = column_width(&packages);
    let scope = ScopeSet::new(&root, &request.scope);
    let (in_scope, out_of_scope) = apply_scope(&packages, &scope);
    debug!(
        root = %root.display(),
        packages = packages.len(),
        in_scope = in_scope.len(),
        script = %request.script,
        "running workspace script"
    );

    let mut outcomes: Vec<PackageOutcome> = out_of_scope
        .into_iter()
        .map(|package| {
            reporter.skipped(&StatusLine::skip(package.dir(), width));
            PackageOutcome {
                dir: package.dir().to_path_buf(),
                result: RunResult::SkippedNotInScope,
            }
        })
        .collect();

    let ran = thread::scope(|s| {
        let handles: Vec<_> = in_scope
            .iter()
            .map(|package| {
                let package: &PackageEntry = package;
                s.spawn(move || run_package(package, request, runner, reporter, width))
            })
            .collect();
        in_scope
            .iter()
            .zip(handles)
            .map(|(package, handle)| PackageOutcome {
                dir: package.dir().to_path_buf(),
                result: handle
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload)),
            })
            .collect::<Vec<_>>()
    });
    outcomes.extend(ran);
    outcomes.sort_by(|a, b| a.dir.cmp(&b.dir));

    let summary = RunSummary { root, outcomes };
    debug!(
        ran = summary.ran(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "workspace run finished"
    );
    Ok(summary)
}

fn run_package(
    package: &PackageEntry,
    request: &RunRequest,
    runner: &dyn TaskRunner,
    reporter: &dyn Reporter,
    width: usize,
) -> RunResult {
    let result = execute_package(package, request, runner, reporter, width);
    if let RunResult::Failed(err) = &result {
        reporter.failed(package.dir(), err);
    }
    result
}

fn execute_package(
    package: &PackageEntry,
    request: &RunRequest,
    runner: &dyn TaskRunner,
    reporter: &dyn Reporter,
    width: usize,
) -> RunResult {
    let manifest = match package.read_manifest() {
        Ok(manifest) => manifest,
        Err(err) => {
            reporter.skipped(&StatusLine::skip(package.dir(), width));
            return RunResult::Failed(err.into());
        }
    };
    if !manifest.declares_script(&request.script) {
        debug!(
            package = %package.dir(),
            script = %request.script,
            available = ?manifest.script_names().collect::<Vec<_>>(),
            "script not declared; skipping"
        );
        reporter.skipped(&StatusLine::skip(package.dir(), width));
        return RunResult::SkippedScriptUndefined;
    }

    let command = request.command_line(runner.program());
    reporter.running(&StatusLine::new(package.dir(), command.clone(), width));
    let output = match runner.run(&package.absolute_dir(), &request.runner_args()) {
        Ok(output) => output,
        Err(err) => {
            return RunResult::Failed(RunError::RunnerSpawnFailed {
                program: runner.program().to_string(),
                reason: format!("{err:#}"),
            })
        }
    };
    if output.success() {
        RunResult::Ran { code: output.code }
    } else if is_missing_script_failure(&output) {
        debug!(
            package = %package.dir(),
            code = output.code,
            "runner reported a missing script; treating as skip"
        );
        RunResult::SkippedScriptUndefined
    } else {
        RunResult::Failed(RunError::RunnerNonZeroExit {
            command,
            code: output.code,
        })
    }
}
