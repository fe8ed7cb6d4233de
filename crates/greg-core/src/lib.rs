#![deny(clippy::all)]

pub mod config;
pub mod effects;
pub mod process;
pub mod report;
pub mod run;
pub mod scope;

pub use greg_domain::{PackageEntry, WorkspaceError};

pub use crate::config::{Config, GlobalOptions};
pub use crate::effects::{SystemTaskRunner, TaskRunner};
pub use crate::process::RunOutput;
pub use crate::report::{column_width, Reporter, StatusLine};
pub use crate::run::{
    is_missing_script_failure, run_workspace, PackageOutcome, Phase, RunError, RunRequest,
    RunResult, RunSummary, MISSING_SCRIPT_MARKER,
};
pub use crate::scope::{apply_scope, ScopeSet};
