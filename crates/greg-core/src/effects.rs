use std::path::Path;

use anyhow::Result;

use crate::process::{run_command_streaming, RunOutput};

/// Spawns the external task runner for a single package.
pub trait TaskRunner: Send + Sync {
    /// Program name shown in status lines.
    fn program(&self) -> &str;

    /// Runs `<program> <args...>` in `cwd`, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process could not be started or waited
    /// on; a non-zero exit is reported through [`RunOutput::code`].
    fn run(&self, cwd: &Path, args: &[String]) -> Result<RunOutput>;
}

pub struct SystemTaskRunner {
    program: String,
}

impl SystemTaskRunner {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TaskRunner for SystemTaskRunner {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, cwd: &Path, args: &[String]) -> Result<RunOutput> {
        run_command_streaming(&self.program, args, cwd)
    }
}
