use std::collections::HashMap;
use std::env;

pub const RUNNER_ENV: &str = "GREG_RUNNER";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
const DEFAULT_RUNNER: &str = "npm";

/// Flags shared by every invocation, independent of the script being run.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub verbose: u8,
    pub no_color: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    runner: String,
    log_level: Option<String>,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_snapshot(&EnvSnapshot::capture())
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> Self {
        Self {
            runner: snapshot
                .var(RUNNER_ENV)
                .unwrap_or(DEFAULT_RUNNER)
                .to_string(),
            log_level: snapshot.var(LOG_LEVEL_ENV).map(str::to_ascii_lowercase),
        }
    }

    /// Program invoked as `<runner> run <script>` in each package.
    #[must_use]
    pub fn runner(&self) -> &str {
        &self.runner
    }

    /// Log level requested through `LOG_LEVEL`, if any.
    #[must_use]
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }
}
