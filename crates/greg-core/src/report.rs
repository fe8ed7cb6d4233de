use std::fmt;

use camino::Utf8Path;
use greg_domain::PackageEntry;

use crate::run::RunError;

/// Gap between the longest package directory and the status column, colon included.
pub const COLUMN_MARGIN: usize = 2;

pub const SKIP_STATUS: &str = "skip";

/// Width of the `<dir>:` column shared by every status line of a run.
#[must_use]
pub fn column_width(packages: &[PackageEntry]) -> usize {
    packages
        .iter()
        .map(|package| package.dir().as_str().chars().count())
        .max()
        .unwrap_or(0)
        + COLUMN_MARGIN
}

/// One aligned `<dir>:<padding><status>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    dir: String,
    status: String,
    width: usize,
}

impl StatusLine {
    #[must_use]
    pub fn new(dir: &Utf8Path, status: impl Into<String>, width: usize) -> Self {
        Self {
            dir: dir.to_string(),
            status: status.into(),
            width,
        }
    }

    #[must_use]
    pub fn skip(dir: &Utf8Path, width: usize) -> Self {
        Self::new(dir, SKIP_STATUS, width)
    }

    #[must_use]
    pub fn dir(&self) -> &str {
        &self.dir
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// The `<dir>:` label padded to the column width.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:<width$}", format!("{}:", self.dir), width = self.width)
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label(), self.status)
    }
}

/// Sink for per-package progress. Called concurrently from package workers.
pub trait Reporter: Sync {
    fn running(&self, line: &StatusLine);
    fn skipped(&self, line: &StatusLine);
    fn failed(&self, package: &Utf8Path, error: &RunError);
}
