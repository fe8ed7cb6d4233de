use std::error::Error;

use camino::Utf8Path;
use greg_core::{Reporter, RunError, StatusLine};
use tracing::error;

use crate::style::Style;

/// Prints status lines to stdout and failures as `error` log events.
pub struct ConsoleReporter {
    style: Style,
}

impl ConsoleReporter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }

    fn render(&self, line: &StatusLine, status: String) -> String {
        format!("{}{status}", self.style.label(&line.label()))
    }
}

impl Reporter for ConsoleReporter {
    fn running(&self, line: &StatusLine) {
        println!("{}", self.render(line, self.style.running(line.status())));
    }

    fn skipped(&self, line: &StatusLine) {
        println!("{}", self.render(line, self.style.skipped(line.status())));
    }

    fn failed(&self, package: &Utf8Path, err: &RunError) {
        error!(
            package = %package,
            phase = %err.phase(),
            "{}",
            error_chain(err)
        );
    }
}

/// `outer: cause: root cause` for an error and its sources.
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
