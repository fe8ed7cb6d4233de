use std::env;

use atty::Stream;
use clap::Parser;
use color_eyre::Result;
use greg_core::{run_workspace, Config, GlobalOptions, RunRequest, SystemTaskRunner};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
mod output;
mod style;

use cli::GregCli;
use output::{error_chain, ConsoleReporter};
use style::Style;

/// Exit code when the workspace itself could not be loaded. `2` stays with
/// clap for usage errors.
const FATAL_EXIT_CODE: i32 = 3;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = GregCli::parse();
    let config = Config::from_env();
    let global = GlobalOptions {
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    init_tracing(&global, config.log_level());

    let cwd = env::current_dir()?;
    let request = RunRequest::new(cli.script, cli.args, cli.scope);
    let runner = SystemTaskRunner::new(config.runner());
    let reporter = ConsoleReporter::new(Style::new(global.no_color, atty::is(Stream::Stdout)));

    let code = match run_workspace(&cwd, &request, &runner, &reporter) {
        Ok(summary) => {
            debug!(
                root = %summary.root.display(),
                ran = summary.ran(),
                skipped = summary.skipped(),
                failed = summary.failed(),
                "done"
            );
            summary.exit_code()
        }
        Err(err) => {
            error!("{}", error_chain(&err));
            FATAL_EXIT_CODE
        }
    };

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(global: &GlobalOptions, log_level: Option<&str>) {
    let level = log_level.unwrap_or(match global.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    });

    let filter = format!("greg={level},greg_core={level},greg_domain={level}");
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!global.no_color && atty::is(Stream::Stderr))
        .with_target(false)
        .with_level(true)
        .without_time()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
