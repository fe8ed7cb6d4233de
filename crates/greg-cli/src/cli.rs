use clap::{ArgAction, Parser};

pub const GREG_AFTER_HELP: &str = concat!(
    "\x1b[1;36mExamples\x1b[0m\n",
    "  greg build                                   Run `npm run build` in every package declaring it\n",
    "  greg build --scope packages/foo              Only packages/foo\n",
    "  greg test -s packages/foo -s packages/bar    Only packages/foo and packages/bar\n",
    "  greg test --watch                            Forward `--watch` to every `npm run test`\n",
    "  greg test -s packages/foo -- --scope x       Use `--` to forward greg's own flags\n\n",
    "\x1b[1;36mExit codes\x1b[0m\n",
    "  0  every selected package succeeded or was skipped\n",
    "  1  at least one package failed\n",
    "  2  invalid command line\n",
    "  3  workspace could not be loaded\n\n",
    "\x1b[1;36mEnvironment\x1b[0m\n",
    "  LOG_LEVEL      error|warn|info|debug|trace (overrides -v)\n",
    "  GREG_RUNNER    Task runner program (default: npm)\n",
    "  NO_COLOR       Disable colored output\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "greg",
    author,
    version,
    about = "Run a package.json script in every workspace package.",
    after_help = GREG_AFTER_HELP
)]
pub struct GregCli {
    #[arg(value_name = "SCRIPT", help = "Script to run in each package that declares it")]
    pub script: String,
    #[arg(
        value_name = "ARG",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Extra arguments forwarded to the task runner; everything after the first one is forwarded as is"
    )]
    pub args: Vec<String>,
    #[arg(
        short,
        long,
        value_name = "DIR",
        action = ArgAction::Append,
        help = "Only run in this package directory (repeatable; relative to the workspace root)"
    )]
    pub scope: Vec<String>,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    pub verbose: u8,
    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}
