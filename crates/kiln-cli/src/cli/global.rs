//! Flags shared by every kiln subcommand.
//!
//! Flattened into [`super::Cli`] with `global = true`, so `kiln -v new shop`
//! and `kiln new shop -v` mean the same thing.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log level: warn by default, then info, debug and trace per `-v`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Warnings and errors
    -v      - One line per workflow step
    -vv     - Every rewritten file
    -vvv    - Trace"
    )]
    pub verbose: u8,

    /// Errors only; JSON documents are still written.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,

    /// Plain terminal output; also set by `NO_COLOR`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// A single config file used instead of the global and `.kiln.toml` ones.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        env = "KILN_CONFIG",
        help = "Use this configuration file only"
    )]
    pub config: Option<PathBuf>,

    /// Rendering of progress and results; `auto` picks by terminal.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    /// Colours and a progress spinner.
    Human,
    /// One uncoloured line per step.
    Plain,
    /// A single JSON document on stdout.
    Json,
}
