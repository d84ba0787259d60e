//! # kiln CLI
//!
//! Instantiates new projects from a template repository.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (defaults + files + env).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                 |
//! |------|-----------------------------------------|
//! |  0   | Success (possibly with warnings)        |
//! |  1   | Internal / system error, failed clone   |
//! |  2   | User / input error, project exists      |
//! |  3   | Resource not found                      |
//! |  4   | Configuration error, git not installed  |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod progress;

fn main() -> ExitCode {
    // Silently ignored if .env doesn't exist.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here and must exit 0.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        // `init` is how a missing or broken file gets (re)written.
        Err(e) if matches!(cli.command, Commands::Init(_)) => {
            debug!("Ignoring configuration for init: {e:#}");
            AppConfig::default()
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            eprintln!("Error: failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    let presentation = Presentation {
        verbose: cli.global.verbose > 0,
        json: output.is_json(),
        color: !cli.global.no_color
            && cli.global.output_format != OutputFormat::Plain
            && std::io::stderr().is_terminal(),
    };

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output) {
        Ok(()) => {
            info!("kiln completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, presentation),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::New(cmd) => commands::new::execute(cmd, cli.global, config, output),
        Commands::Rules(cmd) => commands::rules::execute(cmd, config, output),
        Commands::Init(cmd) => commands::init::execute(cmd, cli.global, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, cli.global, config, output),
    }
}

/// How a failure is rendered on stderr.
#[derive(Debug, Clone, Copy)]
struct Presentation {
    verbose: bool,
    json: bool,
    color: bool,
}

/// Translate a `CliError` into a user message and an appropriate exit code.
fn handle_error(err: CliError, how: Presentation) -> ExitCode {
    err.log();

    // stderr, so the message appears even when stdout is redirected.
    if how.json {
        eprintln!("{}", err.to_json());
    } else if how.color {
        eprint!("{}", err.format_colored(how.verbose));
    } else {
        eprint!("{}", err.format_plain(how.verbose));
    }

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
