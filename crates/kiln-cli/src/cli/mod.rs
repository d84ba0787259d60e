//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use kiln_core::domain::RuleSetVersion;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kiln",
    bin_name = "kiln",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Instantiate new projects from a template repository",
    long_about = "kiln clones a template repository, renames the template's \
                  identifiers to your project name, updates the module \
                  manifest and removes the template's history.",
    after_help = "EXAMPLES:\n\
        \x20 kiln new shop\n\
        \x20 kiln new acme --admin --https -u bob\n\
        \x20 kiln new shop --source-dir ./dilu --dry-run\n\
        \x20 kiln rules --version v2\n\
        \x20 kiln completions bash > /usr/share/bash-completion/completions/kiln",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from the template.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 kiln new shop                       # main project over ssh\n\
            \x20 kiln new acme --admin               # also fetch the admin front-end\n\
            \x20 kiln new acme --admin --https -u bob\n\
            \x20 kiln new shop -o ~/src --rules v2"
    )]
    New(NewArgs),

    /// Show the substitution rules a run would apply.
    #[command(
        about = "Show substitution rules",
        after_help = "EXAMPLES:\n\
            \x20 kiln rules\n\
            \x20 kiln rules --version v2 --name shop\n\
            \x20 kiln rules --admin --output-format json"
    )]
    Rules(RulesArgs),

    /// Initialise a kiln configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 kiln init           # platform config directory\n\
            \x20 kiln init --local   # .kiln.toml in the current directory"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kiln completions bash > ~/.local/share/bash-completion/completions/kiln\n\
            \x20 kiln completions zsh  > ~/.zfunc/_kiln\n\
            \x20 kiln completions fish > ~/.config/fish/completions/kiln.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the kiln configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kiln config get defaults.transport\n\
            \x20 kiln config list\n\
            \x20 kiln config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `kiln new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name. It becomes the directory name, the module name and the
    /// prefix of renamed types.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: String,

    /// Directory the project is created in.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Parent directory, created if missing (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Also instantiate the admin front-end next to the project.
    #[arg(
        short = 'a',
        long = "admin",
        help = "Also create <NAME>-admin from the admin template"
    )]
    pub admin: bool,

    /// Fetch over HTTPS instead of SSH.
    #[arg(long = "https", help = "Clone over HTTPS instead of SSH")]
    pub https: bool,

    /// Username embedded in HTTPS source URLs.
    #[arg(
        short = 'u',
        long = "user",
        value_name = "USER",
        requires = "https",
        help = "Username for HTTPS URLs"
    )]
    pub user: Option<String>,

    /// Force a rule set version.
    #[arg(
        long = "rules",
        value_name = "VERSION",
        value_enum,
        help = "Rule set to apply (default: v1, or v2 with --admin)"
    )]
    pub rules: Option<RuleVersion>,

    /// Template profile file.
    #[arg(
        long = "profile",
        value_name = "FILE",
        help = "Template profile (TOML) describing a different template"
    )]
    pub profile: Option<PathBuf>,

    /// Copy the main template from a local directory instead of cloning.
    #[arg(
        long = "source-dir",
        value_name = "DIR",
        help = "Use a local template directory instead of git"
    )]
    pub source_dir: Option<PathBuf>,

    /// Local admin template, used with `--source-dir`.
    #[arg(
        long = "admin-source-dir",
        value_name = "DIR",
        requires = "source_dir",
        help = "Local admin template directory"
    )]
    pub admin_source_dir: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Describe the run without touching the filesystem.
    #[arg(long = "dry-run", help = "Show what would be done without doing it")]
    pub dry_run: bool,
}

// ── rules ─────────────────────────────────────────────────────────────────────

/// Arguments for `kiln rules`.
#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Rule set version to show.
    #[arg(
        long = "version",
        value_name = "VERSION",
        value_enum,
        help = "Rule set version (default: the one `kiln new` would use)"
    )]
    pub version: Option<RuleVersion>,

    /// Show the rules of an extended run.
    #[arg(short = 'a', long = "admin", help = "Show rules for an --admin run")]
    pub admin: bool,

    /// Sample project name the replacements are rendered for.
    #[arg(
        short = 'n',
        long = "name",
        value_name = "NAME",
        default_value = "myproject",
        help = "Project name used in the replacements"
    )]
    pub name: String,

    /// Template profile file.
    #[arg(long = "profile", value_name = "FILE", help = "Template profile (TOML)")]
    pub profile: Option<PathBuf>,
}

/// Rule set versions as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleVersion {
    /// Type prefix and import prefix, source and template files.
    #[value(alias = "classic")]
    V1,
    /// Import prefix only, source files only.
    #[value(alias = "import-only")]
    V2,
}

impl From<RuleVersion> for RuleSetVersion {
    fn from(version: RuleVersion) -> Self {
        match version {
            RuleVersion::V1 => RuleSetVersion::V1,
            RuleVersion::V2 => RuleSetVersion::V2,
        }
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kiln init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `.kiln.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kiln completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kiln config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.transport`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
