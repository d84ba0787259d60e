//! `kiln init`: create a default configuration file.

use std::path::{Path, PathBuf};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliResult, IntoCli},
    output::OutputManager,
};

const HEADER: &str = "\
# kiln configuration
#
# Every key can also be set through the environment, e.g.
# KILN_DEFAULTS__TRANSPORT=https or KILN_RULES__VERSION=v2.

";

/// Create a default kiln configuration file.
pub fn execute(args: InitArgs, global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let config_path = target_path(&args, &global);
    output.info(&format!("Initialising configuration at {}...", config_path.display()))?;

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    write_default(&config_path)?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;

    Ok(())
}

/// `--config FILE`, else `./.kiln.toml` with `--local`, else the global file.
fn target_path(args: &InitArgs, global: &GlobalArgs) -> PathBuf {
    if let Some(path) = &global.config {
        return path.clone();
    }
    if args.local {
        return PathBuf::from(LOCAL_CONFIG_FILE);
    }
    AppConfig::config_path()
}

fn write_default(path: &Path) -> CliResult<()> {
    let body = toml::to_string_pretty(&AppConfig::default())
        .with_cli_context(|| "Failed to serialise default config")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create config directory '{}'", parent.display()))?;
    }

    std::fs::write(path, format!("{HEADER}{body}"))
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}
