//! Implementation of the `kiln new` command.
//!
//! Responsibility: translate CLI arguments and configuration into a
//! `ProjectRequest`, pick the adapters, run the workflow and display the
//! outcome. No business logic lives here.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use kiln_adapters::{GitFetcher, LocalDirectoryFetcher, LocalFilesystem, load_profile};
use kiln_core::{
    application::{WorkflowService, ports::RepositoryFetcher},
    domain::{
        ProjectName, ProjectRequest, RepositoryRole, RuleSet, TemplateProfile, Transport,
        WorkflowOutcome,
    },
};

use crate::{
    cli::{GlobalArgs, NewArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    progress::ProgressObserver,
};

/// Execute the `kiln new` command.
///
/// Dispatch sequence:
/// 1. Merge flags over configuration into a validated `ProjectRequest`
/// 2. Resolve the template profile and the fetcher
/// 3. Early-exit with the plan if `--dry-run`
/// 4. Confirm with the user on an interactive terminal unless `--yes`
/// 5. Run the workflow with a progress observer
/// 6. Print warnings and next steps, or the outcome as JSON
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let request = build_request(&args, &config)?;
    let profile = resolve_profile(args.profile.as_deref(), &config)?;
    let fetcher = build_fetcher(&args)?;

    debug!(
        request = %request,
        profile = %profile.name,
        rules = %request.rule_set_version(),
        "Request resolved"
    );

    if args.dry_run {
        return show_plan(&request, &profile, &args, &output);
    }

    if needs_confirmation(&args, &global, &output) {
        show_plan(&request, &profile, &args, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    let observer = ProgressObserver::new(&output);
    let service = WorkflowService::new(Box::new(LocalFilesystem::new()), fetcher, profile)
        .with_observer(Box::new(observer.clone()));

    output.header(&format!("Creating '{}'...", request.name()))?;
    let result = service.run(&request);
    observer.finish();
    let outcome = result?;

    info!(
        run_id = %outcome.run_id,
        files = outcome.files_rewritten,
        degraded = outcome.is_degraded(),
        "Instantiation completed"
    );

    report(&outcome, &output)
}

// ── Request construction ──────────────────────────────────────────────────────

fn build_request(args: &NewArgs, config: &AppConfig) -> CliResult<ProjectRequest> {
    let name = ProjectName::parse(args.name.as_str())?;

    let output_directory = args
        .output
        .clone()
        .or_else(|| config.defaults.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let transport = if args.https {
        Transport::Https
    } else {
        config.defaults.transport
    };

    // A configured username only makes sense on an HTTPS run.
    let username = match transport {
        Transport::Https => args.user.clone().or_else(|| config.defaults.username.clone()),
        Transport::Ssh => None,
    };

    let request = ProjectRequest::builder()
        .name(name)
        .output_directory(output_directory)
        .extended(args.admin || config.defaults.extended)
        .transport(transport)
        .username(username)
        .rule_set(args.rules.map(Into::into).or(config.rules.version))
        .build()?;

    Ok(request)
}

/// `--profile`, else `templates.profile_path`, else the built-in profile.
pub(crate) fn resolve_profile(flag: Option<&Path>, config: &AppConfig) -> CliResult<TemplateProfile> {
    match flag.or(config.templates.profile_path.as_deref()) {
        Some(path) => Ok(load_profile(path)?),
        None => Ok(TemplateProfile::dilu()),
    }
}

fn build_fetcher(args: &NewArgs) -> CliResult<Box<dyn RepositoryFetcher>> {
    let Some(main) = &args.source_dir else {
        return Ok(Box::new(GitFetcher::new()));
    };

    ensure_dir(main)?;
    let mut fetcher = LocalDirectoryFetcher::new(main);

    if let Some(admin) = &args.admin_source_dir {
        ensure_dir(admin)?;
        fetcher = fetcher.with_admin(admin);
    }

    Ok(Box::new(fetcher))
}

fn ensure_dir(path: &Path) -> CliResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CliError::SourceNotFound {
            path: path.to_path_buf(),
        })
    }
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn needs_confirmation(args: &NewArgs, global: &GlobalArgs, output: &OutputManager) -> bool {
    !args.yes && !global.quiet && !output.is_json() && std::io::stdin().is_terminal()
}

fn source_label(args: &NewArgs, role: RepositoryRole, url: &str) -> String {
    let local = if role == RepositoryRole::Admin {
        args.admin_source_dir.as_deref()
    } else {
        args.source_dir.as_deref()
    };

    match (local, &args.source_dir) {
        (Some(dir), _) => dir.display().to_string(),
        (None, Some(_)) => "(none)".into(),
        (None, None) => url.to_string(),
    }
}

fn show_plan(
    request: &ProjectRequest,
    profile: &TemplateProfile,
    args: &NewArgs,
    out: &OutputManager,
) -> CliResult<()> {
    let rules = RuleSet::for_version(request.rule_set_version(), profile, request.name());
    let targets = request.targets(profile);

    if out.is_json() {
        let targets: Vec<_> = targets
            .iter()
            .map(|t| {
                serde_json::json!({
                    "role": t.role(),
                    "source": source_label(args, t.role(), t.source_url()),
                    "destination": t.destination(),
                    "module": t.module_name(),
                    "exists": t.destination().exists(),
                })
            })
            .collect();
        out.json(&serde_json::json!({
            "dry_run": args.dry_run,
            "project": request.name(),
            "transport": request.transport(),
            "profile": profile.name,
            "targets": targets,
            "rules": rules,
        }))?;
        return Ok(());
    }

    out.header("Plan")?;
    out.print(&format!("  Project:    {}", request.name()))?;
    out.print(&format!("  Transport:  {}", request.transport()))?;
    out.print(&format!("  Profile:    {}", profile.name))?;
    for target in &targets {
        out.print(&format!(
            "  {:<10}  {} -> {}",
            format!("{}:", target.role()),
            source_label(args, target.role(), target.source_url()),
            target.destination().display(),
        ))?;
        if target.destination().exists() {
            out.warning(&format!("{} already exists", target.destination().display()))?;
        }
    }
    out.print(&format!(
        "  Rules:      {} ({})",
        rules.version(),
        rules.version().description()
    ))?;
    for rule in rules.rules() {
        out.print(&format!("    {rule}"))?;
    }
    out.print("")?;

    if args.dry_run {
        out.info("Dry run: nothing was created")?;
    }
    Ok(())
}

fn report(outcome: &WorkflowOutcome, out: &OutputManager) -> CliResult<()> {
    if out.is_json() {
        out.json(outcome)?;
        return Ok(());
    }

    for warning in outcome.warnings() {
        out.warning(&format!("{}: {}", warning.step.describe(), warning.message))?;
    }

    let name = outcome
        .main_path()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let seconds = outcome.elapsed().num_milliseconds() as f64 / 1000.0;
    let summary = format!(
        "{} files renamed in {seconds:.1}s",
        outcome.files_rewritten
    );
    if outcome.is_degraded() {
        out.success(&format!("Project '{name}' created with warnings ({summary})"))?;
    } else {
        out.success(&format!("Project '{name}' created ({summary})"))?;
    }

    out.print("")?;
    out.print("Next steps:")?;
    out.print(&format!("  cd {}", outcome.main_path().display()))?;
    out.print("  go mod tidy")?;
    if let Some(admin) = outcome.admin_path() {
        out.print(&format!("  # front-end: {}", admin.display()))?;
    }
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm() -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: "failed to read confirmation input".into(),
            source: Some(Box::new(e)),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    use crate::error::IntoCli;

    print!("Continue? [Y/n] ");
    io::stdout()
        .flush()
        .with_cli_context(|| "failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .with_cli_context(|| "failed to read confirmation input")?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
