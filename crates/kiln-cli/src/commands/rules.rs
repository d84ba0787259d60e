//! Implementation of the `kiln rules` command.

use kiln_core::domain::{ProjectName, RuleSet, RuleSetVersion};

use crate::{
    cli::RulesArgs,
    commands::new::resolve_profile,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Print the substitution rules and eligible suffixes a run would use.
pub fn execute(args: RulesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let profile = resolve_profile(args.profile.as_deref(), &config)?;
    let name = ProjectName::parse(args.name.as_str())?;
    let version = active_version(&args, &config);
    let rules = RuleSet::for_version(version, &profile, &name);

    if output.is_json() {
        output.json(&rules)?;
        return Ok(());
    }

    output.header(&format!(
        "Rule set {} ({})",
        rules.version(),
        rules.version().description()
    ))?;
    output.print(&format!("  Profile:  {}", profile.name))?;
    output.print(&format!("  Files:    *{}", rules.filter().suffixes().join(", *")))?;
    for rule in rules.rules() {
        output.print(&format!("  {rule}"))?;
    }
    Ok(())
}

/// `--version`, else `rules.version`, else the workflow default.
fn active_version(args: &RulesArgs, config: &AppConfig) -> RuleSetVersion {
    args.version
        .map(Into::into)
        .or(config.rules.version)
        .unwrap_or_else(|| RuleSetVersion::default_for(args.admin || config.defaults.extended))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RuleVersion;

    fn args(version: Option<RuleVersion>, admin: bool) -> RulesArgs {
        RulesArgs {
            version,
            admin,
            name: "shop".into(),
            profile: None,
        }
    }

    #[test]
    fn default_follows_the_workflow() {
        let config = AppConfig::default();
        assert_eq!(active_version(&args(None, false), &config), RuleSetVersion::V1);
        assert_eq!(active_version(&args(None, true), &config), RuleSetVersion::V2);
    }

    #[test]
    fn flag_beats_config() {
        let mut config = AppConfig::default();
        config.rules.version = Some(RuleSetVersion::V2);
        assert_eq!(active_version(&args(None, false), &config), RuleSetVersion::V2);
        assert_eq!(
            active_version(&args(Some(RuleVersion::V1), false), &config),
            RuleSetVersion::V1
        );
    }
}
