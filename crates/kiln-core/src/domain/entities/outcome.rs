//! Per-run step reports and the overall workflow outcome.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::value_objects::RuleSetVersion;

/// Steps of the workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Validate,
    ProbeFetcher,
    CreateMainDir,
    CreateAdminDir,
    AcquireMain,
    AcquireAdmin,
    RewriteAdmin,
    RewriteAdminManifest,
    RewriteMain,
    RewriteManifest,
    RewriteConfigPaths,
    PurgeMainMetadata,
    PurgeAdminMetadata,
}

impl Step {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::ProbeFetcher => "probe-fetcher",
            Self::CreateMainDir => "create-main-dir",
            Self::CreateAdminDir => "create-admin-dir",
            Self::AcquireMain => "acquire-main",
            Self::AcquireAdmin => "acquire-admin",
            Self::RewriteAdmin => "rewrite-admin",
            Self::RewriteAdminManifest => "rewrite-admin-manifest",
            Self::RewriteMain => "rewrite-main",
            Self::RewriteManifest => "rewrite-manifest",
            Self::RewriteConfigPaths => "rewrite-config-paths",
            Self::PurgeMainMetadata => "purge-main-metadata",
            Self::PurgeAdminMetadata => "purge-admin-metadata",
        }
    }

    /// Short human description used for progress lines.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Validate => "Checking destination",
            Self::ProbeFetcher => "Checking for git",
            Self::CreateMainDir => "Creating project directory",
            Self::CreateAdminDir => "Creating admin directory",
            Self::AcquireMain => "Cloning main repository",
            Self::AcquireAdmin => "Cloning admin repository",
            Self::RewriteAdmin => "Renaming packages in admin tree",
            Self::RewriteAdminManifest => "Updating admin manifest",
            Self::RewriteMain => "Renaming packages",
            Self::RewriteManifest => "Updating manifest",
            Self::RewriteConfigPaths => "Updating admin path in config files",
            Self::PurgeMainMetadata => "Removing template .git directory",
            Self::PurgeAdminMetadata => "Removing admin template .git directory",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Failed,
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        })
    }
}

/// One line of the run's diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    pub message: String,
}

impl StepReport {
    pub fn ok(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Ok,
            message: message.into(),
        }
    }

    pub fn failed(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            message: message.into(),
        }
    }

    pub fn skipped(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            message: message.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == StepStatus::Failed
    }
}

/// Result of a run that reached `Done`.
///
/// Fatal failures never produce an outcome; they surface as errors. Any
/// `Failed` report in here is therefore non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub main_path: PathBuf,
    pub admin_path: Option<PathBuf>,
    pub rule_set: RuleSetVersion,
    pub files_rewritten: usize,
    pub steps: Vec<StepReport>,
}

impl WorkflowOutcome {
    pub fn main_path(&self) -> &Path {
        &self.main_path
    }

    pub fn admin_path(&self) -> Option<&Path> {
        self.admin_path.as_deref()
    }

    /// Non-fatal failures, in the order they happened.
    pub fn warnings(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|r| r.is_failed())
    }

    /// `true` when a supplementary step failed.
    pub fn is_degraded(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Wall-clock time of the run.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn report(&self, step: Step) -> Option<&StepReport> {
        self.steps.iter().find(|r| r.step == step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(steps: Vec<StepReport>) -> WorkflowOutcome {
        WorkflowOutcome {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            main_path: PathBuf::from("/work/shop"),
            admin_path: None,
            rule_set: RuleSetVersion::V1,
            files_rewritten: 0,
            steps,
        }
    }

    #[test]
    fn clean_outcome_is_not_degraded() {
        let o = outcome(vec![
            StepReport::ok(Step::AcquireMain, "cloned"),
            StepReport::skipped(Step::RewriteConfigPaths, "no admin"),
        ]);
        assert!(!o.is_degraded());
        assert_eq!(o.warnings().count(), 0);
    }

    #[test]
    fn failed_supplementary_step_degrades_outcome() {
        let o = outcome(vec![
            StepReport::ok(Step::AcquireMain, "cloned"),
            StepReport::failed(Step::AcquireAdmin, "network down"),
        ]);
        assert!(o.is_degraded());
        assert_eq!(o.warnings().next().map(|r| r.step), Some(Step::AcquireAdmin));
    }

    #[test]
    fn steps_order_follows_the_workflow() {
        assert!(Step::Validate < Step::ProbeFetcher);
        assert!(Step::AcquireAdmin < Step::RewriteAdmin);
        assert!(Step::RewriteAdmin < Step::RewriteMain);
        assert!(Step::RewriteConfigPaths < Step::PurgeMainMetadata);
    }

    #[test]
    fn report_lookup_by_step() {
        let o = outcome(vec![StepReport::ok(Step::RewriteManifest, "module shop")]);
        assert_eq!(
            o.report(Step::RewriteManifest).map(|r| r.message.as_str()),
            Some("module shop")
        );
        assert!(o.report(Step::AcquireAdmin).is_none());
    }
}
