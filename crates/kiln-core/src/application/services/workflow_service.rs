//! Workflow Service - main application orchestrator.
//!
//! This service sequences one run:
//!
//! ```text
//! Validate → ProbeFetcher → CreateMainDir → CreateAdminDir? → AcquireMain
//!   → AcquireAdmin? → RewriteAdmin? → RewriteAdminManifest? → RewriteMain
//!   → RewriteManifest → RewriteConfigPaths? → PurgeMainMetadata
//!   → PurgeAdminMetadata? → Done
//! ```
//!
//! Any step can abort the run. Only failures touching the main project are
//! fatal; admin and cleanup failures are recorded as warnings on the
//! [`WorkflowOutcome`] and the run carries on.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, NoopObserver, RepositoryFetcher, WorkflowObserver},
        services::instantiation_service::{InstantiationService, ManifestChange},
    },
    domain::{
        AuthFailureMatcher, ConfigPathRewrite, DomainValidator as validator, FailureClassifier,
        ManifestDescriptor, ProjectName, ProjectRequest, RepositoryRole, RepositoryTarget,
        RuleSet, Step, StepReport, TemplateProfile, Transport, WorkflowOutcome,
    },
    error::{KilnError, KilnResult},
};

/// Name of the version-control metadata directory purged after a run.
const METADATA_DIR: &str = ".git";

/// Main workflow service.
///
/// Holds the adapters and the template profile; each call to
/// [`run`](Self::run) is independent.
pub struct WorkflowService {
    filesystem: Box<dyn Filesystem>,
    fetcher: Box<dyn RepositoryFetcher>,
    profile: TemplateProfile,
    classifier: Box<dyn FailureClassifier>,
    observer: Box<dyn WorkflowObserver>,
}

impl WorkflowService {
    /// Create a new workflow service with the given adapters.
    ///
    /// Authentication failures are recognised with [`AuthFailureMatcher`] and
    /// progress goes nowhere until an observer is attached.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        fetcher: Box<dyn RepositoryFetcher>,
        profile: TemplateProfile,
    ) -> Self {
        Self {
            filesystem,
            fetcher,
            profile,
            classifier: Box::new(AuthFailureMatcher::default()),
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn FailureClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn WorkflowObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn profile(&self) -> &TemplateProfile {
        &self.profile
    }

    /// Instantiate a new project.
    ///
    /// Returns an outcome when the main project was produced, possibly with
    /// warnings. Returns an error on any fatal failure.
    #[instrument(
        skip_all,
        fields(
            project = %request.name(),
            output = %request.output_directory().display(),
            transport = %request.transport(),
            extended = request.is_extended(),
        )
    )]
    pub fn run(&self, request: &ProjectRequest) -> KilnResult<WorkflowOutcome> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, "Instantiating {}", request);

        let mut run = Run::new(self.observer.as_ref());
        let targets = request.targets(&self.profile);
        let (main, admin) = split_targets(&targets)?;

        // 1. Validate: nothing on disk is touched before this passes.
        run.begin(Step::Validate);
        let checked = self.validate(request, &targets);
        run.fatal(Step::Validate, checked, |_| "destination is free".into())?;

        // 2. Probe the fetcher before creating anything.
        run.begin(Step::ProbeFetcher);
        let probed = if self.fetcher.is_available() {
            Ok(())
        } else {
            Err(ApplicationError::FetcherUnavailable {
                reason: "the repository fetcher cannot run on this system".into(),
            }
            .into())
        };
        run.fatal(Step::ProbeFetcher, probed, |_| "fetcher available".into())?;

        // 3. Create destinations. The output directory may be missing; the
        // project directory itself must not exist.
        run.begin(Step::CreateMainDir);
        let created = self
            .filesystem
            .create_dir_all(request.output_directory())
            .and_then(|()| self.filesystem.create_dir(main.destination()));
        run.fatal(Step::CreateMainDir, created, |_| {
            format!("created {}", main.destination().display())
        })?;
        let mut created_dirs = vec![main.destination().to_path_buf()];

        match admin {
            Some(admin) => {
                run.begin(Step::CreateAdminDir);
                let created = self.filesystem.create_dir(admin.destination());
                if let Err(e) = run.fatal(Step::CreateAdminDir, created, |_| {
                    format!("created {}", admin.destination().display())
                }) {
                    self.rollback(&created_dirs);
                    return Err(e);
                }
                created_dirs.push(admin.destination().to_path_buf());
            }
            None => run.skip(Step::CreateAdminDir, "single repository"),
        }

        // 4. Acquire main; fatal.
        run.begin(Step::AcquireMain);
        let acquired = self.acquire(main, request);
        if let Err(e) = run.fatal(Step::AcquireMain, acquired, |_| {
            format!("fetched {}", main.source_url())
        }) {
            self.rollback(&created_dirs);
            return Err(e);
        }

        // 5. Acquire admin; a failure drops the admin tree from the run.
        let admin = match admin {
            Some(admin) => {
                run.begin(Step::AcquireAdmin);
                let acquired = self.acquire(admin, request);
                if run.soft(Step::AcquireAdmin, acquired, |_| {
                    format!("fetched {}", admin.source_url())
                }) {
                    Some(admin)
                } else {
                    self.rollback(&[admin.destination().to_path_buf()]);
                    None
                }
            }
            None => {
                run.skip(Step::AcquireAdmin, "single repository");
                None
            }
        };

        let rules = RuleSet::for_version(request.rule_set_version(), &self.profile, request.name());
        let engine = InstantiationService::new(self.filesystem.as_ref());
        let mut files_rewritten = 0;

        // 6. Admin tree; non-fatal.
        match admin {
            Some(admin) => {
                run.begin(Step::RewriteAdmin);
                let root = admin.destination();
                let rewritten = engine
                    .rewrite_tree(root, &rules)
                    .map_err(|e| rewrite_failure(Step::RewriteAdmin, root, e));
                files_rewritten += rewritten.as_ref().map_or(0, |s| s.rewritten);
                run.soft(Step::RewriteAdmin, rewritten, |s| {
                    format!("{} of {} files rewritten", s.rewritten, s.visited)
                });

                run.begin(Step::RewriteAdminManifest);
                let changed = self.rewrite_manifest(
                    &engine,
                    admin.destination(),
                    admin.module_name(),
                    Step::RewriteAdminManifest,
                );
                run.soft(Step::RewriteAdminManifest, changed, |c| {
                    describe_manifest(c, admin.module_name())
                });
            }
            None => {
                run.skip(Step::RewriteAdmin, "no admin tree");
                run.skip(Step::RewriteAdminManifest, "no admin tree");
            }
        }

        // 7. Main tree; fatal.
        run.begin(Step::RewriteMain);
        let root = main.destination();
        let rewritten = engine
            .rewrite_tree(root, &rules)
            .map_err(|e| rewrite_failure(Step::RewriteMain, root, e));
        let stats = run.fatal(Step::RewriteMain, rewritten, |s| {
            format!("{} of {} files rewritten", s.rewritten, s.visited)
        })?;
        files_rewritten += stats.rewritten;

        run.begin(Step::RewriteManifest);
        let changed =
            self.rewrite_manifest(&engine, root, main.module_name(), Step::RewriteManifest);
        run.fatal(Step::RewriteManifest, changed, |c| {
            describe_manifest(c, main.module_name())
        })?;

        // 8. Config paths; extended runs only, non-fatal.
        if request.is_extended() {
            run.begin(Step::RewriteConfigPaths);
            let admin_name = request.admin_name(&self.profile);
            let rewrite = ConfigPathRewrite::new(
                &self.profile.config_paths,
                &self.profile.repositories.admin,
                admin_name.as_str(),
            );
            let changed = engine
                .rewrite_config_paths(root, &rewrite)
                .map_err(|e| rewrite_failure(Step::RewriteConfigPaths, root, e));
            files_rewritten += changed.as_ref().map_or(0, Vec::len);
            let sibling = if admin.is_some() { "" } else { " (admin tree missing)" };
            run.soft(Step::RewriteConfigPaths, changed, |files| {
                format!(
                    "{} config file(s) now point at {}{sibling}",
                    files.len(),
                    rewrite.to_literal()
                )
            });
        } else {
            run.skip(Step::RewriteConfigPaths, "single repository");
        }

        // 9. Purge metadata; always non-fatal.
        run.begin(Step::PurgeMainMetadata);
        let purged = self.purge_metadata(main.destination());
        run.soft(Step::PurgeMainMetadata, purged, String::clone);

        match admin {
            Some(admin) => {
                run.begin(Step::PurgeAdminMetadata);
                let purged = self.purge_metadata(admin.destination());
                run.soft(Step::PurgeAdminMetadata, purged, String::clone);
            }
            None => run.skip(Step::PurgeAdminMetadata, "no admin tree"),
        }

        let outcome = WorkflowOutcome {
            run_id,
            started_at,
            finished_at: Utc::now(),
            main_path: main.destination().to_path_buf(),
            admin_path: admin.map(|a| a.destination().to_path_buf()),
            rule_set: rules.version(),
            files_rewritten,
            steps: run.finish(),
        };

        if outcome.is_degraded() {
            warn!(
                warnings = outcome.warnings().count(),
                "Project created with warnings"
            );
        } else {
            info!(path = %outcome.main_path().display(), "Project created");
        }

        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn validate(&self, request: &ProjectRequest, targets: &[RepositoryTarget]) -> KilnResult<()> {
        validator::validate_request(request)?;
        validator::validate_profile(&self.profile)?;

        for target in targets {
            if self.filesystem.exists(target.destination()) {
                return Err(ApplicationError::ProjectExists {
                    path: target.destination().to_path_buf(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn acquire(&self, target: &RepositoryTarget, request: &ProjectRequest) -> KilnResult<()> {
        let fetch = target.fetch_request(request.transport(), request.username());
        debug!(role = %target.role(), url = %fetch.url, "Fetching");

        let output = self.fetcher.fetch(&fetch);
        if output.success {
            return Ok(());
        }

        let hint = match request.transport() {
            Transport::Https => self
                .classifier
                .classify(&output.output)
                .map(|kind| kind.hint().to_string()),
            Transport::Ssh => None,
        };

        Err(ApplicationError::AcquisitionFailed {
            role: target.role(),
            url: fetch.url,
            output: output.output,
            hint,
        }
        .into())
    }

    fn rewrite_manifest(
        &self,
        engine: &InstantiationService<'_>,
        root: &Path,
        module_name: &ProjectName,
        step: Step,
    ) -> KilnResult<ManifestChange> {
        let manifest = ManifestDescriptor::new(&self.profile.manifest, module_name);
        engine
            .rewrite_manifest(root, &manifest)
            .map_err(|e| rewrite_failure(step, root, e))
    }

    fn purge_metadata(&self, root: &Path) -> KilnResult<String> {
        let metadata = root.join(METADATA_DIR);
        if !self.filesystem.exists(&metadata) {
            return Ok(format!("no {METADATA_DIR} directory"));
        }
        self.filesystem.remove_dir_all(&metadata)?;
        Ok(format!("removed {}", metadata.display()))
    }

    /// Best-effort removal of directories this run created.
    fn rollback(&self, dirs: &[PathBuf]) {
        for dir in dirs.iter().rev() {
            if let Err(e) = self.filesystem.remove_dir_all(dir) {
                warn!(
                    error = %e,
                    path = %dir.display(),
                    "Rollback failed"
                );
            } else {
                info!(path = %dir.display(), "Rolled back");
            }
        }
    }
}

/// Step bookkeeping for one run.
struct Run<'o> {
    observer: &'o dyn WorkflowObserver,
    steps: Vec<StepReport>,
}

impl<'o> Run<'o> {
    fn new(observer: &'o dyn WorkflowObserver) -> Self {
        Self {
            observer,
            steps: Vec::new(),
        }
    }

    fn begin(&self, step: Step) {
        debug!(%step, "{}", step.describe());
        self.observer.step_started(step);
    }

    fn record(&mut self, report: StepReport) {
        self.observer.step_finished(&report);
        self.steps.push(report);
    }

    /// Record a step whose failure ends the run.
    fn fatal<T>(
        &mut self,
        step: Step,
        result: KilnResult<T>,
        message: impl FnOnce(&T) -> String,
    ) -> KilnResult<T> {
        match result {
            Ok(value) => {
                let message = message(&value);
                info!(%step, "{message}");
                self.record(StepReport::ok(step, message));
                Ok(value)
            }
            Err(e) => {
                warn!(%step, error = %e, "Aborting");
                self.record(StepReport::failed(step, e.to_string()));
                Err(e)
            }
        }
    }

    /// Record a step whose failure is only a warning. Returns whether it
    /// succeeded.
    fn soft<T>(
        &mut self,
        step: Step,
        result: KilnResult<T>,
        message: impl FnOnce(&T) -> String,
    ) -> bool {
        match result {
            Ok(value) => {
                let message = message(&value);
                info!(%step, "{message}");
                self.record(StepReport::ok(step, message));
                true
            }
            Err(e) => {
                warn!(%step, error = %e, "Continuing after non-fatal failure");
                self.record(StepReport::failed(step, e.to_string()));
                false
            }
        }
    }

    fn skip(&mut self, step: Step, reason: &str) {
        self.record(StepReport::skipped(step, reason));
    }

    fn finish(self) -> Vec<StepReport> {
        self.steps
    }
}

fn split_targets(
    targets: &[RepositoryTarget],
) -> KilnResult<(&RepositoryTarget, Option<&RepositoryTarget>)> {
    let main = targets
        .iter()
        .find(|t| t.role() == RepositoryRole::Main)
        .ok_or_else(|| KilnError::Internal {
            message: "request produced no main repository".into(),
        })?;
    let admin = targets.iter().find(|t| t.role() == RepositoryRole::Admin);
    Ok((main, admin))
}

/// Re-label a filesystem failure with the rewrite step it broke.
fn rewrite_failure(step: Step, root: &Path, error: KilnError) -> KilnError {
    match error {
        KilnError::Application(ApplicationError::FilesystemError { path, reason }) => {
            ApplicationError::RewriteFailed { step, path, reason }.into()
        }
        other => ApplicationError::RewriteFailed {
            step,
            path: root.to_path_buf(),
            reason: other.to_string(),
        }
        .into(),
    }
}

fn describe_manifest(change: &ManifestChange, module: &ProjectName) -> String {
    match change {
        ManifestChange::Synthesized => format!("synthesized manifest for {module}"),
        ManifestChange::Updated => format!("module is now {module}"),
        ManifestChange::Unchanged => format!("module already {module}"),
        ManifestChange::NoDeclaration => "manifest has no module declaration".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, MockRepositoryFetcher};
    use crate::domain::{FetchOutput, StepStatus};
    use mockall::predicate::eq;
    use std::sync::{Arc, Mutex};

    fn request(name: &str, extended: bool, transport: Transport) -> ProjectRequest {
        ProjectRequest::builder()
            .name(ProjectName::parse(name).unwrap())
            .output_directory("/work")
            .extended(extended)
            .transport(transport)
            .build()
            .unwrap()
    }

    /// A filesystem where nothing exists yet and every write succeeds.
    fn empty_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_dir().returning(|_| Ok(()));
        fs.expect_read_dir().returning(|_| Ok(Vec::new()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs
    }

    fn available_fetcher() -> MockRepositoryFetcher {
        let mut fetcher = MockRepositoryFetcher::new();
        fetcher.expect_is_available().return_const(true);
        fetcher
    }

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<(Step, StepStatus)>>>);

    impl WorkflowObserver for Recorder {
        fn step_finished(&self, report: &StepReport) {
            self.0.lock().unwrap().push((report.step, report.status));
        }
    }

    #[test]
    fn basic_run_walks_every_main_step() {
        let mut fetcher = available_fetcher();
        fetcher
            .expect_fetch()
            .withf(|r| r.url == "git@github.com:baowk/dilu.git" && r.role == RepositoryRole::Main)
            .times(1)
            .returning(|_| FetchOutput::succeeded("Cloning into '.'..."));

        let recorder = Recorder::default();
        let service =
            WorkflowService::new(Box::new(empty_fs()), Box::new(fetcher), TemplateProfile::dilu())
                .with_observer(Box::new(recorder.clone()));

        let outcome = service
            .run(&request("shop", false, Transport::Ssh))
            .unwrap();

        assert_eq!(outcome.main_path(), Path::new("/work/shop"));
        assert!(outcome.admin_path().is_none());
        assert!(!outcome.is_degraded());
        assert_eq!(
            outcome.report(Step::RewriteManifest).map(|r| r.status),
            Some(StepStatus::Ok)
        );

        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 13);
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn existing_destination_aborts_before_any_side_effect() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/work/shop"));
        fs.expect_create_dir_all().never();
        fs.expect_create_dir().never();

        let mut fetcher = MockRepositoryFetcher::new();
        fetcher.expect_is_available().never();
        fetcher.expect_fetch().never();

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        let err = service
            .run(&request("shop", false, Transport::Ssh))
            .unwrap_err();

        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::ProjectExists { .. })
        ));
    }

    #[test]
    fn existing_admin_destination_is_also_checked() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p == Path::new("/work/acme-admin"));
        fs.expect_create_dir_all().never();
        fs.expect_create_dir().never();

        let service = WorkflowService::new(
            Box::new(fs),
            Box::new(MockRepositoryFetcher::new()),
            TemplateProfile::dilu(),
        );
        let err = service
            .run(&request("acme", true, Transport::Ssh))
            .unwrap_err();

        assert!(err.to_string().contains("acme-admin"));
    }

    #[test]
    fn missing_fetcher_leaves_no_directories() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().never();
        fs.expect_create_dir().never();

        let mut fetcher = MockRepositoryFetcher::new();
        fetcher.expect_is_available().return_const(false);
        fetcher.expect_fetch().never();

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        let err = service
            .run(&request("shop", false, Transport::Ssh))
            .unwrap_err();

        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::FetcherUnavailable { .. })
        ));
    }

    #[test]
    fn main_https_auth_failure_carries_hint_and_rolls_back() {
        let mut fs = empty_fs();
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("/work/acme") || p == Path::new("/work/acme-admin"))
            .times(2)
            .returning(|_| Ok(()));

        let mut fetcher = available_fetcher();
        fetcher.expect_fetch().times(1).returning(|_| {
            FetchOutput::failed("fatal: Authentication failed for 'https://github.com/baowk/dilu.git/'")
        });

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        let err = service
            .run(&request("acme", true, Transport::Https))
            .unwrap_err();

        match err {
            KilnError::Application(ApplicationError::AcquisitionFailed {
                role, hint, output, ..
            }) => {
                assert_eq!(role, RepositoryRole::Main);
                assert!(hint.is_some());
                assert!(output.contains("Authentication failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn ssh_failure_gets_no_auth_hint() {
        let mut fs = empty_fs();
        fs.expect_remove_dir_all().returning(|_| Ok(()));

        let mut fetcher = available_fetcher();
        fetcher
            .expect_fetch()
            .returning(|_| FetchOutput::failed("fatal: Authentication failed"));

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        let err = service
            .run(&request("shop", false, Transport::Ssh))
            .unwrap_err();

        assert!(matches!(
            err,
            KilnError::Application(ApplicationError::AcquisitionFailed { hint: None, .. })
        ));
    }

    #[test]
    fn admin_failure_is_a_warning() {
        let mut fs = empty_fs();
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new("/work/acme-admin"))
            .times(1)
            .returning(|_| Ok(()));

        let mut fetcher = available_fetcher();
        fetcher
            .expect_fetch()
            .returning(|r| match r.role {
                RepositoryRole::Main => FetchOutput::succeeded(""),
                RepositoryRole::Admin => FetchOutput::failed("fatal: repository not found"),
            });

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        let outcome = service
            .run(&request("acme", true, Transport::Ssh))
            .unwrap();

        assert!(outcome.is_degraded());
        assert!(outcome.admin_path().is_none());
        assert_eq!(
            outcome.warnings().map(|r| r.step).collect::<Vec<_>>(),
            vec![Step::AcquireAdmin]
        );
        assert_eq!(
            outcome.report(Step::RewriteAdmin).map(|r| r.status),
            Some(StepStatus::Skipped)
        );
        let config = outcome.report(Step::RewriteConfigPaths).unwrap();
        assert_eq!(config.status, StepStatus::Ok);
        assert!(config.message.contains("admin tree missing"));
    }

    #[test]
    fn output_directory_is_created_before_the_project() {
        let mut seq = mockall::Sequence::new();
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all()
            .with(eq(PathBuf::from("/work")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_create_dir()
            .with(eq(PathBuf::from("/work/shop")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_read_dir().returning(|_| Ok(Vec::new()));
        fs.expect_write_file().returning(|_, _| Ok(()));

        let mut fetcher = available_fetcher();
        fetcher.expect_fetch().returning(|_| FetchOutput::succeeded(""));

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        assert!(service.run(&request("shop", false, Transport::Ssh)).is_ok());
    }

    #[test]
    fn main_rewrite_failure_is_fatal_and_keeps_files() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_dir().returning(|_| Ok(()));
        fs.expect_read_dir()
            .returning(|_| Ok(vec![crate::application::ports::DirEntry::file("/work/shop/main.go")]));
        fs.expect_read_bytes().returning(|p| {
            Err(ApplicationError::FilesystemError {
                path: p.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into())
        });
        fs.expect_remove_dir_all().never();

        let mut fetcher = available_fetcher();
        fetcher.expect_fetch().returning(|_| FetchOutput::succeeded(""));

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        let err = service
            .run(&request("shop", false, Transport::Ssh))
            .unwrap_err();

        match err {
            KilnError::Application(ApplicationError::RewriteFailed { step, path, .. }) => {
                assert_eq!(step, Step::RewriteMain);
                assert_eq!(path, PathBuf::from("/work/shop/main.go"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn purge_failure_is_a_warning() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|p| p.ends_with(".git"));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_create_dir().returning(|_| Ok(()));
        fs.expect_read_dir().returning(|_| Ok(Vec::new()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_remove_dir_all().returning(|p| {
            Err(ApplicationError::FilesystemError {
                path: p.to_path_buf(),
                reason: "busy".into(),
            }
            .into())
        });

        let mut fetcher = available_fetcher();
        fetcher.expect_fetch().returning(|_| FetchOutput::succeeded(""));

        let service =
            WorkflowService::new(Box::new(fs), Box::new(fetcher), TemplateProfile::dilu());
        let outcome = service
            .run(&request("shop", false, Transport::Ssh))
            .unwrap();

        assert_eq!(
            outcome.warnings().map(|r| r.step).collect::<Vec<_>>(),
            vec![Step::PurgeMainMetadata]
        );
    }
}
