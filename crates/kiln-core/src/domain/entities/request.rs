//! The `ProjectRequest` aggregate root and its typestate builder.
//!
//! A `ProjectRequest` is the validated, immutable description of one run:
//! which name to stamp onto the template, where to put it, and how to fetch
//! it. Once built it is never mutated.
//!
//! # Typestate builder
//!
//! The builder uses two phantom marker types (`NoName` / `HasName`) to
//! enforce at *compile time* that a project name is set before `build()`.
//! Runtime validation still runs at `build()` for cross-field invariants.
//!
//! # Domain purity
//!
//! This module must not import `tracing` or touch the filesystem. Whether the
//! destination already exists is checked by the workflow service.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{profile::TemplateProfile, repository::RepositoryTarget},
    error::DomainError,
    value_objects::{ProjectName, RepositoryRole, RuleSetVersion, Transport},
};

// ── Aggregate root ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    name: ProjectName,
    output_directory: PathBuf,
    extended: bool,
    transport: Transport,
    username: Option<String>,
    rule_set: Option<RuleSetVersion>,
}

impl ProjectRequest {
    /// Start building a new `ProjectRequest`.
    pub fn builder() -> ProjectRequestBuilder<NoName> {
        ProjectRequestBuilder::new()
    }

    pub fn name(&self) -> &ProjectName {
        &self.name
    }
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }
    pub const fn is_extended(&self) -> bool {
        self.extended
    }
    pub const fn transport(&self) -> Transport {
        self.transport
    }
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The rule set version for this run: the forced one, else the
    /// workflow default.
    pub fn rule_set_version(&self) -> RuleSetVersion {
        self.rule_set
            .unwrap_or_else(|| RuleSetVersion::default_for(self.extended))
    }

    /// `<output>/<name>`
    pub fn main_path(&self) -> PathBuf {
        self.output_directory.join(self.name.as_str())
    }

    /// Module name of the admin tree, e.g. `acme-admin`.
    pub fn admin_name(&self, profile: &TemplateProfile) -> ProjectName {
        self.name.with_suffix(&profile.repositories.admin_suffix)
    }

    /// `<output>/<name><admin_suffix>`, only for extended runs.
    pub fn admin_path(&self, profile: &TemplateProfile) -> Option<PathBuf> {
        self.extended.then(|| {
            self.output_directory
                .join(self.admin_name(profile).as_str())
        })
    }

    /// Derive the repositories to acquire, main first.
    pub fn targets(&self, profile: &TemplateProfile) -> Vec<RepositoryTarget> {
        let repos = &profile.repositories;
        let mut targets = vec![RepositoryTarget::new(
            RepositoryRole::Main,
            repos.url_for(RepositoryRole::Main, self.transport, self.username()),
            self.main_path(),
            self.name.clone(),
        )];

        if let Some(admin_path) = self.admin_path(profile) {
            targets.push(RepositoryTarget::new(
                RepositoryRole::Admin,
                repos.url_for(RepositoryRole::Admin, self.transport, self.username()),
                admin_path,
                self.admin_name(profile),
            ));
        }

        targets
    }

    /// Validate this request's internal consistency.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.output_directory.as_os_str().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "output_directory",
            });
        }

        if let Some(user) = &self.username {
            if user.is_empty() {
                return Err(DomainError::InvalidRequest("username cannot be empty".into()));
            }
            if user
                .chars()
                .any(|c| matches!(c, '@' | ':' | '/') || c.is_whitespace())
            {
                return Err(DomainError::InvalidRequest(format!(
                    "username '{user}' contains characters that are not allowed in a URL"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for ProjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} via {}",
            self.name,
            self.output_directory.display(),
            self.transport
        )?;
        if self.extended {
            write!(f, " (+admin)")?;
        }
        Ok(())
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: name has not yet been set.
pub struct NoName;
/// Marker: name has been set; the request can be built.
pub struct HasName;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`ProjectRequest`].
pub struct ProjectRequestBuilder<N> {
    name: Option<ProjectName>,
    output_directory: PathBuf,
    extended: bool,
    transport: Transport,
    username: Option<String>,
    rule_set: Option<RuleSetVersion>,
    _marker: PhantomData<N>,
}

impl ProjectRequestBuilder<NoName> {
    pub fn new() -> Self {
        Self {
            name: None,
            output_directory: PathBuf::from("."),
            extended: false,
            transport: Transport::default(),
            username: None,
            rule_set: None,
            _marker: PhantomData,
        }
    }

    /// Set the project name. This transitions the builder to `HasName`.
    pub fn name(self, name: ProjectName) -> ProjectRequestBuilder<HasName> {
        ProjectRequestBuilder {
            name: Some(name),
            output_directory: self.output_directory,
            extended: self.extended,
            transport: self.transport,
            username: self.username,
            rule_set: self.rule_set,
            _marker: PhantomData,
        }
    }
}

impl Default for ProjectRequestBuilder<NoName> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ProjectRequestBuilder<N> {
    pub fn output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = dir.into();
        self
    }

    /// Also instantiate the admin repository.
    pub fn extended(mut self, extended: bool) -> Self {
        self.extended = extended;
        self
    }

    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    /// Force a rule set version instead of the workflow default.
    pub fn rule_set(mut self, version: Option<RuleSetVersion>) -> Self {
        self.rule_set = version;
        self
    }
}

impl ProjectRequestBuilder<HasName> {
    pub fn build(self) -> Result<ProjectRequest, DomainError> {
        let request = ProjectRequest {
            name: self
                .name
                .ok_or(DomainError::MissingRequiredField { field: "name" })?,
            output_directory: self.output_directory,
            extended: self.extended,
            transport: self.transport,
            username: self.username,
            rule_set: self.rule_set,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ProjectName {
        ProjectName::parse(s).unwrap()
    }

    #[test]
    fn builder_defaults() {
        let request = ProjectRequest::builder().name(name("shop")).build().unwrap();

        assert_eq!(request.transport(), Transport::Ssh);
        assert!(!request.is_extended());
        assert_eq!(request.main_path(), PathBuf::from("./shop"));
        assert_eq!(request.rule_set_version(), RuleSetVersion::V1);
    }

    #[test]
    fn basic_request_has_one_target() {
        let request = ProjectRequest::builder()
            .name(name("shop"))
            .output_directory("/work")
            .build()
            .unwrap();

        let targets = request.targets(&TemplateProfile::dilu());
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].role(), RepositoryRole::Main);
        assert_eq!(targets[0].source_url(), "git@github.com:baowk/dilu.git");
        assert_eq!(targets[0].destination(), Path::new("/work/shop"));
    }

    #[test]
    fn extended_https_request_has_two_targets_with_username() {
        let profile = TemplateProfile::dilu();
        let request = ProjectRequest::builder()
            .name(name("acme"))
            .output_directory("/work")
            .extended(true)
            .transport(Transport::Https)
            .username(Some("bob".into()))
            .build()
            .unwrap();

        let targets = request.targets(&profile);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].source_url(), "https://bob@github.com/baowk/dilu.git");
        assert_eq!(
            targets[1].source_url(),
            "https://bob@github.com/baowk/dilu-admin.git"
        );
        assert_ne!(targets[0].source_url(), targets[1].source_url());
        assert_eq!(targets[1].destination(), Path::new("/work/acme-admin"));
        assert_eq!(targets[1].module_name().as_str(), "acme-admin");
        assert_eq!(request.rule_set_version(), RuleSetVersion::V2);
    }

    #[test]
    fn forced_rule_set_wins() {
        let request = ProjectRequest::builder()
            .name(name("acme"))
            .extended(true)
            .rule_set(Some(RuleSetVersion::V1))
            .build()
            .unwrap();
        assert_eq!(request.rule_set_version(), RuleSetVersion::V1);
    }

    #[test]
    fn admin_path_only_for_extended() {
        let profile = TemplateProfile::dilu();
        let basic = ProjectRequest::builder().name(name("shop")).build().unwrap();
        assert!(basic.admin_path(&profile).is_none());
    }

    #[test]
    fn empty_output_directory_is_rejected() {
        let result = ProjectRequest::builder()
            .name(name("shop"))
            .output_directory("")
            .build();
        assert!(matches!(
            result,
            Err(DomainError::MissingRequiredField { field: "output_directory" })
        ));
    }

    #[test]
    fn username_with_url_characters_is_rejected() {
        let result = ProjectRequest::builder()
            .name(name("shop"))
            .username(Some("bob@evil".into()))
            .build();
        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
    }

    #[test]
    fn display_mentions_admin_for_extended() {
        let request = ProjectRequest::builder()
            .name(name("acme"))
            .output_directory("/work")
            .extended(true)
            .build()
            .unwrap();
        assert_eq!(request.to_string(), "acme in /work via ssh (+admin)");
    }
}
