//! Template profiles.
//!
//! A [`TemplateProfile`] names every identifier that is specific to one
//! template family: the type-name prefix baked into its sources, the import
//! prefix of its module, the manifest it ships, the cross-reference path in
//! its config files and where its repositories live.
//!
//! The built-in profile is [`TemplateProfile::dilu`]. Other families are
//! described by profile files loaded in `kiln-adapters`.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{RepositoryRole, Transport},
};

/// Everything kiln needs to know about one template family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateProfile {
    pub name: String,
    pub rules: RuleIdentifiers,
    pub manifest: ManifestSpec,
    pub config_paths: ConfigPathSpec,
    pub repositories: RepositorySources,
}

/// Identifiers rewritten by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleIdentifiers {
    /// Capitalized prefix of the template's type names, e.g. `Dilu`.
    pub type_prefix: String,
    /// Lower-case first segment of the template's import paths, e.g. `dilu`.
    pub import_prefix: String,
    /// Suffix of source files, e.g. `.go`.
    pub source_suffix: String,
    /// Suffix of template files, e.g. `.template`.
    pub template_suffix: String,
}

/// Location and shape of the module-identity file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSpec {
    /// Path relative to the tree root, e.g. `go.mod`.
    pub file_name: String,
    /// Declaration keyword, e.g. `module`.
    pub keyword: String,
    /// Version line written when the manifest has to be synthesized.
    pub default_language_version: String,
}

/// The cross-reference from the main tree's config files to the admin tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPathSpec {
    /// Suffixes of config files to scan, e.g. `.yaml` and `.yml`.
    pub suffixes: Vec<String>,
    /// Key token that must appear on a rewritable line.
    pub key: String,
    /// Text before the admin directory name in the path literal.
    pub path_prefix: String,
    /// Text after the admin directory name in the path literal.
    pub path_suffix: String,
}

impl ConfigPathSpec {
    /// The path literal that references the given admin directory.
    pub fn literal_for(&self, admin_dir: &str) -> String {
        format!("{}{}{}", self.path_prefix, admin_dir, self.path_suffix)
    }
}

/// Where the template repositories are hosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySources {
    pub host: String,
    pub owner: String,
    /// Repository name of the main template.
    pub main: String,
    /// Repository name of the admin template.
    pub admin: String,
    /// Appended to the project name to form the admin directory.
    pub admin_suffix: String,
}

impl RepositorySources {
    pub fn repository_name(&self, role: RepositoryRole) -> &str {
        match role {
            RepositoryRole::Main => &self.main,
            RepositoryRole::Admin => &self.admin,
        }
    }

    /// Build the clone URL for a repository.
    ///
    /// - SSH:   `git@<host>:<owner>/<repo>.git`
    /// - HTTPS: `https://[<user>@]<host>/<owner>/<repo>.git`
    pub fn url_for(
        &self,
        role: RepositoryRole,
        transport: Transport,
        username: Option<&str>,
    ) -> String {
        let repo = self.repository_name(role);
        match transport {
            Transport::Ssh => format!("git@{}:{}/{}.git", self.host, self.owner, repo),
            Transport::Https => match username {
                Some(user) => format!("https://{}@{}/{}/{}.git", user, self.host, self.owner, repo),
                None => format!("https://{}/{}/{}.git", self.host, self.owner, repo),
            },
        }
    }
}

impl TemplateProfile {
    /// The built-in profile for the `dilu` Go template family.
    pub fn dilu() -> Self {
        Self {
            name: "dilu".into(),
            rules: RuleIdentifiers {
                type_prefix: "Dilu".into(),
                import_prefix: "dilu".into(),
                source_suffix: ".go".into(),
                template_suffix: ".template".into(),
            },
            manifest: ManifestSpec {
                file_name: "go.mod".into(),
                keyword: "module".into(),
                default_language_version: "go 1.21".into(),
            },
            config_paths: ConfigPathSpec {
                suffixes: vec![".yaml".into(), ".yml".into()],
                key: "front-path".into(),
                path_prefix: "../".into(),
                path_suffix: "/src".into(),
            },
            repositories: RepositorySources {
                host: "github.com".into(),
                owner: "baowk".into(),
                main: "dilu".into(),
                admin: "dilu-admin".into(),
                admin_suffix: "-admin".into(),
            },
        }
    }

    /// Check that every identifier the engine relies on is usable.
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("profile.name", &self.name),
            ("rules.type_prefix", &self.rules.type_prefix),
            ("rules.import_prefix", &self.rules.import_prefix),
            ("manifest.file_name", &self.manifest.file_name),
            ("manifest.keyword", &self.manifest.keyword),
            ("config_paths.key", &self.config_paths.key),
            ("repositories.host", &self.repositories.host),
            ("repositories.owner", &self.repositories.owner),
            ("repositories.main", &self.repositories.main),
            ("repositories.admin", &self.repositories.admin),
            ("repositories.admin_suffix", &self.repositories.admin_suffix),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidProfile(format!("{field} is empty")));
            }
        }

        let suffixes = [&self.rules.source_suffix, &self.rules.template_suffix]
            .into_iter()
            .chain(self.config_paths.suffixes.iter());
        for suffix in suffixes {
            if !suffix.starts_with('.') || suffix.len() < 2 {
                return Err(DomainError::InvalidProfile(format!(
                    "file suffix '{suffix}' must start with '.'"
                )));
            }
        }

        if self.config_paths.suffixes.is_empty() {
            return Err(DomainError::InvalidProfile(
                "config_paths.suffixes must list at least one suffix".into(),
            ));
        }

        if self.rules.import_prefix.contains('/') {
            return Err(DomainError::InvalidProfile(
                "rules.import_prefix must be a single path segment".into(),
            ));
        }

        Ok(())
    }
}

impl Default for TemplateProfile {
    fn default() -> Self {
        Self::dilu()
    }
}
