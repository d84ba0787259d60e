//! TOML profile files.
//!
//! A profile file describes a template family other than the built-in
//! `dilu` one. Every section and field is optional; anything left out keeps
//! the built-in value. Unknown fields are an error so typos do not silently
//! fall back.
//!
//! # Format
//!
//! ```toml
//! [profile]
//! name = "gin-starter"
//!
//! [rules]
//! type_prefix     = "Gin"
//! import_prefix   = "gin-starter"
//! source_suffix   = ".go"
//! template_suffix = ".tmpl"
//!
//! [manifest]
//! file_name                = "go.mod"
//! keyword                  = "module"
//! default_language_version = "go 1.22"
//!
//! [config_paths]
//! suffixes    = [".yaml", ".yml"]
//! key         = "front-path"
//! path_prefix = "../"
//! path_suffix = "/src"
//!
//! [repositories]
//! host         = "github.com"
//! owner        = "acme"
//! main         = "gin-starter"
//! admin        = "gin-starter-admin"
//! admin_suffix = "-admin"
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use tracing::{debug, instrument};

use kiln_core::domain::{DomainError, DomainValidator, TemplateProfile};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    #[serde(default)]
    profile: ProfileSection,
    #[serde(default)]
    rules: RulesSection,
    #[serde(default)]
    manifest: ManifestSection,
    #[serde(default)]
    config_paths: ConfigPathsSection,
    #[serde(default)]
    repositories: RepositoriesSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileSection {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesSection {
    type_prefix: Option<String>,
    import_prefix: Option<String>,
    source_suffix: Option<String>,
    template_suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestSection {
    file_name: Option<String>,
    keyword: Option<String>,
    default_language_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPathsSection {
    suffixes: Option<Vec<String>>,
    key: Option<String>,
    path_prefix: Option<String>,
    path_suffix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RepositoriesSection {
    host: Option<String>,
    owner: Option<String>,
    main: Option<String>,
    admin: Option<String>,
    admin_suffix: Option<String>,
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl ProfileFile {
    fn apply_to(self, mut profile: TemplateProfile) -> TemplateProfile {
        merge(&mut profile.name, self.profile.name);

        let rules = &mut profile.rules;
        merge(&mut rules.type_prefix, self.rules.type_prefix);
        merge(&mut rules.import_prefix, self.rules.import_prefix);
        merge(&mut rules.source_suffix, self.rules.source_suffix);
        merge(&mut rules.template_suffix, self.rules.template_suffix);

        let manifest = &mut profile.manifest;
        merge(&mut manifest.file_name, self.manifest.file_name);
        merge(&mut manifest.keyword, self.manifest.keyword);
        merge(
            &mut manifest.default_language_version,
            self.manifest.default_language_version,
        );

        let config = &mut profile.config_paths;
        merge(&mut config.suffixes, self.config_paths.suffixes);
        merge(&mut config.key, self.config_paths.key);
        merge(&mut config.path_prefix, self.config_paths.path_prefix);
        merge(&mut config.path_suffix, self.config_paths.path_suffix);

        let repos = &mut profile.repositories;
        merge(&mut repos.host, self.repositories.host);
        merge(&mut repos.owner, self.repositories.owner);
        merge(&mut repos.main, self.repositories.main);
        merge(&mut repos.admin, self.repositories.admin);
        merge(&mut repos.admin_suffix, self.repositories.admin_suffix);

        profile
    }
}

/// Parse profile TOML and merge it onto the built-in profile.
///
/// # Errors
///
/// Returns [`DomainError::InvalidProfile`] if the text is not valid TOML,
/// names an unknown field, or yields a profile that fails validation.
pub fn parse_profile(raw: &str) -> Result<TemplateProfile, DomainError> {
    let file: ProfileFile = toml::from_str(raw)
        .map_err(|e| DomainError::InvalidProfile(format!("failed to parse profile: {e}")))?;

    let profile = file.apply_to(TemplateProfile::dilu());
    DomainValidator::validate_profile(&profile)?;
    Ok(profile)
}

/// Load a profile file from disk.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_profile(path: &Path) -> Result<TemplateProfile, DomainError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        DomainError::InvalidProfile(format!("failed to read '{}': {e}", path.display()))
    })?;

    let profile = parse_profile(&raw).map_err(|e| match e {
        DomainError::InvalidProfile(msg) => {
            DomainError::InvalidProfile(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;

    debug!(name = %profile.name, "loaded profile");
    Ok(profile)
}
