//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `KILN_<SECTION>__<KEY>`, e.g.
//!    `KILN_DEFAULTS__TRANSPORT=https`
//! 3. `--config FILE` if given; otherwise `.kiln.toml` in the current
//!    directory layered over the platform config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use kiln_core::domain::{RuleSetVersion, Transport};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".kiln.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// Rule set selection.
    pub rules: RulesConfig,
    /// Template settings.
    pub templates: TemplateConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Parent directory for new projects.
    pub output_dir: Option<PathBuf>,
    pub transport: Transport,
    /// Username for HTTPS URLs.
    pub username: Option<String>,
    /// Create the admin project on every run.
    pub extended: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Forced rule set version; unset means the workflow default.
    pub version: Option<RuleSetVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Profile file used when `--profile` is not given.
    pub profile_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, files and the environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. The implicit files are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file.map(PathBuf::as_path), Some(&Self::config_path()))
    }

    fn load_from(explicit: Option<&Path>, global: Option<&Path>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;
        let mut builder = Config::builder().add_source(defaults);

        match explicit {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(global) = global {
                    builder = builder
                        .add_source(File::from(global).format(FileFormat::Toml).required(false));
                }
                builder = builder.add_source(
                    File::new(LOCAL_CONFIG_FILE, FileFormat::Toml).required(false),
                );
            }
        }

        let source = explicit
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "default locations".into());

        builder
            .add_source(
                Environment::with_prefix("KILN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {source}"))?
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {source}"))
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Look up a dotted key such as `defaults.transport`.
    ///
    /// Returns `None` for unknown keys; unset optional values render as an
    /// empty string.
    pub fn get(&self, key: &str) -> Option<String> {
        let tree = serde_json::to_value(self).ok()?;
        let value = key
            .split('.')
            .try_fold(&tree, |node, part| node.get(part))?;

        Some(match value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(_) => return None,
            other => other.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_ssh_single_project() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.transport, Transport::Ssh);
        assert!(!cfg.defaults.extended);
        assert!(cfg.rules.version.is_none());
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("kiln.toml");
        fs::write(
            &path,
            "[defaults]\ntransport = \"https\"\nusername = \"bob\"\n\n[rules]\nversion = \"v2\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(Some(&path), None).unwrap();
        assert_eq!(cfg.defaults.transport, Transport::Https);
        assert_eq!(cfg.defaults.username.as_deref(), Some("bob"));
        assert_eq!(cfg.rules.version, Some(RuleSetVersion::V2));
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");
        assert!(AppConfig::load_from(Some(&path), None).is_err());
    }

    #[test]
    fn missing_global_file_is_fine() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("config.toml");
        let cfg = AppConfig::load_from(None, Some(&global)).unwrap();
        assert_eq!(cfg.defaults.transport, Transport::Ssh);
    }

    #[test]
    fn get_known_keys() {
        let mut cfg = AppConfig::default();
        cfg.defaults.username = Some("bob".into());
        assert_eq!(cfg.get("defaults.transport").as_deref(), Some("ssh"));
        assert_eq!(cfg.get("defaults.username").as_deref(), Some("bob"));
        assert_eq!(cfg.get("defaults.extended").as_deref(), Some("false"));
        assert_eq!(cfg.get("rules.version").as_deref(), Some(""));
    }

    #[test]
    fn get_unknown_or_section_key_is_none() {
        let cfg = AppConfig::default();
        assert!(cfg.get("does.not.exist").is_none());
        assert!(cfg.get("defaults").is_none());
    }

    #[test]
    fn serialises_to_toml() {
        let toml = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml.contains("[defaults]"));
        assert!(toml.contains("transport = \"ssh\""));
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
