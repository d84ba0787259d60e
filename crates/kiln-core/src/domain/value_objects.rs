//! Domain value objects: ProjectName, Transport, RepositoryRole, RuleSetVersion.
//!
//! # Design
//!
//! These are pure value types: equality-by-value, no identity. This file's
//! only job is to define the types, their string representations, and their
//! `FromStr` parsers. Behaviour that combines them lives in `entities`.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ProjectName ───────────────────────────────────────────────────────────────

/// A validated project name.
///
/// Invariants (enforced by [`ProjectName::parse`]):
/// - not empty
/// - does not start with `.`
/// - contains no path separators
/// - contains no whitespace or control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let reject = |reason: &str| DomainError::InvalidProjectName {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("name cannot be empty"));
        }
        if name.starts_with('.') {
            return Err(reject("name cannot start with '.'"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(reject("name cannot contain path separators"));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(reject("name cannot contain whitespace"));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name with every character lower-cased (`MyShop` -> `myshop`).
    pub fn lowercase(&self) -> String {
        self.0.to_lowercase()
    }

    /// The name with only its first character upper-cased (`shop` -> `Shop`).
    ///
    /// The remaining characters are kept exactly as typed. A first character
    /// whose upper case is more than one character (`ß` -> `SS`) is left
    /// alone, so the result always has as many characters as the name.
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        let Some(first) = chars.next() else {
            return String::new();
        };

        let mut upper = first.to_uppercase();
        let first = match (upper.next(), upper.next()) {
            (Some(single), None) => single,
            _ => first,
        };
        std::iter::once(first).chain(chars).collect()
    }

    /// Derive a sibling name such as `shop-admin`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{suffix}", self.0))
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectName> for String {
    fn from(name: ProjectName) -> Self {
        name.0
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

/// How template repositories are fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Ssh,
    Https,
}

impl Transport {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ssh" | "git" => Ok(Self::Ssh),
            "https" | "http" => Ok(Self::Https),
            other => Err(DomainError::InvalidRequest(format!(
                "unknown transport: {other}"
            ))),
        }
    }
}

// ── RepositoryRole ────────────────────────────────────────────────────────────

/// The role a repository plays in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryRole {
    /// The primary backend project. Its failures are fatal.
    Main,
    /// The paired front-end project. Its failures are reported, never fatal.
    Admin,
}

impl RepositoryRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Admin => "admin",
        }
    }

    pub const fn is_fatal_on_failure(self) -> bool {
        matches!(self, Self::Main)
    }
}

impl fmt::Display for RepositoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RuleSetVersion ────────────────────────────────────────────────────────────

/// Which generation of substitution rules to apply.
///
/// - `V1` rewrites type-name prefixes and import prefixes in source and
///   template-suffix files.
/// - `V2` rewrites import prefixes in source files only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetVersion {
    V1,
    V2,
}

impl RuleSetVersion {
    pub const ALL: [RuleSetVersion; 2] = [Self::V1, Self::V2];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::V1 => "type prefix + import prefix, source and template files",
            Self::V2 => "import prefix only, source files only",
        }
    }

    /// The version a workflow uses when none is forced.
    pub const fn default_for(extended: bool) -> Self {
        if extended { Self::V2 } else { Self::V1 }
    }
}

impl fmt::Display for RuleSetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleSetVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" | "classic" => Ok(Self::V1),
            "v2" | "2" | "import-only" => Ok(Self::V2),
            other => Err(DomainError::InvalidRequest(format!(
                "unknown rule set version: {other}"
            ))),
        }
    }
}
