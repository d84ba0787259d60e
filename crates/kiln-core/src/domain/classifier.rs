//! Classification of raw acquisition output.
//!
//! The collaborator's diagnostic text is an opaque blob. Classifiers look for
//! known phrasings and nothing more: coverage is best-effort, and unmatched
//! text simply yields no classification.

use std::fmt;

/// A recognised kind of acquisition failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Authentication,
}

impl FailureKind {
    /// Remediation hint appended to the error shown to the user.
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::Authentication => {
                "Authentication failed: check the username and use a personal access token \
                 as the password, or switch to SSH"
            }
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => f.write_str("authentication"),
        }
    }
}

/// Pluggable matcher over raw acquisition output.
pub trait FailureClassifier: Send + Sync {
    fn classify(&self, output: &str) -> Option<FailureKind>;
}

/// Substring matcher for authentication failures reported by `git`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailureMatcher {
    patterns: Vec<String>,
}

impl AuthFailureMatcher {
    pub const DEFAULT_PATTERNS: [&'static str; 6] = [
        "Authentication failed",
        "could not read Username",
        "could not read Password",
        "terminal prompts disabled",
        "returned error: 403",
        "Invalid username or password",
    ];

    pub fn new() -> Self {
        Self {
            patterns: Self::DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Recognise one more phrasing.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for AuthFailureMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureClassifier for AuthFailureMatcher {
    fn classify(&self, output: &str) -> Option<FailureKind> {
        self.patterns
            .iter()
            .any(|p| output.contains(p.as_str()))
            .then_some(FailureKind::Authentication)
    }
}
