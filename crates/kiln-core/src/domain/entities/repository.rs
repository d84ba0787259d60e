use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ProjectName, RepositoryRole, Transport};

/// One repository to acquire and instantiate.
///
/// Derived from a `ProjectRequest` at the start of a run; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    role: RepositoryRole,
    source_url: String,
    destination: PathBuf,
    module_name: ProjectName,
}

impl RepositoryTarget {
    pub fn new(
        role: RepositoryRole,
        source_url: impl Into<String>,
        destination: impl Into<PathBuf>,
        module_name: ProjectName,
    ) -> Self {
        Self {
            role,
            source_url: source_url.into(),
            destination: destination.into(),
            module_name,
        }
    }

    pub const fn role(&self) -> RepositoryRole {
        self.role
    }
    pub fn source_url(&self) -> &str {
        &self.source_url
    }
    pub fn destination(&self) -> &Path {
        &self.destination
    }
    /// The name the tree's manifest must declare.
    pub fn module_name(&self) -> &ProjectName {
        &self.module_name
    }

    /// The fetch request handed to the acquisition port.
    pub fn fetch_request(&self, transport: Transport, username: Option<&str>) -> FetchRequest {
        FetchRequest {
            role: self.role,
            url: self.source_url.clone(),
            destination: self.destination.clone(),
            transport,
            username: username.map(str::to_string),
        }
    }
}

impl fmt::Display for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}",
            self.role,
            self.source_url,
            self.destination.display()
        )
    }
}

/// "Fetch repository `url` into `destination`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub role: RepositoryRole,
    pub url: String,
    pub destination: PathBuf,
    pub transport: Transport,
    pub username: Option<String>,
}

/// What the acquisition collaborator reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub success: bool,
    /// Raw, unparsed diagnostic text from the collaborator.
    pub output: String,
}

impl FetchOutput {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}
