//! Scripted fetcher backed by [`MemoryFilesystem`].

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use kiln_core::{
    application::ports::RepositoryFetcher,
    domain::{FetchOutput, FetchRequest, RepositoryRole},
};

use crate::filesystem::MemoryFilesystem;

#[derive(Debug, Clone)]
enum Script {
    Tree(Vec<(PathBuf, String)>),
    Failure(String),
}

/// Fetcher for tests: "clones" scripted trees into a [`MemoryFilesystem`].
///
/// Roles without a script fail with a generic message.
#[derive(Debug, Clone)]
pub struct MemoryFetcher {
    filesystem: MemoryFilesystem,
    scripts: HashMap<RepositoryRole, Script>,
    available: bool,
    requests: Arc<Mutex<Vec<FetchRequest>>>,
}

impl MemoryFetcher {
    pub fn new(filesystem: MemoryFilesystem) -> Self {
        Self {
            filesystem,
            scripts: HashMap::new(),
            available: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `files` (paths relative to the destination) for `role`.
    pub fn with_tree<P, C>(
        mut self,
        role: RepositoryRole,
        files: impl IntoIterator<Item = (P, C)>,
    ) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(p, c)| (p.into(), c.into()))
            .collect();
        self.scripts.insert(role, Script::Tree(files));
        self
    }

    /// Fail fetches for `role` with the given raw output.
    pub fn with_failure(mut self, role: RepositoryRole, output: impl Into<String>) -> Self {
        self.scripts.insert(role, Script::Failure(output.into()));
        self
    }

    /// Report the fetcher as unavailable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl RepositoryFetcher for MemoryFetcher {
    fn is_available(&self) -> bool {
        self.available
    }

    fn fetch(&self, request: &FetchRequest) -> FetchOutput {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        match self.scripts.get(&request.role) {
            Some(Script::Tree(files)) => {
                for (relative, content) in files {
                    self.filesystem
                        .add_file(request.destination.join(relative), content.clone());
                }
                FetchOutput::succeeded(format!("Cloning into '.'...\n{} files", files.len()))
            }
            Some(Script::Failure(output)) => FetchOutput::failed(output.clone()),
            None => FetchOutput::failed(format!(
                "fatal: repository '{}' not found",
                request.url
            )),
        }
    }
}
