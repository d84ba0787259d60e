//! Offline fetcher that copies a template checkout from disk.

use std::fs;
use std::path::{Path, PathBuf};

use kiln_core::{
    application::ports::RepositoryFetcher,
    domain::{FetchOutput, FetchRequest, RepositoryRole},
};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Copies a local directory per repository role into the destination.
///
/// Everything is copied, `.git` included, so the result looks exactly like a
/// fresh clone. Symlinks are skipped.
#[derive(Debug, Clone)]
pub struct LocalDirectoryFetcher {
    main: PathBuf,
    admin: Option<PathBuf>,
}

impl LocalDirectoryFetcher {
    pub fn new(main: impl Into<PathBuf>) -> Self {
        Self {
            main: main.into(),
            admin: None,
        }
    }

    pub fn with_admin(mut self, admin: impl Into<PathBuf>) -> Self {
        self.admin = Some(admin.into());
        self
    }

    fn source(&self, role: RepositoryRole) -> Option<&Path> {
        match role {
            RepositoryRole::Main => Some(&self.main),
            RepositoryRole::Admin => self.admin.as_deref(),
        }
    }
}

impl RepositoryFetcher for LocalDirectoryFetcher {
    fn is_available(&self) -> bool {
        self.main.is_dir()
    }

    #[instrument(skip_all, fields(role = %request.role, dest = %request.destination.display()))]
    fn fetch(&self, request: &FetchRequest) -> FetchOutput {
        let Some(source) = self.source(request.role) else {
            return FetchOutput::failed(format!(
                "no local source directory configured for the {} repository",
                request.role
            ));
        };

        match copy_tree(source, &request.destination) {
            Ok(files) => {
                debug!(files, source = %source.display(), "Copied template");
                FetchOutput::succeeded(format!(
                    "Copied {files} files from {}",
                    source.display()
                ))
            }
            Err(message) => FetchOutput::failed(message),
        }
    }
}

/// Copy the contents of `source` into the existing directory `destination`.
fn copy_tree(source: &Path, destination: &Path) -> Result<usize, String> {
    if !source.is_dir() {
        return Err(format!(
            "source directory not found: {}",
            source.display()
        ));
    }

    let mut files = 0;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| format!("directory walk error: {e}"))?;
        let relative = entry.path().strip_prefix(source).map_err(|_| {
            format!(
                "failed to relativise '{}' against '{}'",
                entry.path().display(),
                source.display()
            )
        })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| format!("failed to create '{}': {e}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)
                .map_err(|e| format!("failed to copy '{}': {e}", entry.path().display()))?;
            files += 1;
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::domain::Transport;
    use tempfile::TempDir;

    fn request(role: RepositoryRole, destination: &Path) -> FetchRequest {
        FetchRequest {
            role,
            url: "git@github.com:baowk/dilu.git".into(),
            destination: destination.to_path_buf(),
            transport: Transport::Ssh,
            username: None,
        }
    }

    #[test]
    fn copies_tree_including_git_metadata() {
        let src = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join(".git")).unwrap();
        fs::write(src.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::create_dir_all(src.path().join("app")).unwrap();
        fs::write(src.path().join("app/main.go"), "package app\n").unwrap();

        let dest = TempDir::new().unwrap();
        let output = LocalDirectoryFetcher::new(src.path())
            .fetch(&request(RepositoryRole::Main, dest.path()));

        assert!(output.success, "{}", output.output);
        assert!(dest.path().join(".git/HEAD").is_file());
        assert_eq!(
            fs::read_to_string(dest.path().join("app/main.go")).unwrap(),
            "package app\n"
        );
    }

    #[test]
    fn admin_without_source_fails() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        let output = LocalDirectoryFetcher::new(src.path())
            .fetch(&request(RepositoryRole::Admin, dest.path()));

        assert!(!output.success);
        assert!(output.output.contains("admin"));
    }

    #[test]
    fn availability_tracks_main_source() {
        let src = TempDir::new().unwrap();
        assert!(LocalDirectoryFetcher::new(src.path()).is_available());
        assert!(!LocalDirectoryFetcher::new(src.path().join("missing")).is_available());
    }
}
