//! `git` command-line fetcher.

use std::ffi::OsString;
use std::process::Command;

use kiln_core::{
    application::ports::RepositoryFetcher,
    domain::{FetchOutput, FetchRequest},
};
use tracing::{debug, instrument, warn};

/// Clones template repositories with the `git` executable.
///
/// The clone runs with the destination as the child's working directory
/// (`git clone <url> .`), so the process's own current directory is never
/// changed.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    program: OsString,
}

impl GitFetcher {
    pub fn new() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }

    /// Use a specific `git` binary.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryFetcher for GitFetcher {
    fn is_available(&self) -> bool {
        match Command::new(&self.program).arg("--version").output() {
            Ok(output) => {
                debug!(
                    version = %String::from_utf8_lossy(&output.stdout).trim(),
                    "git probe"
                );
                output.status.success()
            }
            Err(e) => {
                warn!(error = %e, "git is not runnable");
                false
            }
        }
    }

    #[instrument(skip_all, fields(url = %request.url, dest = %request.destination.display()))]
    fn fetch(&self, request: &FetchRequest) -> FetchOutput {
        let result = Command::new(&self.program)
            .args(["clone", request.url.as_str(), "."])
            .current_dir(&request.destination)
            // Captured output cannot show a credential prompt; fail instead of hanging.
            .env("GIT_TERMINAL_PROMPT", "0")
            .output();

        match result {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));

                if output.status.success() {
                    FetchOutput::succeeded(text)
                } else {
                    debug!(status = %output.status, "git clone failed");
                    FetchOutput::failed(text)
                }
            }
            Err(e) => FetchOutput::failed(format!("failed to run git: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::domain::{RepositoryRole, Transport};
    use tempfile::TempDir;

    #[test]
    fn missing_program_is_unavailable() {
        let fetcher = GitFetcher::with_program("kiln-test-no-such-git-binary");
        assert!(!fetcher.is_available());
    }

    #[test]
    fn missing_program_fails_fetch_with_output() {
        let tmp = TempDir::new().unwrap();
        let fetcher = GitFetcher::with_program("kiln-test-no-such-git-binary");

        let output = fetcher.fetch(&FetchRequest {
            role: RepositoryRole::Main,
            url: "git@github.com:baowk/dilu.git".into(),
            destination: tmp.path().to_path_buf(),
            transport: Transport::Ssh,
            username: None,
        });

        assert!(!output.success);
        assert!(output.output.contains("failed to run git"));
    }
}
