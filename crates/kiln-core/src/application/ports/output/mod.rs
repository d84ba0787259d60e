//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{FetchOutput, FetchRequest, Step, StepReport};
use crate::error::KilnResult;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }

    /// Final path component, lossily converted.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
///
/// All paths are explicit; nothing here depends on the process's current
/// directory.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a single directory. Fails if it already exists.
    fn create_dir(&self, path: &Path) -> KilnResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Read a whole file as text. Fails on content that is not UTF-8.
    fn read_file(&self, path: &Path) -> KilnResult<String>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()>;

    /// Read a whole file as raw bytes, whatever its encoding.
    fn read_bytes(&self, path: &Path) -> KilnResult<Vec<u8>>;

    /// Write raw bytes to a file, replacing it.
    fn write_bytes(&self, path: &Path, content: &[u8]) -> KilnResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// List the direct children of a directory.
    fn read_dir(&self, path: &Path) -> KilnResult<Vec<DirEntry>>;
}

/// Port for template repository acquisition.
///
/// Implemented by:
/// - `kiln_adapters::fetcher::GitFetcher` (production)
/// - `kiln_adapters::fetcher::LocalDirectoryFetcher` (offline checkouts)
/// - `kiln_adapters::fetcher::MemoryFetcher` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryFetcher: Send + Sync {
    /// Whether the underlying tool can run at all.
    fn is_available(&self) -> bool;

    /// Fetch `request.url` into `request.destination`, which already exists
    /// and is empty.
    fn fetch(&self, request: &FetchRequest) -> FetchOutput;
}

/// Port for progress reporting.
///
/// Every step the workflow reaches produces exactly one `step_finished`.
pub trait WorkflowObserver: Send + Sync {
    fn step_started(&self, _step: Step) {}

    fn step_finished(&self, _report: &StepReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl WorkflowObserver for NoopObserver {}
