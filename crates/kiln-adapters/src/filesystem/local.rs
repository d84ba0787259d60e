//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use kiln_core::{
    application::ports::{DirEntry, Filesystem},
    error::{KilnError, KilnResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir(&self, path: &Path) -> KilnResult<()> {
        std::fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_file(&self, path: &Path) -> KilnResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_bytes(&self, path: &Path) -> KilnResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> KilnResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn read_dir(&self, path: &Path) -> KilnResult<Vec<DirEntry>> {
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;

        entries
            .map(|entry| {
                let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
                let file_type = entry
                    .file_type()
                    .map_err(|e| map_io_error(&entry.path(), e, "get metadata"))?;
                Ok(DirEntry {
                    path: entry.path(),
                    is_dir: file_type.is_dir(),
                })
            })
            .collect()
    }
}

pub(crate) fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    use kiln_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_dir_fails_when_directory_exists() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = tmp.path().join("shop");

        fs.create_dir(&dir).unwrap();
        assert!(fs.create_dir(&dir).is_err());
    }

    #[test]
    fn read_dir_reports_directories() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        fs.create_dir_all(&tmp.path().join(".git/objects")).unwrap();
        fs.write_file(&tmp.path().join("main.go"), "package main\n")
            .unwrap();

        let mut entries = fs.read_dir(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_dir);
        assert_eq!(entries[0].file_name(), ".git");
        assert!(!entries[1].is_dir);
        assert_eq!(
            fs.read_file(&entries[1].path).unwrap(),
            "package main\n"
        );
    }

    #[test]
    fn errors_name_the_path_and_operation() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.go");
        let err = LocalFilesystem::new().read_file(&missing).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nope.go"));
        assert!(message.contains("Failed to read file"));
    }

    #[test]
    fn bytes_round_trip_without_decoding() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let path = tmp.path().join("api.template");
        fs.write_bytes(&path, b"// Dilu \xff\xfe").unwrap();

        assert_eq!(fs.read_bytes(&path).unwrap(), b"// Dilu \xff\xfe".to_vec());
        assert!(fs.read_file(&path).is_err());
    }
}
