//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use kiln_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    error::KilnResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can hand one clone to a service and
/// inspect the other afterwards.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    /// Writes and removals at or below these paths fail.
    read_only: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn is_read_only(&self, path: &Path) -> bool {
        self.read_only.iter().any(|p| path.starts_with(p))
    }

    fn insert_dir_all(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.directories.contains(parent),
            _ => true,
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a file, creating its parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = path.as_ref();
        let mut inner = self.write();
        if let Some(parent) = path.parent() {
            inner.insert_dir_all(parent);
        }
        inner
            .files
            .insert(path.to_path_buf(), content.as_ref().to_vec());
    }

    /// Add a directory and its parents (testing helper).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.write().insert_dir_all(path.as_ref());
    }

    /// Make writes and removals under `path` fail.
    pub fn deny_writes(&self, path: impl AsRef<Path>) {
        self.write().read_only.insert(path.as_ref().to_path_buf());
    }

    /// A file's content as text, if it exists and is UTF-8 (testing helper).
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.bytes(path).and_then(|b| String::from_utf8(b).ok())
    }

    /// A file's raw content, if it exists (testing helper).
    pub fn bytes(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.read().files.get(path.as_ref()).cloned()
    }

    /// Whether `path` is a known directory.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.read().directories.contains(path.as_ref())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.files.clear();
        inner.directories.clear();
        inner.read_only.clear();
    }

    // A panic while holding the lock only happens inside a failing test; the
    // data is still usable for the report.
    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn fs_error(path: &Path, reason: &str) -> kiln_core::error::KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write();

        if inner.directories.contains(path) || inner.files.contains_key(path) {
            return Err(fs_error(path, "Failed to create directory: already exists"));
        }
        if !inner.parent_exists(path) {
            return Err(fs_error(path, "Parent directory does not exist"));
        }
        if inner.is_read_only(path) {
            return Err(fs_error(path, "Failed to create directory: permission denied"));
        }

        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write();
        if inner.is_read_only(path) {
            return Err(fs_error(path, "Failed to create directory: permission denied"));
        }
        inner.insert_dir_all(path);
        Ok(())
    }

    fn read_file(&self, path: &Path) -> KilnResult<String> {
        String::from_utf8(self.read_bytes(path)?).map_err(|_| {
            fs_error(path, "Failed to read file: stream did not contain valid UTF-8")
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        self.write_bytes(path, content.as_bytes())
    }

    fn read_bytes(&self, path: &Path) -> KilnResult<Vec<u8>> {
        self.read()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "Failed to read file: not found"))
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> KilnResult<()> {
        let mut inner = self.write();

        if !inner.parent_exists(path) {
            return Err(fs_error(path, "Parent directory does not exist"));
        }
        if inner.is_read_only(path) {
            return Err(fs_error(path, "Failed to write file: permission denied"));
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.write();

        if !inner.directories.contains(path) {
            return Err(fs_error(path, "Failed to remove directory: not found"));
        }
        if inner.is_read_only(path) {
            return Err(fs_error(path, "Failed to remove directory: permission denied"));
        }

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> KilnResult<Vec<DirEntry>> {
        let inner = self.read();

        if !inner.directories.contains(path) {
            return Err(fs_error(path, "Failed to list directory: not found"));
        }

        let dirs = inner
            .directories
            .iter()
            .filter(|p| p.parent() == Some(path))
            .map(DirEntry::dir);
        let files = inner
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .map(DirEntry::file);

        Ok(dirs.chain(files).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_dir_lists_direct_children_only() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/t/main.go", "package main");
        fs.add_file("/t/app/router.go", "package app");
        fs.add_dir("/t/.git/objects");

        let mut names: Vec<_> = fs
            .read_dir(Path::new("/t"))
            .unwrap()
            .into_iter()
            .map(|e| (e.file_name(), e.is_dir))
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                (".git".to_string(), true),
                ("app".to_string(), true),
                ("main.go".to_string(), false),
            ]
        );
    }

    #[test]
    fn create_dir_requires_parent_and_absence() {
        let fs = MemoryFilesystem::new();
        assert!(fs.create_dir(Path::new("/work/shop")).is_err());

        fs.add_dir("/work");
        fs.create_dir(Path::new("/work/shop")).unwrap();
        assert!(fs.create_dir(Path::new("/work/shop")).is_err());
    }

    #[test]
    fn remove_dir_all_drops_the_subtree() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/t/.git/HEAD", "ref: refs/heads/main");
        fs.add_file("/t/main.go", "package main");

        fs.remove_dir_all(Path::new("/t/.git")).unwrap();

        assert!(!fs.exists(Path::new("/t/.git")));
        assert!(!fs.exists(Path::new("/t/.git/HEAD")));
        assert!(fs.exists(Path::new("/t/main.go")));
    }

    #[test]
    fn denied_paths_reject_writes() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/t/main.go", "package main");
        fs.deny_writes("/t");

        assert!(fs.write_file(Path::new("/t/main.go"), "x").is_err());
        assert_eq!(fs.contents("/t/main.go").as_deref(), Some("package main"));
    }

    #[test]
    fn text_reads_reject_non_utf8_content() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/t/api.template", b"\xff\xfe");

        assert!(fs.read_file(Path::new("/t/api.template")).is_err());
        assert_eq!(
            fs.read_bytes(Path::new("/t/api.template")).unwrap(),
            b"\xff\xfe".to_vec()
        );
        assert!(fs.contents("/t/api.template").is_none());
    }
}
