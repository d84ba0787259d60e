//! Instantiation Service - turns an acquired template tree into a project.
//!
//! Three operations, all rooted at an explicit directory:
//! 1. [`rewrite_tree`](InstantiationService::rewrite_tree): walk the tree and
//!    run the rule engine over every eligible file
//! 2. [`rewrite_manifest`](InstantiationService::rewrite_manifest): update or
//!    synthesize the module manifest
//! 3. [`rewrite_config_paths`](InstantiationService::rewrite_config_paths):
//!    point config files at the renamed admin sibling
//!
//! Nothing here is transactional. A failure aborts the operation and leaves
//! whatever was already written on disk.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};

use crate::{
    application::ports::{DirEntry, Filesystem},
    domain::{ConfigPathRewrite, ManifestDescriptor, ManifestEdit, RuleSet},
    error::KilnResult,
};

/// Counters for one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Eligible files read.
    pub visited: usize,
    /// Files whose content changed and were written back.
    pub rewritten: usize,
}

/// What happened to the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestChange {
    /// No manifest existed; a minimal one was written.
    Synthesized,
    /// The module declaration was replaced.
    Updated,
    /// The declaration already named the module.
    Unchanged,
    /// The manifest has no module declaration and was left alone.
    NoDeclaration,
}

/// Rewrites one acquired tree in place.
pub struct InstantiationService<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> InstantiationService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Apply `rules` to every eligible file under `root`.
    ///
    /// Hidden directories (including `.git`) are never descended into. Files
    /// are rewritten as raw bytes, so any encoding is accepted, and written
    /// only when their content changes.
    #[instrument(skip_all, fields(root = %root.display(), rules = %rules.version()))]
    pub fn rewrite_tree(&self, root: &Path, rules: &RuleSet) -> KilnResult<TreeStats> {
        let mut stats = TreeStats::default();

        self.walk(root, &mut |entry| {
            if !rules.is_eligible(&entry.file_name()) {
                return Ok(());
            }

            stats.visited += 1;
            let content = self.filesystem.read_bytes(&entry.path)?;
            if let Some(updated) = rules.rewrite_bytes(&content) {
                self.filesystem.write_bytes(&entry.path, &updated)?;
                stats.rewritten += 1;
                trace!(file = %entry.path.display(), "Rewrote");
            }
            Ok(())
        })?;

        debug!(
            visited = stats.visited,
            rewritten = stats.rewritten,
            "Tree rewrite finished"
        );
        Ok(stats)
    }

    /// Make the manifest under `root` declare `manifest`'s module name.
    #[instrument(skip_all, fields(root = %root.display(), module = %manifest.declaration()))]
    pub fn rewrite_manifest(
        &self,
        root: &Path,
        manifest: &ManifestDescriptor<'_>,
    ) -> KilnResult<ManifestChange> {
        let path = root.join(manifest.file_name());

        if !self.filesystem.exists(&path) {
            self.filesystem.write_file(&path, &manifest.synthesize())?;
            debug!(path = %path.display(), "Synthesized manifest");
            return Ok(ManifestChange::Synthesized);
        }

        let content = self.filesystem.read_file(&path)?;
        match manifest.rewrite(&content) {
            ManifestEdit::Updated(updated) => {
                self.filesystem.write_file(&path, &updated)?;
                Ok(ManifestChange::Updated)
            }
            ManifestEdit::AlreadyCurrent => Ok(ManifestChange::Unchanged),
            ManifestEdit::NoDeclaration => Ok(ManifestChange::NoDeclaration),
        }
    }

    /// Rewrite the admin-sibling path in every config file under `root`.
    ///
    /// Returns the files that changed.
    #[instrument(skip_all, fields(root = %root.display(), to = rewrite.to_literal()))]
    pub fn rewrite_config_paths(
        &self,
        root: &Path,
        rewrite: &ConfigPathRewrite,
    ) -> KilnResult<Vec<PathBuf>> {
        let mut changed = Vec::new();

        self.walk(root, &mut |entry| {
            if !rewrite.is_eligible(&entry.file_name()) {
                return Ok(());
            }

            let content = self.filesystem.read_file(&entry.path)?;
            if let Some((updated, lines)) = rewrite.rewrite(&content) {
                self.filesystem.write_file(&entry.path, &updated)?;
                debug!(file = %entry.path.display(), lines, "Updated config path");
                changed.push(entry.path.clone());
            }
            Ok(())
        })?;

        Ok(changed)
    }

    /// Depth-first walk calling `visit` for every file.
    ///
    /// Entries are visited in name order so runs are reproducible. The root
    /// itself is never subject to the hidden-directory check.
    fn walk(
        &self,
        dir: &Path,
        visit: &mut dyn FnMut(&DirEntry) -> KilnResult<()>,
    ) -> KilnResult<()> {
        let mut entries = self.filesystem.read_dir(dir)?;
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        for entry in &entries {
            if entry.is_dir {
                if is_hidden(entry) {
                    trace!(dir = %entry.path.display(), "Skipping hidden directory");
                    continue;
                }
                self.walk(&entry.path, visit)?;
            } else {
                visit(entry)?;
            }
        }
        Ok(())
    }
}

/// `.git` and every other dot-directory.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().starts_with('.')
}
