//! The module-identity manifest (`go.mod` for the built-in profile).
//!
//! Only the first module declaration is ever touched; every other line is
//! kept byte-for-byte, including a trailing `\r` on the declaration line.

use crate::domain::{entities::profile::ManifestSpec, value_objects::ProjectName};

/// Result of rewriting an existing manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEdit {
    /// The declaration was replaced; holds the new file content.
    Updated(String),
    /// The declaration already names the project.
    AlreadyCurrent,
    /// No line starts with the declaration keyword.
    NoDeclaration,
}

/// The manifest of one tree, bound to the module name it must declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDescriptor<'a> {
    spec: &'a ManifestSpec,
    module_name: &'a ProjectName,
}

impl<'a> ManifestDescriptor<'a> {
    pub fn new(spec: &'a ManifestSpec, module_name: &'a ProjectName) -> Self {
        Self { spec, module_name }
    }

    pub fn file_name(&self) -> &str {
        &self.spec.file_name
    }

    /// The declaration line, e.g. `module shop`.
    pub fn declaration(&self) -> String {
        format!("{} {}", self.spec.keyword, self.module_name)
    }

    /// Minimal manifest written when the tree ships none.
    pub fn synthesize(&self) -> String {
        format!(
            "{}\n\n{}\n",
            self.declaration(),
            self.spec.default_language_version
        )
    }

    /// Replace the first declaration line in `content`.
    pub fn rewrite(&self, content: &str) -> ManifestEdit {
        let lines: Vec<&str> = content.split('\n').collect();

        let Some(index) = lines.iter().position(|line| self.is_declaration(line)) else {
            return ManifestEdit::NoDeclaration;
        };

        let carriage_return = if lines[index].ends_with('\r') { "\r" } else { "" };
        let replacement = format!("{}{}", self.declaration(), carriage_return);
        if lines[index] == replacement {
            return ManifestEdit::AlreadyCurrent;
        }

        let rewritten: Vec<&str> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| if i == index { replacement.as_str() } else { *line })
            .collect();
        ManifestEdit::Updated(rewritten.join("\n"))
    }

    fn is_declaration(&self, line: &str) -> bool {
        line.strip_prefix(self.spec.keyword.as_str())
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c == ' ' || c == '\t')
    }
}
