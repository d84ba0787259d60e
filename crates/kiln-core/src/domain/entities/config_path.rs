//! Line-oriented rewriting of the admin cross-reference in config files.
//!
//! This is text substitution keyed on a fixed phrase, not a document parser:
//! a key and path split across lines, or a path quoted differently, is
//! silently left alone.

use crate::domain::entities::{profile::ConfigPathSpec, rules::FileFilter};

/// Rewrites `<key>: ../<template-admin>/src` into `<key>: ../<project-admin>/src`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPathRewrite {
    key: String,
    from: String,
    to: String,
    filter: FileFilter,
}

impl ConfigPathRewrite {
    /// `template_admin` is the admin directory the template points at,
    /// `project_admin` the one the new project owns.
    pub fn new(spec: &ConfigPathSpec, template_admin: &str, project_admin: &str) -> Self {
        Self {
            key: spec.key.clone(),
            from: spec.literal_for(template_admin),
            to: spec.literal_for(project_admin),
            filter: FileFilter::new(spec.suffixes.iter().map(String::as_str)),
        }
    }

    pub fn is_eligible(&self, file_name: &str) -> bool {
        self.filter.matches(file_name)
    }

    pub fn from_literal(&self) -> &str {
        &self.from
    }

    pub fn to_literal(&self) -> &str {
        &self.to
    }

    /// Rewrite every matching line.
    ///
    /// Returns the new content and the number of rewritten lines, or `None`
    /// when no line matched.
    pub fn rewrite(&self, content: &str) -> Option<(String, usize)> {
        if self.from == self.to {
            return None;
        }

        let mut rewritten = 0;
        let lines: Vec<String> = content
            .split('\n')
            .map(|line| {
                if self.matches(line) {
                    rewritten += 1;
                    line.replace(&self.from, &self.to)
                } else {
                    line.to_string()
                }
            })
            .collect();

        (rewritten > 0).then(|| (lines.join("\n"), rewritten))
    }

    fn matches(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.contains(self.key.as_str()) && trimmed.contains(self.from.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::profile::TemplateProfile;

    fn rewriter() -> ConfigPathRewrite {
        ConfigPathRewrite::new(
            &TemplateProfile::dilu().config_paths,
            "dilu-admin",
            "acme-admin",
        )
    }

    #[test]
    fn rewrites_path_and_keeps_indentation() {
        let yaml = "gen:\n  enable: true\n  front-path: ../dilu-admin/src\n";
        let (out, count) = rewriter().rewrite(yaml).unwrap();

        assert_eq!(out, "gen:\n  enable: true\n  front-path: ../acme-admin/src\n");
        assert_eq!(count, 1);
    }

    #[test]
    fn rewrites_every_matching_line() {
        let yaml = "a:\n  front-path: ../dilu-admin/src\nb:\n\tfront-path: \"../dilu-admin/src\" # keep\n";
        let (out, count) = rewriter().rewrite(yaml).unwrap();

        assert_eq!(count, 2);
        assert!(out.contains("  front-path: ../acme-admin/src"));
        assert!(out.contains("\tfront-path: \"../acme-admin/src\" # keep"));
    }

    #[test]
    fn line_without_key_is_untouched() {
        let yaml = "other-path: ../dilu-admin/src\n";
        assert!(rewriter().rewrite(yaml).is_none());
    }

    #[test]
    fn key_and_path_on_separate_lines_are_not_matched() {
        let yaml = "front-path:\n  ../dilu-admin/src\n";
        assert!(rewriter().rewrite(yaml).is_none());
    }

    #[test]
    fn eligibility_follows_config_suffixes() {
        let r = rewriter();
        assert!(r.is_eligible("config.dev.yaml"));
        assert!(r.is_eligible("settings.yml"));
        assert!(!r.is_eligible("config.json"));
    }

    #[test]
    fn identical_literals_never_rewrite() {
        let spec = TemplateProfile::dilu().config_paths;
        let r = ConfigPathRewrite::new(&spec, "dilu-admin", "dilu-admin");
        assert!(r.rewrite("front-path: ../dilu-admin/src").is_none());
    }
}
