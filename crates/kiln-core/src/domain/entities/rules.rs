//! Substitution rules and the rule engine.
//!
//! A [`RuleSet`] is derived once per run from a [`TemplateProfile`], a
//! [`RuleSetVersion`] and the project name. It answers two questions:
//!
//! - which files are eligible ([`FileFilter`])
//! - what an eligible file's content becomes ([`RuleSet::apply`])
//!
//! Rules are applied in a fixed order, each as a single find-and-replace over
//! the whole content. No rule rescans the output of another.

use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::profile::TemplateProfile,
    value_objects::{ProjectName, RuleSetVersion},
};

/// What a rule rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    /// `Dilu` -> `Shop`
    TypePrefix,
    /// `"dilu/` -> `"shop/`
    ImportPrefix,
}

impl RuleKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TypePrefix => "type-prefix",
            Self::ImportPrefix => "import-prefix",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One literal find-and-replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubstitutionRule {
    pub kind: RuleKind,
    pub pattern: String,
    pub replacement: String,
}

impl SubstitutionRule {
    /// Replace the template's capitalized type prefix with the capitalized
    /// project name.
    pub fn type_prefix(profile: &TemplateProfile, name: &ProjectName) -> Self {
        Self {
            kind: RuleKind::TypePrefix,
            pattern: profile.rules.type_prefix.clone(),
            replacement: name.capitalized(),
        }
    }

    /// Replace the template's import prefix inside quoted import literals.
    ///
    /// Only the opening quote plus prefix plus separator is matched, so
    /// `"dilu/app"` is rewritten while `"github.com/x/dilu/app"` and
    /// `dilu/app` outside quotes are not.
    pub fn import_prefix(profile: &TemplateProfile, name: &ProjectName) -> Self {
        Self {
            kind: RuleKind::ImportPrefix,
            pattern: format!("\"{}/", profile.rules.import_prefix),
            replacement: format!("\"{}/", name.lowercase()),
        }
    }

    /// Apply this rule once over the whole content.
    pub fn apply(&self, content: &str) -> String {
        if self.pattern.is_empty() {
            return content.to_string();
        }
        content.replace(&self.pattern, &self.replacement)
    }

    /// [`apply`](Self::apply) over raw bytes.
    ///
    /// Patterns are plain literals, so files in any ASCII-compatible
    /// encoding are rewritten without being decoded first. Bytes outside the
    /// matches are copied through untouched.
    pub fn apply_bytes(&self, content: &[u8]) -> Vec<u8> {
        let pattern = self.pattern.as_bytes();
        if pattern.is_empty() {
            return content.to_vec();
        }

        let mut out = Vec::with_capacity(content.len());
        let mut rest = content;
        while let Some(at) = rest.windows(pattern.len()).position(|w| w == pattern) {
            out.extend_from_slice(&rest[..at]);
            out.extend_from_slice(self.replacement.as_bytes());
            rest = &rest[at + pattern.len()..];
        }
        out.extend_from_slice(rest);
        out
    }
}

impl fmt::Display for SubstitutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} -> {:?}",
            self.kind, self.pattern, self.replacement
        )
    }
}

/// Selects eligible files by name suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFilter {
    suffixes: Vec<String>,
}

impl FileFilter {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

/// The ordered, read-only rule set of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    version: RuleSetVersion,
    rules: Vec<SubstitutionRule>,
    filter: FileFilter,
}

impl RuleSet {
    /// Build the rule set for a version.
    pub fn for_version(
        version: RuleSetVersion,
        profile: &TemplateProfile,
        name: &ProjectName,
    ) -> Self {
        let ids = &profile.rules;
        match version {
            RuleSetVersion::V1 => Self {
                version,
                rules: vec![
                    SubstitutionRule::type_prefix(profile, name),
                    SubstitutionRule::import_prefix(profile, name),
                ],
                filter: FileFilter::new([ids.source_suffix.as_str(), ids.template_suffix.as_str()]),
            },
            RuleSetVersion::V2 => Self {
                version,
                rules: vec![SubstitutionRule::import_prefix(profile, name)],
                filter: FileFilter::new([ids.source_suffix.as_str()]),
            },
        }
    }

    pub fn version(&self) -> RuleSetVersion {
        self.version
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    pub fn is_eligible(&self, file_name: &str) -> bool {
        self.filter.matches(file_name)
    }

    /// Apply every rule, in order, exactly once over the whole content.
    pub fn apply(&self, content: &str) -> String {
        self.rules
            .iter()
            .fold(content.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Apply the rules and report whether anything changed.
    ///
    /// Returns `None` when the output is byte-identical to the input, so
    /// callers can skip the write.
    pub fn rewrite(&self, content: &str) -> Option<String> {
        let rewritten = self.apply(content);
        (rewritten != content).then_some(rewritten)
    }

    /// Byte-level [`rewrite`](Self::rewrite), used on files read from disk
    /// so content that is not valid UTF-8 is still rewritten.
    pub fn rewrite_bytes(&self, content: &[u8]) -> Option<Vec<u8>> {
        let rewritten = self
            .rules
            .iter()
            .fold(content.to_vec(), |acc, rule| rule.apply_bytes(&acc));
        (rewritten != content).then_some(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(version: RuleSetVersion, name: &str) -> RuleSet {
        RuleSet::for_version(
            version,
            &TemplateProfile::dilu(),
            &ProjectName::parse(name).unwrap(),
        )
    }

    const SOURCE: &str = r#"package main

import (
	"fmt"

	"dilu/common/config"
	core "dilu/core"
	"github.com/baowk/dilu-core/base"
)

type DiluServer struct{}

func NewDiluServer() *DiluServer { return &DiluServer{} }

// path dilu/not/an/import
"#;

    #[test]
    fn v1_rewrites_type_prefix_and_import_literals() {
        let out = rules(RuleSetVersion::V1, "shop").apply(SOURCE);

        assert!(out.contains("type ShopServer struct{}"));
        assert!(out.contains("func NewShopServer() *ShopServer"));
        assert!(out.contains("\"shop/common/config\""));
        assert!(out.contains("core \"shop/core\""));
        assert!(!out.contains("Dilu"));
    }

    #[test]
    fn import_rule_leaves_external_and_unquoted_paths_alone() {
        let out = rules(RuleSetVersion::V1, "shop").apply(SOURCE);

        assert!(out.contains("\"github.com/baowk/dilu-core/base\""));
        assert!(out.contains("// path dilu/not/an/import"));
    }

    #[test]
    fn v2_only_rewrites_imports() {
        let out = rules(RuleSetVersion::V2, "shop").apply(SOURCE);

        assert!(out.contains("\"shop/common/config\""));
        assert!(out.contains("type DiluServer struct{}"));
    }

    #[test]
    fn import_replacement_is_lower_cased() {
        let out = rules(RuleSetVersion::V1, "MyShop").apply("import \"dilu/app\"\nDiluApp");
        assert_eq!(out, "import \"myshop/app\"\nMyShopApp");
    }

    #[test]
    fn rewriting_twice_changes_nothing_more() {
        let set = rules(RuleSetVersion::V1, "shop");
        let once = set.apply(SOURCE);
        let twice = set.apply(&once);

        assert_eq!(once, twice);
        assert!(set.rewrite(&once).is_none());
    }

    #[test]
    fn rewrite_returns_none_when_nothing_matches() {
        let set = rules(RuleSetVersion::V1, "shop");
        assert!(set.rewrite("package util\n").is_none());
        assert!(set.rewrite("type Dilu struct{}").is_some());
    }

    #[test]
    fn both_rules_apply_to_the_same_literal() {
        let set = rules(RuleSetVersion::V1, "shop");
        assert_eq!(set.apply("\"dilu/DiluHandler\""), "\"shop/ShopHandler\"");
    }

    #[test]
    fn v1_filter_accepts_source_and_template_suffixes() {
        let set = rules(RuleSetVersion::V1, "shop");
        assert!(set.is_eligible("main.go"));
        assert!(set.is_eligible("router.go.template"));
        assert!(!set.is_eligible("config.yaml"));
        assert!(!set.is_eligible("go.mod"));
    }

    #[test]
    fn v2_filter_drops_template_suffix() {
        let set = rules(RuleSetVersion::V2, "shop");
        assert!(set.is_eligible("main.go"));
        assert!(!set.is_eligible("router.go.template"));
    }

    #[test]
    fn rule_order_is_fixed() {
        let set = rules(RuleSetVersion::V1, "shop");
        let kinds: Vec<_> = set.rules().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RuleKind::TypePrefix, RuleKind::ImportPrefix]);
    }

    #[test]
    fn byte_rewrite_keeps_non_utf8_bytes() {
        let set = rules(RuleSetVersion::V1, "shop");
        let latin1 = b"// Dilu caf\xe9 \xff\xfe\nimport \"dilu/app\"\n";

        let out = set.rewrite_bytes(latin1).unwrap();
        assert_eq!(out, b"// Shop caf\xe9 \xff\xfe\nimport \"shop/app\"\n".to_vec());
        assert!(set.rewrite_bytes(b"plain \xff bytes").is_none());
    }

    #[test]
    fn byte_and_text_rewrites_agree_on_utf8() {
        let set = rules(RuleSetVersion::V1, "shop");
        assert_eq!(
            set.rewrite_bytes(SOURCE.as_bytes()),
            set.rewrite(SOURCE).map(String::into_bytes)
        );
    }
}
