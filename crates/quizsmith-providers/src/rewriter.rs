//! Rule-based stem rewriting.
//!
//! The model file is a JSON array of `{pattern, replacement}` entries where
//! `pattern` is a regex over the templated stem and `replacement` may use
//! capture groups. The first matching rule wins. Rules are authored per
//! deployment to vary question phrasing without touching code.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use quizsmith_core::error::CapabilityError;
use quizsmith_core::traits::StemRewriter;

#[derive(Debug, Deserialize)]
struct RawRule {
    pattern: String,
    replacement: String,
}

#[derive(Debug)]
struct Rule {
    pattern: Regex,
    replacement: String,
}

/// A stem rewriter driven by a regex rule file.
#[derive(Debug)]
pub struct RuleRewriter {
    rules: Vec<Rule>,
}

impl RuleRewriter {
    /// Load rewrite rules from a JSON model file.
    pub fn load(path: &Path) -> Result<Self, CapabilityError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CapabilityError::ModelUnavailable(format!("{}: {e}", path.display()))
        })?;
        let raw: Vec<RawRule> =
            serde_json::from_str(&content).map_err(|e| CapabilityError::MalformedModel {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if raw.is_empty() {
            return Err(CapabilityError::MalformedModel {
                path: path.display().to_string(),
                message: "no rewrite rules".into(),
            });
        }

        let mut rules = Vec::with_capacity(raw.len());
        for entry in raw {
            let pattern =
                Regex::new(&entry.pattern).map_err(|e| CapabilityError::MalformedModel {
                    path: path.display().to_string(),
                    message: format!("bad pattern {:?}: {e}", entry.pattern),
                })?;
            rules.push(Rule {
                pattern,
                replacement: entry.replacement,
            });
        }
        Ok(Self { rules })
    }
}

impl StemRewriter for RuleRewriter {
    fn name(&self) -> &str {
        "rules"
    }

    fn rewrite(&self, stem: &str) -> Result<String, CapabilityError> {
        for rule in &self.rules {
            if !rule.pattern.is_match(stem) {
                continue;
            }
            let rewritten = rule
                .pattern
                .replace(stem, rule.replacement.as_str())
                .into_owned();
            if rewritten.trim().is_empty() || !rewritten.trim().ends_with('?') {
                return Err(CapabilityError::RewriteFailed(format!(
                    "rule produced unusable stem from {stem:?}"
                )));
            }
            return Ok(rewritten);
        }
        // No rule claims this stem; rewriting is a no-op.
        Ok(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter_with(rules: &str) -> RuleRewriter {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rewrite_rules.json");
        std::fs::write(&path, rules).unwrap();
        RuleRewriter::load(&path).unwrap()
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = RuleRewriter::load(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, CapabilityError::ModelUnavailable(_)));
    }

    #[test]
    fn bad_regex_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rewrite_rules.json");
        std::fs::write(
            &path,
            r#"[{"pattern": "([unclosed", "replacement": "x?"}]"#,
        )
        .unwrap();
        let err = RuleRewriter::load(&path).unwrap_err();
        assert!(matches!(err, CapabilityError::MalformedModel { .. }));
    }

    #[test]
    fn first_matching_rule_wins() {
        let rewriter = rewriter_with(
            r#"[
                {"pattern": "^What is (.+)\\?$", "replacement": "Which of the following best describes $1?"},
                {"pattern": "^What", "replacement": "Never applied?"}
            ]"#,
        );
        assert_eq!(
            rewriter.rewrite("What is Photosynthesis?").unwrap(),
            "Which of the following best describes Photosynthesis?"
        );
    }

    #[test]
    fn unmatched_stem_passes_through() {
        let rewriter = rewriter_with(
            r#"[{"pattern": "^What is (.+)\\?$", "replacement": "Define $1?"}]"#,
        );
        let stem = "How does Friction relate to motion?";
        assert_eq!(rewriter.rewrite(stem).unwrap(), stem);
    }

    #[test]
    fn unusable_output_is_a_rewrite_failure() {
        let rewriter = rewriter_with(r#"[{"pattern": "^What is .+$", "replacement": ""}]"#);
        let err = rewriter.rewrite("What is Photosynthesis?").unwrap_err();
        assert!(matches!(err, CapabilityError::RewriteFailed(_)));
        assert!(!err.is_permanent());
    }
}
