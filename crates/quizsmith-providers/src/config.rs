//! Configuration loading for the model providers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizsmith configuration.
///
/// Model files are plain JSON under `models_dir`; each path can be
/// overridden individually for tests or custom deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizsmithConfig {
    /// Directory holding the model files.
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    /// Override for the part-of-speech lexicon file.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    /// Override for the embedding vocabulary file.
    #[serde(default)]
    pub vocab_path: Option<PathBuf>,
    /// Override for the stem rewrite rules file.
    #[serde(default)]
    pub rewrite_rules_path: Option<PathBuf>,
    /// Question count used when the caller does not specify one.
    #[serde(default = "default_num_questions")]
    pub default_num_questions: usize,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("./models")
}

fn default_num_questions() -> usize {
    10
}

impl Default for QuizsmithConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            lexicon_path: None,
            vocab_path: None,
            rewrite_rules_path: None,
            default_num_questions: default_num_questions(),
        }
    }
}

impl QuizsmithConfig {
    /// Effective path of the lexicon model file.
    pub fn lexicon(&self) -> PathBuf {
        self.lexicon_path
            .clone()
            .unwrap_or_else(|| self.models_dir.join("lexicon.json"))
    }

    /// Effective path of the embedding vocabulary file.
    pub fn vocab(&self) -> PathBuf {
        self.vocab_path
            .clone()
            .unwrap_or_else(|| self.models_dir.join("vocab.json"))
    }

    /// Effective path of the rewrite rules file.
    pub fn rewrite_rules(&self) -> PathBuf {
        self.rewrite_rules_path
            .clone()
            .unwrap_or_else(|| self.models_dir.join("rewrite_rules.json"))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizsmith.toml` in the current directory
/// 2. `~/.config/quizsmith/config.toml`
///
/// Environment variable overrides: `QUIZSMITH_MODELS_DIR`.
pub fn load_config() -> Result<QuizsmithConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizsmithConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizsmith.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizsmithConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizsmithConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("QUIZSMITH_MODELS_DIR") {
        config.models_dir = PathBuf::from(dir);
    }

    // Resolve env vars in all paths
    config.models_dir = resolve_path(&config.models_dir);
    config.lexicon_path = config.lexicon_path.as_deref().map(resolve_path);
    config.vocab_path = config.vocab_path.as_deref().map(resolve_path);
    config.rewrite_rules_path = config.rewrite_rules_path.as_deref().map(resolve_path);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizsmith"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZSMITH_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZSMITH_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZSMITH_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZSMITH_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizsmithConfig::default();
        assert_eq!(config.models_dir, PathBuf::from("./models"));
        assert_eq!(config.default_num_questions, 10);
        assert_eq!(config.lexicon(), PathBuf::from("./models/lexicon.json"));
    }

    #[test]
    fn overrides_win_over_models_dir() {
        let config = QuizsmithConfig {
            vocab_path: Some(PathBuf::from("/tmp/custom-vocab.json")),
            ..QuizsmithConfig::default()
        };
        assert_eq!(config.vocab(), PathBuf::from("/tmp/custom-vocab.json"));
        assert_eq!(config.lexicon(), PathBuf::from("./models/lexicon.json"));
    }

    #[test]
    fn parse_config_toml() {
        let toml_str = r#"
models_dir = "/opt/quizsmith/models"
rewrite_rules_path = "/etc/quizsmith/rules.json"
default_num_questions = 8
"#;
        let config: QuizsmithConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.models_dir, PathBuf::from("/opt/quizsmith/models"));
        assert_eq!(
            config.rewrite_rules(),
            PathBuf::from("/etc/quizsmith/rules.json")
        );
        assert_eq!(config.default_num_questions, 8);
        assert_eq!(
            config.vocab(),
            PathBuf::from("/opt/quizsmith/models/vocab.json")
        );
    }

    #[test]
    fn explicit_path_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizsmith.toml");
        std::fs::write(&path, "default_num_questions = 12\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_num_questions, 12);
    }

    #[test]
    fn missing_explicit_path_errors() {
        assert!(load_config_from(Some(Path::new("/nonexistent/quizsmith.toml"))).is_err());
    }
}
