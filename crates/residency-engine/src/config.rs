//! Engine configuration
//!
//! ```toml
//! strict = true
//!
//! [tree]
//! source = "file"
//! path = "trees/residency.yaml"
//! ```

use crate::engine::AssessmentEngine;
use crate::error::ConfigError;
use crate::loader::TreeLoader;
use crate::validation::ValidationContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the decision tree comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TreeSource {
    /// Built-in questionnaire
    #[default]
    Builtin,
    /// Authored JSON or YAML file
    File {
        /// Path to the tree document
        path: PathBuf,
    },
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tree to serve
    pub tree: TreeSource,
    /// Reject unreachable steps instead of warning
    pub strict: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tree: TreeSource::Builtin,
            strict: true,
        }
    }
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With tree loaded from `path`
    #[inline]
    #[must_use]
    pub fn with_tree_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tree = TreeSource::File { path: path.into() };
        self
    }

    /// With strictness
    #[inline]
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Parse TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read TOML configuration from disk
    ///
    /// A relative tree path is resolved against the config file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        if let TreeSource::File { path: tree_path } = &mut config.tree {
            if tree_path.is_relative() {
                if let Some(dir) = path.parent() {
                    *tree_path = dir.join(&*tree_path);
                }
            }
        }
        Ok(config)
    }

    /// Validation context implied by this configuration
    #[must_use]
    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext {
            require_reachable: self.strict,
        }
    }

    /// Build an engine over the configured tree
    pub fn build_engine(&self) -> Result<AssessmentEngine, ConfigError> {
        match &self.tree {
            TreeSource::Builtin => Ok(AssessmentEngine::builtin()),
            TreeSource::File { path } => {
                let tree = TreeLoader::with_context(self.validation_context()).load_file(path)?;
                Ok(AssessmentEngine::new(tree))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_builtin_and_strict() {
        let config = EngineConfig::new();
        assert_eq!(config.tree, TreeSource::Builtin);
        assert!(config.strict);
        assert!(config.validation_context().require_reachable);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn parses_file_source() {
        let config = EngineConfig::from_toml_str(
            r#"
            strict = false

            [tree]
            source = "file"
            path = "custom.json"
            "#,
        )
        .unwrap();
        assert_eq!(config, EngineConfig::new().with_tree_file("custom.json").with_strict(false));
    }

    #[test]
    fn rejects_unknown_source() {
        let err = EngineConfig::from_toml_str("[tree]\nsource = \"database\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn relative_tree_path_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("residency.toml");
        std::fs::write(&config_path, "[tree]\nsource = \"file\"\npath = \"tree.json\"\n").unwrap();

        let config = EngineConfig::from_file(&config_path).unwrap();
        assert_eq!(config.tree, TreeSource::File { path: dir.path().join("tree.json") });
    }

    #[test]
    fn builtin_engine_from_default_config() {
        let engine = EngineConfig::default().build_engine().unwrap();
        assert_eq!(engine.start().as_str(), "start");
    }

    #[test]
    fn missing_tree_file_is_load_error() {
        let err = EngineConfig::new()
            .with_tree_file("/nowhere/tree.json")
            .build_engine()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
