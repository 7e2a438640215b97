//! Authored tree loading
//!
//! Reads trees in the flat authoring shape from JSON or YAML:
//!
//! ```json
//! {
//!   "start": "start",
//!   "steps": [
//!     { "id": "start", "question": "...", "options": [
//!       { "id": "yes", "label": "Yes", "nextStep": "when-registered" },
//!       { "id": "no", "label": "No", "resultStatus": "likely-non-resident", "resultStrength": 5 }
//!     ]}
//!   ]
//! }
//! ```
//!
//! `start` defaults to `"start"`. Loaded trees go through the same
//! validation as the built-in one.

use crate::error::LoadError;
use crate::tree::DecisionTree;
use crate::types::{Step, StepId};
use crate::validation::{TreeValidator, ValidationContext};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized form of a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Entry step id
    #[serde(default = "StepId::start")]
    pub start: StepId,
    /// Steps in authoring order
    pub steps: Vec<Step>,
}

impl From<&DecisionTree> for TreeDocument {
    fn from(tree: &DecisionTree) -> Self {
        Self {
            start: tree.start().clone(),
            steps: tree.steps().cloned().collect(),
        }
    }
}

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl TreeFormat {
    /// Infer format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Tree loader with a validation policy
#[derive(Debug, Clone, Default)]
pub struct TreeLoader {
    validator: TreeValidator,
}

impl TreeLoader {
    /// Loader with default validation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with custom validation context
    #[inline]
    #[must_use]
    pub fn with_context(context: ValidationContext) -> Self {
        Self {
            validator: TreeValidator::with_context(context),
        }
    }

    /// Parse and validate a document
    pub fn load_str(&self, content: &str, format: TreeFormat) -> Result<DecisionTree, LoadError> {
        let document: TreeDocument = match format {
            TreeFormat::Json => serde_json::from_str(content)?,
            TreeFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(self.validator.build(document.start, document.steps)?)
    }

    /// Read, parse and validate a file; format follows the extension
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<DecisionTree, LoadError> {
        let path = path.as_ref();
        let format = TreeFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io_error(path, e))?;
        let tree = self.load_str(&content, format)?;
        tracing::info!(path = %path.display(), steps = tree.len(), "decision tree loaded");
        Ok(tree)
    }
}

/// Load a tree from a string with default validation
pub fn load_str(content: &str, format: TreeFormat) -> Result<DecisionTree, LoadError> {
    TreeLoader::new().load_str(content, format)
}

/// Load a tree from a file with default validation
pub fn load_file(path: impl AsRef<Path>) -> Result<DecisionTree, LoadError> {
    TreeLoader::new().load_file(path)
}

/// Pretty JSON in the authoring shape
pub fn to_json(tree: &DecisionTree) -> Result<String, LoadError> {
    Ok(serde_json::to_string_pretty(&TreeDocument::from(tree))?)
}
