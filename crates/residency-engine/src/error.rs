//! Error types for the residency engine
//!
//! Provides error handling for:
//! - Traversal (unknown step / unknown option)
//! - Tree construction and validation
//! - Session driving
//! - Loading authored trees and configuration

use crate::types::StepId;
use std::path::PathBuf;

/// Errors raised by engine traversal operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Step id does not resolve in the tree
    #[error("unknown step: '{0}'")]
    UnknownStep(StepId),

    /// Option id is not among the options of the named step
    #[error("unknown option '{option}' on step '{step}'")]
    UnknownOption {
        /// Step the option was looked up on
        step: StepId,
        /// Option id that did not resolve
        option: String,
    },
}

impl EngineError {
    /// Create unknown option error
    pub fn unknown_option(step: impl Into<StepId>, option: impl Into<String>) -> Self {
        Self::UnknownOption {
            step: step.into(),
            option: option.into(),
        }
    }

    /// Whether the error is an unresolved step id
    #[inline]
    #[must_use]
    pub fn is_unknown_step(&self) -> bool {
        matches!(self, Self::UnknownStep(_))
    }

    /// Whether the error is an option id that does not belong to its step
    #[inline]
    #[must_use]
    pub fn is_unknown_option(&self) -> bool {
        matches!(self, Self::UnknownOption { .. })
    }
}

/// Authoring defects detected while building a tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Two steps share an id
    #[error("duplicate step id: '{0}'")]
    DuplicateStep(StepId),

    /// Designated start step is not in the tree
    #[error("start step '{0}' not found")]
    MissingStart(StepId),

    /// Step has no options
    #[error("step '{0}' has no options")]
    EmptyStep(StepId),

    /// Two options on the same step share an id
    #[error("duplicate option '{option}' on step '{step}'")]
    DuplicateOption {
        /// Step carrying the duplicate
        step: StepId,
        /// Repeated option id
        option: String,
    },

    /// `nextStep` names a step that does not exist
    #[error("option '{option}' on step '{step}' points to unknown step '{target}'")]
    DanglingReference {
        /// Step carrying the option
        step: StepId,
        /// Option carrying the reference
        option: String,
        /// Unresolved target
        target: StepId,
    },

    /// Step cannot be reached from the start step
    #[error("step '{0}' is unreachable from start")]
    UnreachableStep(StepId),

    /// Steps from which no terminal option can ever be reached
    #[error("steps {0:?} form a cycle with no terminal exit")]
    InescapableCycle(Vec<StepId>),

    /// Option declares both a next step and a result
    #[error("option '{0}' declares both nextStep and a result")]
    AmbiguousOutcome(String),

    /// Option declares neither a next step nor a complete result
    #[error("option '{0}' declares neither nextStep nor resultStatus with resultStrength")]
    MissingOutcome(String),

    /// Result status string is not one of the known categories
    #[error("option '{option}' has unknown result status '{status}'")]
    UnknownStatus {
        /// Option carrying the status
        option: String,
        /// Unrecognized status text
        status: String,
    },
}

/// Errors while driving an assessment session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Underlying engine lookup failed
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Proceed requested with no option selected
    #[error("no option selected on step '{0}'")]
    NoSelection(StepId),

    /// Session already produced a result
    #[error("assessment already completed")]
    Completed,
}

/// Errors while loading an authored tree
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// JSON syntax or shape error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML syntax or shape error
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension maps to no known format
    #[error("unsupported tree format: '{0}'")]
    UnsupportedFormat(String),

    /// Document parsed but the tree is malformed
    #[error("invalid tree: {0}")]
    Tree(#[from] TreeError),
}

impl LoadError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during config read
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configured tree failed to load
    #[error("tree load failed: {0}")]
    Load(#[from] LoadError),
}

/// Combined residency error
#[derive(Debug, thiserror::Error)]
pub enum ResidencyError {
    /// Traversal failure
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Malformed tree
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Session misuse
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Tree document could not be loaded
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Configuration could not be read
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for residency operations
pub type ResidencyResult<T> = Result<T, ResidencyError>;
