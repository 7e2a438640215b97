//! Residency Engine
//!
//! Decision-tree engine for Italian tax-residency self-assessment:
//! - Holds an authored, validated step graph
//! - Walks it one answer at a time
//! - Produces a terminal result with status, strength and recommendations
//!
//! # Architecture
//!
//! ```text
//! authored / JSON / YAML → TreeValidator → DecisionTree (immutable, shared)
//!                                              ↓
//!                         AssessmentEngine::advance(step, option)
//!                                              ↓
//!                         Advance::Next { step } | Advance::Complete { result }
//! ```
//!
//! # Example
//!
//! ```rust
//! use residency_engine::{Advance, AssessmentEngine, ResultStatus};
//!
//! let engine = AssessmentEngine::builtin();
//! let next = engine.advance("start", "yes").unwrap();
//! assert_eq!(next.next_step().unwrap().as_str(), "when-registered");
//!
//! match engine.advance("when-registered", "registered-over-183").unwrap() {
//!     Advance::Complete { result } => assert_eq!(result.status, ResultStatus::LikelyResident),
//!     Advance::Next { .. } => unreachable!(),
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod authored;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod scoring;
pub mod session;
pub mod tree;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use authored::builtin_tree;
pub use config::{EngineConfig, TreeSource};
pub use engine::{Advance, AssessmentEngine, Continuation};
pub use error::{
    ConfigError, EngineError, LoadError, ResidencyError, ResidencyResult, SessionError, TreeError,
};
pub use loader::{TreeDocument, TreeFormat, TreeLoader};
pub use scoring::{create_assessment_result, generate_recommendations};
pub use session::AssessmentSession;
pub use tree::{DecisionTree, PathHop, TerminalPath, TreeStats};
pub use types::{AssessmentResult, OptionOutcome, ResultStatus, Step, StepId, StepOption};
pub use validation::{TreeValidator, ValidationContext};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the engine
    pub use crate::engine::{Advance, AssessmentEngine, Continuation};
    pub use crate::error::{EngineError, SessionError};
    pub use crate::session::AssessmentSession;
    pub use crate::types::{AssessmentResult, ResultStatus, Step, StepId, StepOption};
}
