//! Assessment engine
//!
//! Pure traversal over a validated tree. The engine holds no per-session
//! state: every call takes the full traversal context and returns a value,
//! so equal inputs always give equal outputs.

use crate::authored::builtin_tree;
use crate::error::EngineError;
use crate::scoring::{create_assessment_result, generate_recommendations};
use crate::tree::DecisionTree;
use crate::types::{AssessmentResult, OptionOutcome, ResultStatus, Step, StepId};
use serde::Serialize;
use std::sync::Arc;

/// Outcome of advancing past a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advance {
    /// Traversal continues at this step
    Next {
        /// Step to display next
        step: StepId,
    },
    /// Traversal ended with a result
    Complete {
        /// Terminal result
        result: AssessmentResult,
    },
}

impl Advance {
    /// Next step id, if traversal continues
    #[must_use]
    pub fn next_step(&self) -> Option<&StepId> {
        match self {
            Self::Next { step } => Some(step),
            Self::Complete { .. } => None,
        }
    }

    /// Result, if traversal ended
    #[must_use]
    pub fn result(&self) -> Option<&AssessmentResult> {
        match self {
            Self::Next { .. } => None,
            Self::Complete { result } => Some(result),
        }
    }
}

/// Whether the current selection on a step allows continuing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// Nothing (valid) selected yet
    Blocked,
    /// Selected option ends the assessment
    Terminal,
    /// Selected option leads to another step
    Continue,
}

impl Continuation {
    /// Whether the selected option is terminal
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }

    /// Whether a "continue" affordance should be offered
    #[inline]
    #[must_use]
    pub fn can_continue(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// Stateless traversal and scoring over a decision tree
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    tree: Arc<DecisionTree>,
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AssessmentEngine {
    /// Engine over the built-in questionnaire
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_shared(builtin_tree())
    }

    /// Engine over an owned tree
    #[must_use]
    pub fn new(tree: DecisionTree) -> Self {
        Self::from_shared(Arc::new(tree))
    }

    /// Engine over a shared tree
    #[inline]
    #[must_use]
    pub fn from_shared(tree: Arc<DecisionTree>) -> Self {
        Self { tree }
    }

    /// Underlying tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Id of the entry step
    #[inline]
    #[must_use]
    pub fn start(&self) -> &StepId {
        self.tree.start()
    }

    /// Look up a step for display
    pub fn get_step(&self, step_id: &str) -> Result<&Step, EngineError> {
        self.tree
            .get(step_id)
            .ok_or_else(|| EngineError::UnknownStep(StepId::from(step_id)))
    }

    /// Classify the current selection on `step`
    ///
    /// No selection, or a selection that is not one of the step's options,
    /// is `Blocked`; it is never reported as terminal.
    #[must_use]
    pub fn is_terminal(&self, step: &Step, selected_option: Option<&str>) -> Continuation {
        match selected_option.and_then(|id| step.option(id)) {
            None => Continuation::Blocked,
            Some(option) if option.is_terminal() => Continuation::Terminal,
            Some(_) => Continuation::Continue,
        }
    }

    /// Move past `step_id` with `option_id` selected
    pub fn advance(&self, step_id: &str, option_id: &str) -> Result<Advance, EngineError> {
        let step = self.get_step(step_id)?;
        let Some(option) = step.option(option_id) else {
            tracing::warn!(step = step_id, option = option_id, "option not found on step");
            return Err(EngineError::unknown_option(step_id, option_id));
        };

        match &option.outcome {
            OptionOutcome::Continue { next_step } => {
                tracing::debug!(from = step_id, option = option_id, to = %next_step, "advance");
                Ok(Advance::Next {
                    step: next_step.clone(),
                })
            }
            OptionOutcome::Terminal { status, strength } => {
                tracing::info!(step = step_id, option = option_id, status = %status, strength, "assessment complete");
                Ok(Advance::Complete {
                    result: self.create_assessment_result(*status, *strength),
                })
            }
        }
    }

    /// Pair status and strength with recommendations
    #[must_use]
    pub fn create_assessment_result(&self, status: ResultStatus, strength: i32) -> AssessmentResult {
        create_assessment_result(status, strength)
    }

    /// Recommendations for a status wire name; empty when unrecognized
    #[must_use]
    pub fn generate_recommendations(&self, status: &str) -> Vec<String> {
        generate_recommendations(status)
    }
}
