//! Testing utilities for the residency workspace
//!
//! Shared fixtures and walk helpers.

#![allow(missing_docs)]

use residency_engine::{
    Advance, AssessmentEngine, AssessmentResult, DecisionTree, EngineError, ResultStatus, Step,
    StepId, StepOption,
};

/// Two-question tree with a back-edge that has an exit
pub fn create_loop_tree() -> DecisionTree {
    DecisionTree::new(
        "start",
        vec![
            Step::new("start", "First question")
                .with_option(StepOption::next("forward", "Forward", "second"))
                .with_option(StepOption::terminal(
                    "stop",
                    "Stop",
                    ResultStatus::ContinueAssess,
                    3,
                )),
            Step::new("second", "Second question")
                .with_option(StepOption::next("again", "Again", "start"))
                .with_option(StepOption::terminal(
                    "resident",
                    "Resident",
                    ResultStatus::LikelyResident,
                    2,
                )),
        ],
    )
    .unwrap()
}

pub fn create_loop_engine() -> AssessmentEngine {
    AssessmentEngine::new(create_loop_tree())
}

/// Same tree in the flat JSON authoring shape
pub const LOOP_TREE_JSON: &str = r#"{
  "start": "start",
  "steps": [
    {
      "id": "start",
      "question": "First question",
      "options": [
        { "id": "forward", "label": "Forward", "nextStep": "second" },
        { "id": "stop", "label": "Stop", "resultStatus": "continue-assess", "resultStrength": 3 }
      ]
    },
    {
      "id": "second",
      "question": "Second question",
      "options": [
        { "id": "again", "label": "Again", "nextStep": "start" },
        { "id": "resident", "label": "Resident", "resultStatus": "likely-resident", "resultStrength": 2 }
      ]
    }
  ]
}"#;

/// Where a walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEnd {
    At(StepId),
    Done(AssessmentResult),
}

/// Advance from start through `options` in order
///
/// Stops early if a result is reached before the options run out.
pub fn walk(engine: &AssessmentEngine, options: &[&str]) -> Result<WalkEnd, EngineError> {
    let mut current = engine.start().clone();
    for option in options {
        match engine.advance(current.as_str(), option)? {
            Advance::Next { step } => current = step,
            Advance::Complete { result } => return Ok(WalkEnd::Done(result)),
        }
    }
    Ok(WalkEnd::At(current))
}
