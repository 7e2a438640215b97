//! Core data model for the assessment tree
//!
//! `StepOption` is a tagged union over its outcome: it either continues to
//! another step or terminates the assessment with a status and strength.
//! The authored wire shape is flat (`nextStep` XOR `resultStatus` +
//! `resultStrength`); conversion happens through serde `try_from`/`into`.

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a step in the tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    /// Id of the canonical entry step
    pub const START: &'static str = "start";

    /// Create from any string
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the canonical entry step
    #[inline]
    #[must_use]
    pub fn start() -> Self {
        Self::new(Self::START)
    }

    /// Borrow as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StepId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&StepId> for StepId {
    fn from(value: &StepId) -> Self {
        value.clone()
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Terminal assessment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultStatus {
    /// Facts point to Italian tax residency
    LikelyResident,
    /// Facts point away from Italian tax residency
    LikelyNonResident,
    /// Facts are mixed; a fuller assessment is needed
    ContinueAssess,
}

impl ResultStatus {
    /// All categories in declaration order
    pub const ALL: [ResultStatus; 3] = [
        ResultStatus::LikelyResident,
        ResultStatus::LikelyNonResident,
        ResultStatus::ContinueAssess,
    ];

    /// Wire name of the status
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResultStatus::LikelyResident => "likely-resident",
            ResultStatus::LikelyNonResident => "likely-non-resident",
            ResultStatus::ContinueAssess => "continue-assess",
        }
    }

    /// Parse a wire name; `None` for anything unrecognized
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What selecting an option leads to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionOutcome {
    /// Move on to another step
    Continue {
        /// Step to transition to
        next_step: StepId,
    },
    /// End the assessment
    Terminal {
        /// Result category
        status: ResultStatus,
        /// Confidence score, passed through unmodified
        strength: i32,
    },
}

impl OptionOutcome {
    /// Whether this outcome ends the assessment
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }

    /// Next step id, if non-terminal
    #[must_use]
    pub fn next_step(&self) -> Option<&StepId> {
        match self {
            Self::Continue { next_step } => Some(next_step),
            Self::Terminal { .. } => None,
        }
    }
}

/// A possible answer on a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOption", into = "RawOption")]
pub struct StepOption {
    /// Unique within the parent step
    pub id: String,
    /// Display label
    pub label: String,
    /// Optional display description
    pub description: Option<String>,
    /// Continue or terminate
    pub outcome: OptionOutcome,
}

impl StepOption {
    /// Option that continues to `next_step`
    pub fn next(id: impl Into<String>, label: impl Into<String>, next_step: impl Into<StepId>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            outcome: OptionOutcome::Continue {
                next_step: next_step.into(),
            },
        }
    }

    /// Option that terminates with `status` and `strength`
    pub fn terminal(
        id: impl Into<String>,
        label: impl Into<String>,
        status: ResultStatus,
        strength: i32,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            outcome: OptionOutcome::Terminal { status, strength },
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether selecting this option ends the assessment
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }
}

/// Flat authored shape of an option
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOption {
    id: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result_strength: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result_status: Option<String>,
}

impl TryFrom<RawOption> for StepOption {
    type Error = TreeError;

    fn try_from(raw: RawOption) -> Result<Self, Self::Error> {
        let outcome = match (raw.next_step, raw.result_status, raw.result_strength) {
            (Some(next), None, None) => OptionOutcome::Continue {
                next_step: StepId::from(next),
            },
            (None, Some(status), Some(strength)) => {
                let status = ResultStatus::parse(&status).ok_or_else(|| TreeError::UnknownStatus {
                    option: raw.id.clone(),
                    status,
                })?;
                OptionOutcome::Terminal { status, strength }
            }
            (Some(_), _, _) => return Err(TreeError::AmbiguousOutcome(raw.id)),
            (None, _, _) => return Err(TreeError::MissingOutcome(raw.id)),
        };

        Ok(Self {
            id: raw.id,
            label: raw.label,
            description: raw.description,
            outcome,
        })
    }
}

impl From<StepOption> for RawOption {
    fn from(option: StepOption) -> Self {
        let (next_step, result_status, result_strength) = match option.outcome {
            OptionOutcome::Continue { next_step } => (Some(next_step.0), None, None),
            OptionOutcome::Terminal { status, strength } => {
                (None, Some(status.as_str().to_string()), Some(strength))
            }
        };
        Self {
            id: option.id,
            label: option.label,
            description: option.description,
            next_step,
            result_strength,
            result_status,
        }
    }
}

/// A node in the decision tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Unique step id
    pub id: StepId,
    /// Display question
    pub question: String,
    /// Optional supplementary text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered answers; order matters only for display
    pub options: Vec<StepOption>,
}

impl Step {
    /// Create step with no options
    pub fn new(id: impl Into<StepId>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            description: None,
            options: Vec::new(),
        }
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With an appended option
    #[must_use]
    pub fn with_option(mut self, option: StepOption) -> Self {
        self.options.push(option);
        self
    }

    /// Look up an option by id
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&StepOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Ids of steps this step can transition to, in option order
    pub fn successors(&self) -> impl Iterator<Item = &StepId> + '_ {
        self.options.iter().filter_map(|o| o.outcome.next_step())
    }

    /// Whether any option on this step ends the assessment
    #[must_use]
    pub fn has_terminal_option(&self) -> bool {
        self.options.iter().any(StepOption::is_terminal)
    }
}

/// Terminal output of an assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Result category
    pub status: ResultStatus,
    /// Confidence score from the terminal option
    pub strength: i32,
    /// Advice derived from `status` alone
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_wire_names() {
        assert_eq!(ResultStatus::LikelyResident.as_str(), "likely-resident");
        assert_eq!(ResultStatus::parse("likely-non-resident"), Some(ResultStatus::LikelyNonResident));
        assert_eq!(ResultStatus::parse("continue-assess"), Some(ResultStatus::ContinueAssess));
        assert_eq!(ResultStatus::parse("resident"), None);
        assert_eq!(
            serde_json::to_value(ResultStatus::LikelyNonResident).unwrap(),
            json!("likely-non-resident")
        );
    }

    #[test]
    fn continue_option_from_flat_shape() {
        let option: StepOption = serde_json::from_value(json!({
            "id": "yes",
            "label": "Yes",
            "nextStep": "when-registered"
        }))
        .unwrap();

        assert_eq!(option.outcome.next_step(), Some(&StepId::from("when-registered")));
        assert!(!option.is_terminal());
    }

    #[test]
    fn terminal_option_from_flat_shape() {
        let option: StepOption = serde_json::from_value(json!({
            "id": "registered-over-183",
            "label": "More than 183 days",
            "resultStrength": 1,
            "resultStatus": "likely-resident"
        }))
        .unwrap();

        assert_eq!(
            option.outcome,
            OptionOutcome::Terminal {
                status: ResultStatus::LikelyResident,
                strength: 1
            }
        );
    }

    #[test]
    fn option_with_both_outcomes_is_rejected() {
        let result: Result<StepOption, _> = serde_json::from_value(json!({
            "id": "both",
            "label": "Both",
            "nextStep": "start",
            "resultStrength": 1,
            "resultStatus": "likely-resident"
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("both nextStep and a result"), "{err}");
    }

    #[test]
    fn option_with_neither_outcome_is_rejected() {
        let neither: Result<StepOption, _> = serde_json::from_value(json!({"id": "none", "label": "None"}));
        assert!(neither.is_err());

        let half: Result<StepOption, _> = serde_json::from_value(json!({
            "id": "half",
            "label": "Half",
            "resultStatus": "likely-resident"
        }));
        assert!(half.unwrap_err().to_string().contains("neither nextStep"));
    }

    #[test]
    fn option_with_unknown_status_is_rejected() {
        let result: Result<StepOption, _> = serde_json::from_value(json!({
            "id": "odd",
            "label": "Odd",
            "resultStrength": 2,
            "resultStatus": "resident-maybe"
        }));
        assert!(result.unwrap_err().to_string().contains("resident-maybe"));
    }

    #[test]
    fn option_serializes_to_flat_shape() {
        let option = StepOption::terminal("no-no-family-2", "No", ResultStatus::LikelyNonResident, 5);
        assert_eq!(
            serde_json::to_value(&option).unwrap(),
            json!({
                "id": "no-no-family-2",
                "label": "No",
                "resultStrength": 5,
                "resultStatus": "likely-non-resident"
            })
        );
    }

    #[test]
    fn step_lookup_and_successors() {
        let step = Step::new("start", "Registered?")
            .with_option(StepOption::next("yes", "Yes", "a"))
            .with_option(StepOption::terminal("no", "No", ResultStatus::ContinueAssess, 3))
            .with_option(StepOption::next("other", "Other", "b"));

        assert_eq!(step.option("no").map(|o| o.is_terminal()), Some(true));
        assert!(step.option("missing").is_none());
        let successors: Vec<_> = step.successors().map(StepId::as_str).collect();
        assert_eq!(successors, vec!["a", "b"]);
        assert!(step.has_terminal_option());
    }
}
