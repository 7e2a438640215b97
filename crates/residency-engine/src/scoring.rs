//! Result scoring: recommendations table and result assembly

use crate::types::{AssessmentResult, ResultStatus};

const LIKELY_RESIDENT: [&str; 3] = [
    "You are likely to be considered an Italian tax resident and taxed on your worldwide income.",
    "You should consult with a tax professional to review your filing obligations in Italy, including the declaration of foreign assets (quadro RW).",
    "Check whether a double taxation treaty between Italy and your other country of residence applies to your income.",
];

const LIKELY_NON_RESIDENT: [&str; 3] = [
    "You are likely not an Italian tax resident and are taxed in Italy only on Italian-source income.",
    "If you have moved abroad, make sure you are registered with AIRE (the registry of Italians resident abroad).",
    "Keep evidence of your residence abroad, such as a foreign tax residence certificate, in case the Italian tax authority asks for it.",
];

const CONTINUE_ASSESS: [&str; 3] = [
    "Your situation has elements pointing both ways; a more detailed assessment is needed.",
    "You should consult with a tax professional who can weigh your personal and economic ties to Italy.",
    "Gather documentation of where you live, work and keep your main assets before your consultation.",
];

/// Fixed recommendations for a status
#[must_use]
pub fn recommendations_for(status: ResultStatus) -> &'static [&'static str] {
    match status {
        ResultStatus::LikelyResident => &LIKELY_RESIDENT,
        ResultStatus::LikelyNonResident => &LIKELY_NON_RESIDENT,
        ResultStatus::ContinueAssess => &CONTINUE_ASSESS,
    }
}

/// Recommendations for a status wire name
///
/// Unrecognized statuses yield an empty list rather than an error.
#[must_use]
pub fn generate_recommendations(status: &str) -> Vec<String> {
    ResultStatus::parse(status)
        .map(|s| recommendations_for(s).iter().map(|r| (*r).to_string()).collect())
        .unwrap_or_default()
}

/// Pair a status and strength with the status's recommendations
#[must_use]
pub fn create_assessment_result(status: ResultStatus, strength: i32) -> AssessmentResult {
    AssessmentResult {
        status,
        strength,
        recommendations: generate_recommendations(status.as_str()),
    }
}

impl ResultStatus {
    /// Recommendations attached to this status
    #[must_use]
    pub fn recommendations(self) -> Vec<String> {
        generate_recommendations(self.as_str())
    }
}
