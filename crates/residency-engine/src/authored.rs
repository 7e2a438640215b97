//! Built-in Italian tax-residency questionnaire
//!
//! Authored data, built and validated once on first use and shared for the
//! life of the process.

use crate::tree::DecisionTree;
use crate::types::{ResultStatus, Step, StepOption};
use once_cell::sync::Lazy;
use std::sync::Arc;

static BUILTIN: Lazy<Arc<DecisionTree>> = Lazy::new(|| {
    // Authored at compile time; a validation failure here is a defect in this file.
    let tree = DecisionTree::new("start", builtin_steps())
        .unwrap_or_else(|e| panic!("built-in residency tree is malformed: {e}"));
    tracing::debug!(steps = tree.len(), "built-in residency tree loaded");
    Arc::new(tree)
});

/// Shared handle to the built-in tree
#[must_use]
pub fn builtin_tree() -> Arc<DecisionTree> {
    Arc::clone(&BUILTIN)
}

/// Steps of the built-in questionnaire, in authoring order
#[must_use]
pub fn builtin_steps() -> Vec<Step> {
    use ResultStatus::{ContinueAssess, LikelyNonResident, LikelyResident};

    vec![
        Step::new(
            "start",
            "Are you registered in the Italian registry of resident population (Anagrafe)?",
        )
        .with_description("Registration with the Anagrafe of an Italian municipality is one of the three criteria for tax residency.")
        .with_option(StepOption::next("yes", "Yes", "when-registered"))
        .with_option(StepOption::next("no", "No", "spent-183-days"))
        .with_option(
            StepOption::next("dont-know", "I don't know", "info-registry-office")
                .with_description("We can help you find out."),
        ),
        Step::new(
            "when-registered",
            "For how much of the tax year were you registered in the Anagrafe?",
        )
        .with_option(StepOption::terminal(
            "registered-over-183",
            "More than 183 days (184 in a leap year)",
            LikelyResident,
            1,
        ))
        .with_option(StepOption::next(
            "registered-under-183",
            "183 days or fewer",
            "spent-183-days",
        )),
        Step::new(
            "info-registry-office",
            "You can check your registration with the registry office (Ufficio Anagrafe) of your municipality.",
        )
        .with_description("Many municipalities also let you request a residence certificate online.")
        .with_option(StepOption::next(
            "checked-registered",
            "I checked and I am registered",
            "when-registered",
        ))
        .with_option(StepOption::next(
            "still-not-sure",
            "I am still not sure",
            "spent-183-days",
        )),
        Step::new(
            "spent-183-days",
            "Did you spend more than 183 days in Italy during the tax year?",
        )
        .with_description("Count every day you were physically present, including partial days.")
        .with_option(StepOption::next("yes-over-183", "Yes", "civil-union-1"))
        .with_option(StepOption::next("no-under-183", "No", "civil-union-2")),
        Step::new(
            "civil-union-1",
            "Do your spouse, civil partner or dependent children live in Italy?",
        )
        .with_option(StepOption::terminal("yes-family-1", "Yes", LikelyResident, 2))
        .with_option(StepOption::next("no-no-family-1", "No", "vital-interests-1")),
        Step::new(
            "civil-union-2",
            "Do your spouse, civil partner or dependent children live in Italy?",
        )
        .with_option(StepOption::next("yes-family-2", "Yes", "vital-interests-2"))
        .with_option(StepOption::terminal(
            "no-no-family-2",
            "No",
            LikelyNonResident,
            5,
        )),
        Step::new(
            "vital-interests-1",
            "Is the centre of your economic interests (work, business, main assets) in Italy?",
        )
        .with_option(StepOption::terminal("yes-interests-1", "Yes", LikelyResident, 2))
        .with_option(StepOption::terminal("no-interests-1", "No", ContinueAssess, 3)),
        Step::new(
            "vital-interests-2",
            "Is the centre of your economic interests (work, business, main assets) in Italy?",
        )
        .with_option(StepOption::terminal("yes-interests-2", "Yes", LikelyResident, 3))
        .with_option(StepOption::terminal("no-interests-2", "No", ContinueAssess, 4)),
    ]
}
