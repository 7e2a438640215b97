//! Structural invariants of the built-in tree and engine properties.

use proptest::prelude::*;
use residency_engine::prelude::*;
use residency_engine::{builtin_tree, generate_recommendations, OptionOutcome};
use std::collections::{HashSet, VecDeque};

/// Every step reachable from start has options, and every option either
/// points at an existing step or carries a terminal status and strength.
#[test]
fn every_reachable_option_has_exactly_one_outcome() {
    let tree = builtin_tree();
    let mut queue = VecDeque::from([tree.start().clone()]);
    let mut seen = HashSet::new();

    while let Some(id) = queue.pop_front() {
        if !seen.insert(id.clone()) {
            continue;
        }
        let step = tree.get(id.as_str()).unwrap_or_else(|| panic!("dangling step {id}"));
        assert!(!step.options.is_empty(), "step {id} has no options");

        for option in &step.options {
            match &option.outcome {
                OptionOutcome::Continue { next_step } => {
                    assert!(tree.contains(next_step.as_str()), "{id}/{} -> {next_step}", option.id);
                    queue.push_back(next_step.clone());
                }
                OptionOutcome::Terminal { .. } => {}
            }
        }
    }

    assert_eq!(seen.len(), tree.len(), "every authored step is reachable");
}

#[test]
fn option_ids_unique_within_each_step() {
    for step in builtin_tree().steps() {
        let ids: HashSet<_> = step.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), step.options.len(), "duplicate option on {}", step.id);
    }
}

#[test]
fn every_terminal_path_replays_to_its_result() {
    let engine = AssessmentEngine::builtin();
    let paths = engine.tree().terminal_paths();
    assert!(!paths.is_empty());

    for path in paths {
        let (last, rest) = path.hops.split_last().unwrap();
        for hop in rest {
            assert!(engine.advance(hop.step.as_str(), &hop.option).unwrap().next_step().is_some());
        }
        let result = engine
            .advance(last.step.as_str(), &last.option)
            .unwrap()
            .result()
            .cloned()
            .unwrap();
        assert_eq!((result.status, result.strength), (path.status, path.strength));
    }
}

#[test]
fn every_status_is_reachable() {
    let statuses: HashSet<_> = builtin_tree().terminal_paths().iter().map(|p| p.status).collect();
    assert_eq!(statuses.len(), ResultStatus::ALL.len());
}

proptest! {
    /// Choosing options at random always ends in a result within as many
    /// answers as there are steps: no authored cycle traps the user.
    #[test]
    fn prop_random_walk_terminates(choices in proptest::collection::vec(any::<prop::sample::Index>(), 8)) {
        let engine = AssessmentEngine::builtin();
        let mut current = engine.start().clone();
        let mut outcome = None;

        for choice in &choices {
            let step = engine.get_step(current.as_str()).unwrap();
            let option = choice.get(step.options.as_slice());
            match engine.advance(current.as_str(), &option.id).unwrap() {
                Advance::Next { step } => current = step,
                Advance::Complete { result } => {
                    outcome = Some(result);
                    break;
                }
            }
        }

        prop_assert!(outcome.is_some(), "walk stuck at {}", current);
        prop_assert_eq!(outcome.unwrap().recommendations.len(), 3);
    }

    #[test]
    fn prop_advance_is_pure(step_idx in 0usize..8, option_idx in 0usize..3) {
        let engine = AssessmentEngine::builtin();
        let step = engine.tree().steps().nth(step_idx).unwrap();
        let option_id = step.options.get(option_idx).map_or("missing", |o| o.id.as_str());

        let first = engine.advance(step.id.as_str(), option_id);
        let second = engine.advance(step.id.as_str(), option_id);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_unknown_status_has_no_recommendations(status in "[a-z-]{0,24}") {
        prop_assume!(ResultStatus::parse(&status).is_none());
        prop_assert!(generate_recommendations(&status).is_empty());
    }
}
