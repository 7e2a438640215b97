//! Tree validation
//!
//! All structural checks happen once, when a tree is built. A
//! `DecisionTree` that exists has passed them; traversal never re-checks.

use crate::error::TreeError;
use crate::tree::DecisionTree;
use crate::types::{Step, StepId};
use indexmap::IndexMap;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{Dfs, Reversed};
use std::collections::HashSet;

/// Context for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Reject steps that cannot be reached from start (otherwise warn)
    pub require_reachable: bool,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            require_reachable: true,
        }
    }
}

/// Construction-time tree validator
#[derive(Debug, Clone, Default)]
pub struct TreeValidator {
    context: ValidationContext,
}

impl TreeValidator {
    /// Create a validator with default context
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom context
    #[inline]
    #[must_use]
    pub fn with_context(context: ValidationContext) -> Self {
        Self { context }
    }

    /// Validate steps and build the tree
    ///
    /// Checks, in order:
    /// 1. Unique step ids
    /// 2. Start step exists
    /// 3. Per step: has options, option ids are unique, every `nextStep` resolves
    /// 4. Every step is reachable from start
    /// 5. Every step can reach a terminal option
    pub fn build(&self, start: impl Into<StepId>, steps: Vec<Step>) -> Result<DecisionTree, TreeError> {
        let start = start.into();

        let mut index = IndexMap::with_capacity(steps.len());
        for step in steps {
            if index.contains_key(&step.id) {
                return Err(TreeError::DuplicateStep(step.id));
            }
            index.insert(step.id.clone(), step);
        }

        if !index.contains_key(&start) {
            return Err(TreeError::MissingStart(start));
        }

        for step in index.values() {
            Self::validate_step(step, &index)?;
        }

        let graph = step_graph(&index);
        self.validate_reachability(&start, &index, &graph)?;
        Self::validate_escape(&index, &graph)?;

        tracing::debug!(steps = index.len(), start = %start, "decision tree validated");
        Ok(DecisionTree::from_validated(start, index))
    }

    fn validate_step(step: &Step, index: &IndexMap<StepId, Step>) -> Result<(), TreeError> {
        if step.options.is_empty() {
            return Err(TreeError::EmptyStep(step.id.clone()));
        }

        let mut seen = HashSet::with_capacity(step.options.len());
        for option in &step.options {
            if !seen.insert(option.id.as_str()) {
                return Err(TreeError::DuplicateOption {
                    step: step.id.clone(),
                    option: option.id.clone(),
                });
            }
            if let Some(target) = option.outcome.next_step() {
                if !index.contains_key(target) {
                    return Err(TreeError::DanglingReference {
                        step: step.id.clone(),
                        option: option.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_reachability<'a>(
        &self,
        start: &'a StepId,
        index: &'a IndexMap<StepId, Step>,
        graph: &DiGraphMap<&'a str, ()>,
    ) -> Result<(), TreeError> {
        let mut reached = HashSet::with_capacity(index.len());
        let mut dfs = Dfs::new(graph, start.as_str());
        while let Some(node) = dfs.next(graph) {
            reached.insert(node);
        }

        for id in index.keys() {
            if reached.contains(id.as_str()) {
                continue;
            }
            if self.context.require_reachable {
                return Err(TreeError::UnreachableStep(id.clone()));
            }
            tracing::warn!(step = %id, "step is unreachable from start");
        }
        Ok(())
    }

    /// Walks edges backwards from every step with a terminal option; any
    /// step not reached that way can only loop.
    fn validate_escape<'a>(
        index: &'a IndexMap<StepId, Step>,
        graph: &DiGraphMap<&'a str, ()>,
    ) -> Result<(), TreeError> {
        let reversed = Reversed(graph);
        let mut escapable = HashSet::with_capacity(index.len());
        let mut dfs = Dfs::empty(reversed);

        for step in index.values().filter(|s| s.has_terminal_option()) {
            dfs.move_to(step.id.as_str());
            while let Some(node) = dfs.next(reversed) {
                escapable.insert(node);
            }
        }

        let trapped: Vec<StepId> = index
            .keys()
            .filter(|id| !escapable.contains(id.as_str()))
            .cloned()
            .collect();

        if trapped.is_empty() {
            Ok(())
        } else {
            Err(TreeError::InescapableCycle(trapped))
        }
    }
}

fn step_graph(index: &IndexMap<StepId, Step>) -> DiGraphMap<&str, ()> {
    let mut graph = DiGraphMap::with_capacity(index.len(), index.len() * 2);
    for step in index.values() {
        graph.add_node(step.id.as_str());
        for next in step.successors() {
            graph.add_edge(step.id.as_str(), next.as_str(), ());
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResultStatus, StepOption};

    fn done(id: &str) -> StepOption {
        StepOption::terminal(id, id, ResultStatus::ContinueAssess, 3)
    }

    fn goto(id: &str, next: &str) -> StepOption {
        StepOption::next(id, id, next)
    }

    #[test]
    fn accepts_minimal_tree() {
        let tree = TreeValidator::new()
            .build("start", vec![Step::new("start", "q").with_option(done("end"))])
            .unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn rejects_duplicate_step() {
        let steps = vec![
            Step::new("start", "q").with_option(done("a")),
            Step::new("start", "again").with_option(done("b")),
        ];
        assert_eq!(
            TreeValidator::new().build("start", steps).unwrap_err(),
            TreeError::DuplicateStep(StepId::from("start"))
        );
    }

    #[test]
    fn rejects_missing_start() {
        let steps = vec![Step::new("other", "q").with_option(done("a"))];
        assert_eq!(
            TreeValidator::new().build("start", steps).unwrap_err(),
            TreeError::MissingStart(StepId::start())
        );
    }

    #[test]
    fn rejects_empty_step() {
        let steps = vec![Step::new("start", "q")];
        assert!(matches!(
            TreeValidator::new().build("start", steps),
            Err(TreeError::EmptyStep(_))
        ));
    }

    #[test]
    fn rejects_duplicate_option() {
        let steps = vec![Step::new("start", "q").with_option(done("a")).with_option(done("a"))];
        assert!(matches!(
            TreeValidator::new().build("start", steps),
            Err(TreeError::DuplicateOption { .. })
        ));
    }

    #[test]
    fn rejects_dangling_reference() {
        let steps = vec![Step::new("start", "q")
            .with_option(goto("a", "ghost"))
            .with_option(done("b"))];
        let err = TreeValidator::new().build("start", steps).unwrap_err();
        assert_eq!(
            err,
            TreeError::DanglingReference {
                step: StepId::start(),
                option: "a".to_string(),
                target: StepId::from("ghost"),
            }
        );
    }

    #[test]
    fn step_checks_run_per_step_in_authoring_order() {
        let steps = vec![
            Step::new("start", "q")
                .with_option(goto("a", "ghost"))
                .with_option(goto("b", "later")),
            Step::new("later", "q"),
        ];
        assert!(matches!(
            TreeValidator::new().build("start", steps),
            Err(TreeError::DanglingReference { .. })
        ));
    }

    #[test]
    fn unreachable_step_rejected_or_warned_by_context() {
        let steps = vec![
            Step::new("start", "q").with_option(done("a")),
            Step::new("orphan", "q").with_option(done("b")),
        ];

        let strict = TreeValidator::new().build("start", steps.clone());
        assert_eq!(strict.unwrap_err(), TreeError::UnreachableStep(StepId::from("orphan")));

        let lenient = TreeValidator::with_context(ValidationContext {
            require_reachable: false,
        })
        .build("start", steps);
        assert_eq!(lenient.unwrap().len(), 2);
    }

    #[test]
    fn rejects_cycle_without_exit() {
        let steps = vec![
            Step::new("start", "q").with_option(goto("in", "a")).with_option(done("out")),
            Step::new("a", "q").with_option(goto("next", "b")),
            Step::new("b", "q").with_option(goto("back", "a")),
        ];
        let err = TreeValidator::new().build("start", steps).unwrap_err();
        assert_eq!(
            err,
            TreeError::InescapableCycle(vec![StepId::from("a"), StepId::from("b")])
        );
    }

    #[test]
    fn accepts_cycle_with_exit() {
        let steps = vec![
            Step::new("start", "q").with_option(goto("in", "a")),
            Step::new("a", "q").with_option(goto("back", "start")).with_option(done("out")),
        ];
        assert!(TreeValidator::new().build("start", steps).is_ok());
    }
}
