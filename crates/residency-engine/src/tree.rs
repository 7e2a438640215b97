//! Immutable decision tree
//!
//! Can only be constructed through `TreeValidator::build`, so every tree
//! in hand has resolvable references, a start step, and an exit from
//! every step.

use crate::error::TreeError;
use crate::types::{OptionOutcome, ResultStatus, Step, StepId};
use crate::validation::TreeValidator;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Validated, read-only step graph
#[derive(Debug, Clone)]
pub struct DecisionTree {
    start: StepId,
    steps: IndexMap<StepId, Step>,
}

/// Trees are equal only when their steps match in authoring order
impl PartialEq for DecisionTree {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.steps.len() == other.steps.len()
            && self.steps.values().eq(other.steps.values())
    }
}

impl Eq for DecisionTree {}

/// Summary counts for a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Number of authored steps
    pub steps: usize,
    /// Options across all steps
    pub options: usize,
    /// Options that end the assessment
    pub terminal_options: usize,
    /// Most questions answered on a path to a result, ignoring back-edges
    pub max_depth: usize,
}

/// One answer on a path through the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathHop {
    /// Step the answer was given on
    pub step: StepId,
    /// Option chosen
    pub option: String,
}

/// An acyclic path from start to a terminal option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalPath {
    /// Answers from start, the last one terminal
    pub hops: Vec<PathHop>,
    /// Status of the terminal option
    pub status: ResultStatus,
    /// Strength of the terminal option
    pub strength: i32,
}

impl DecisionTree {
    /// Validate `steps` with default rules and build the tree
    pub fn new(start: impl Into<StepId>, steps: Vec<Step>) -> Result<Self, TreeError> {
        TreeValidator::new().build(start, steps)
    }

    pub(crate) fn from_validated(start: StepId, steps: IndexMap<StepId, Step>) -> Self {
        Self { start, steps }
    }

    /// Id of the entry step
    #[inline]
    #[must_use]
    pub fn start(&self) -> &StepId {
        &self.start
    }

    /// Look up a step by id
    #[inline]
    #[must_use]
    pub fn get(&self, step_id: &str) -> Option<&Step> {
        self.steps.get(step_id)
    }

    /// Whether a step id resolves
    #[inline]
    #[must_use]
    pub fn contains(&self, step_id: &str) -> bool {
        self.steps.contains_key(step_id)
    }

    /// Steps in authoring order
    pub fn steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.steps.values()
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a validated tree; present for API symmetry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every acyclic path from start that ends on a terminal option
    ///
    /// The count grows exponentially with branching depth; use `stats`
    /// for summary figures.
    #[must_use]
    pub fn terminal_paths(&self) -> Vec<TerminalPath> {
        let mut paths = Vec::new();
        let mut hops = Vec::new();
        let mut on_path = HashSet::new();
        self.collect_paths(&self.start, &mut hops, &mut on_path, &mut paths);
        paths
    }

    fn collect_paths<'a>(
        &'a self,
        step_id: &'a StepId,
        hops: &mut Vec<PathHop>,
        on_path: &mut HashSet<&'a str>,
        paths: &mut Vec<TerminalPath>,
    ) {
        let Some(step) = self.get(step_id.as_str()) else {
            return;
        };
        on_path.insert(step_id.as_str());

        for option in &step.options {
            hops.push(PathHop {
                step: step_id.clone(),
                option: option.id.clone(),
            });
            match &option.outcome {
                OptionOutcome::Terminal { status, strength } => paths.push(TerminalPath {
                    hops: hops.clone(),
                    status: *status,
                    strength: *strength,
                }),
                OptionOutcome::Continue { next_step } => {
                    if !on_path.contains(next_step.as_str()) {
                        self.collect_paths(next_step, hops, on_path, paths);
                    }
                }
            }
            hops.pop();
        }

        on_path.remove(step_id.as_str());
    }

    /// Longest run of answers from `step_id` to a terminal option
    ///
    /// Memoized per step; edges into a step still on the DFS path are
    /// skipped. `None` when every option of the step is such an edge.
    fn depth_from<'a>(
        &'a self,
        step_id: &'a StepId,
        depths: &mut HashMap<&'a str, Option<usize>>,
        on_path: &mut HashSet<&'a str>,
    ) -> Option<usize> {
        if let Some(depth) = depths.get(step_id.as_str()) {
            return *depth;
        }
        let step = self.get(step_id.as_str())?;
        on_path.insert(step_id.as_str());

        let mut best = None;
        for option in &step.options {
            let below = match &option.outcome {
                OptionOutcome::Terminal { .. } => Some(0),
                OptionOutcome::Continue { next_step } if on_path.contains(next_step.as_str()) => None,
                OptionOutcome::Continue { next_step } => self.depth_from(next_step, depths, on_path),
            };
            if let Some(below) = below {
                best = best.max(Some(below + 1));
            }
        }

        on_path.remove(step_id.as_str());
        depths.insert(step_id.as_str(), best);
        best
    }

    /// Summary counts
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let options = self.steps.values().map(|s| s.options.len()).sum();
        let terminal_options = self
            .steps
            .values()
            .flat_map(|s| &s.options)
            .filter(|o| o.is_terminal())
            .count();
        let mut depths = HashMap::with_capacity(self.steps.len());
        let mut on_path = HashSet::new();
        let max_depth = self
            .depth_from(&self.start, &mut depths, &mut on_path)
            .unwrap_or(0);

        TreeStats {
            steps: self.steps.len(),
            options,
            terminal_options,
            max_depth,
        }
    }
}
