//! Per-session traversal state
//!
//! Holds the current step, the single selected option on it, the visited
//! history used for back-navigation, and the result once reached. Sessions
//! live in memory only and are independent of each other.

use crate::engine::{Advance, AssessmentEngine, Continuation};
use crate::error::{EngineError, SessionError};
use crate::types::{AssessmentResult, Step, StepId};

/// One user's walk through the tree
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    engine: AssessmentEngine,
    current: StepId,
    selected: Option<String>,
    history: Vec<StepId>,
    result: Option<AssessmentResult>,
}

impl AssessmentSession {
    /// Start a session at the tree's entry step
    #[must_use]
    pub fn new(engine: AssessmentEngine) -> Self {
        let current = engine.start().clone();
        Self {
            engine,
            current,
            selected: None,
            history: Vec::new(),
            result: None,
        }
    }

    /// Id of the step being displayed
    #[inline]
    #[must_use]
    pub fn current_step_id(&self) -> &StepId {
        &self.current
    }

    /// Step being displayed
    pub fn current_step(&self) -> Result<&Step, EngineError> {
        self.engine.get_step(self.current.as_str())
    }

    /// Select an option on the current step, replacing any earlier selection
    pub fn select(&mut self, option_id: &str) -> Result<(), SessionError> {
        if self.result.is_some() {
            return Err(SessionError::Completed);
        }
        let step = self.current_step()?;
        if step.option(option_id).is_none() {
            return Err(EngineError::unknown_option(&self.current, option_id).into());
        }
        self.selected = Some(option_id.to_string());
        Ok(())
    }

    /// Currently selected option id
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Classification of the current selection
    #[must_use]
    pub fn continuation(&self) -> Continuation {
        match self.current_step() {
            Ok(step) => self.engine.is_terminal(step, self.selected()),
            Err(_) => Continuation::Blocked,
        }
    }

    /// Whether a "continue" affordance should be offered
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.continuation().can_continue()
    }

    /// Advance past the current step with the selected option
    pub fn proceed(&mut self) -> Result<Advance, SessionError> {
        if self.result.is_some() {
            return Err(SessionError::Completed);
        }
        let Some(option_id) = self.selected.as_deref() else {
            return Err(SessionError::NoSelection(self.current.clone()));
        };

        let advance = self.engine.advance(self.current.as_str(), option_id)?;
        match &advance {
            Advance::Next { step } => {
                let previous = std::mem::replace(&mut self.current, step.clone());
                self.history.push(previous);
                self.selected = None;
            }
            Advance::Complete { result } => {
                self.result = Some(result.clone());
            }
        }
        Ok(advance)
    }

    /// Step back to the previously visited step
    ///
    /// From a completed session this clears the result and returns to the
    /// step that produced it. Returns `false` when already at the start
    /// with nothing to undo.
    pub fn back(&mut self) -> bool {
        if self.result.take().is_some() {
            self.selected = None;
            return true;
        }
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                self.selected = None;
                true
            }
            None => false,
        }
    }

    /// Steps visited before the current one, oldest first
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[StepId] {
        &self.history
    }

    /// Result, once reached
    #[inline]
    #[must_use]
    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    /// Whether a result has been reached
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Discard all progress and return to the entry step
    pub fn restart(&mut self) {
        self.current = self.engine.start().clone();
        self.selected = None;
        self.history.clear();
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultStatus;

    fn session() -> AssessmentSession {
        AssessmentSession::new(AssessmentEngine::builtin())
    }

    #[test]
    fn starts_at_start_with_nothing_selected() {
        let s = session();
        assert_eq!(s.current_step_id().as_str(), "start");
        assert!(s.selected().is_none());
        assert!(!s.can_continue());
        assert!(s.history().is_empty());
    }

    #[test]
    fn reselecting_replaces_selection() {
        let mut s = session();
        s.select("yes").unwrap();
        s.select("no").unwrap();
        assert_eq!(s.selected(), Some("no"));
        s.proceed().unwrap();
        assert_eq!(s.current_step_id().as_str(), "spent-183-days");
    }

    #[test]
    fn select_rejects_foreign_option() {
        let mut s = session();
        let err = s.select("no-under-183").unwrap_err();
        assert!(matches!(err, SessionError::Engine(EngineError::UnknownOption { .. })));
        assert!(s.selected().is_none());
    }

    #[test]
    fn proceed_requires_selection() {
        let mut s = session();
        assert_eq!(s.proceed().unwrap_err(), SessionError::NoSelection(StepId::start()));
    }

    #[test]
    fn walk_to_result_then_locked() {
        let mut s = session();
        s.select("yes").unwrap();
        s.proceed().unwrap();
        s.select("registered-over-183").unwrap();
        assert_eq!(s.continuation(), Continuation::Terminal);
        assert!(!s.can_continue());

        let advance = s.proceed().unwrap();
        assert!(advance.result().is_some());
        assert!(s.is_complete());
        assert_eq!(s.result().map(|r| r.status), Some(ResultStatus::LikelyResident));
        assert_eq!(s.select("yes").unwrap_err(), SessionError::Completed);
        assert_eq!(s.proceed().unwrap_err(), SessionError::Completed);
    }

    #[test]
    fn back_replays_history() {
        let mut s = session();
        s.select("no").unwrap();
        s.proceed().unwrap();
        s.select("no-under-183").unwrap();
        s.proceed().unwrap();
        assert_eq!(s.history().len(), 2);

        assert!(s.back());
        assert_eq!(s.current_step_id().as_str(), "spent-183-days");
        assert!(s.selected().is_none());
        assert!(s.back());
        assert_eq!(s.current_step_id().as_str(), "start");
        assert!(!s.back());
    }

    #[test]
    fn back_from_result_reopens_last_step() {
        let mut s = session();
        s.select("yes").unwrap();
        s.proceed().unwrap();
        s.select("registered-over-183").unwrap();
        s.proceed().unwrap();

        assert!(s.back());
        assert!(!s.is_complete());
        assert_eq!(s.current_step_id().as_str(), "when-registered");
        s.select("registered-under-183").unwrap();
        assert!(s.can_continue());
    }

    #[test]
    fn restart_clears_everything() {
        let mut s = session();
        s.select("dont-know").unwrap();
        s.proceed().unwrap();
        s.restart();
        assert_eq!(s.current_step_id().as_str(), "start");
        assert!(s.history().is_empty());
        assert!(s.result().is_none());
    }
}
