//! Extraction lifecycle state
//!
//! Every triggering record carries one `ExtractState`. Transitions move
//! forward only; a terminal run (`done` or `error`) may re-enter
//! `processing` on a subsequent manual trigger, which overwrites the
//! previous results.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle state of an extraction on its triggering record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractState {
    /// No extraction has been requested
    NoExtract,
    /// Extraction requested but not started
    Pending,
    /// Extraction in flight
    Processing,
    /// Extraction finished (possibly with per-attachment failures)
    Done,
    /// Extraction aborted with an error
    Error,
}

/// Error raised on an illegal state transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid extraction state transition: {from} -> {to}")]
pub struct StateError {
    /// State the record was in
    pub from: ExtractState,
    /// State the transition attempted to reach
    pub to: ExtractState,
}

impl ExtractState {
    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// Forward transitions only, with one carve-out: a terminal state can be
    /// re-entered into `Processing` by a new manual trigger (retry after
    /// `error`, re-run after `done`).
    pub fn can_transition(self, next: ExtractState) -> bool {
        use ExtractState::*;
        matches!(
            (self, next),
            (NoExtract, Pending)
                | (NoExtract, Processing)
                | (Pending, Processing)
                | (Processing, Done)
                | (Processing, Error)
                | (Error, Processing)
                | (Done, Processing)
        )
    }

    /// Validate and perform a transition.
    pub fn transition(self, next: ExtractState) -> Result<ExtractState, StateError> {
        if self.can_transition(next) {
            Ok(next)
        } else {
            Err(StateError { from: self, to: next })
        }
    }

    /// Whether this state marks the end of a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, ExtractState::Done | ExtractState::Error)
    }

    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractState::NoExtract => "no_extract",
            ExtractState::Pending => "pending",
            ExtractState::Processing => "processing",
            ExtractState::Done => "done",
            ExtractState::Error => "error",
        }
    }
}

impl Default for ExtractState {
    fn default() -> Self {
        ExtractState::NoExtract
    }
}

impl fmt::Display for ExtractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ExtractState::*;

    #[test]
    fn test_forward_transitions() {
        assert!(NoExtract.can_transition(Processing));
        assert!(NoExtract.can_transition(Pending));
        assert!(Pending.can_transition(Processing));
        assert!(Processing.can_transition(Done));
        assert!(Processing.can_transition(Error));
    }

    #[test]
    fn test_retry_from_terminal() {
        assert!(Error.can_transition(Processing));
        assert!(Done.can_transition(Processing));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!Processing.can_transition(NoExtract));
        assert!(!Processing.can_transition(Pending));
        assert!(!Done.can_transition(NoExtract));
        assert!(!Error.can_transition(Done));
        assert!(!Done.can_transition(Error));
    }

    #[test]
    fn test_transition_error_carries_states() {
        let err = Done.transition(Error).unwrap_err();
        assert_eq!(err.from, Done);
        assert_eq!(err.to, Error);
    }

    #[test]
    fn test_terminal_states() {
        assert!(Done.is_terminal());
        assert!(Error.is_terminal());
        assert!(!Processing.is_terminal());
        assert!(!NoExtract.is_terminal());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&NoExtract).unwrap(), "\"no_extract\"");
        assert_eq!(NoExtract.to_string(), "no_extract");
    }
}
