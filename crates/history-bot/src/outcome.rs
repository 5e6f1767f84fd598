//! Handler results

use std::fmt;

/// What a handler did with an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The event is not for this handler; nothing was done
    NotApplicable(String),
    /// The handler ran
    Handled(T),
}

impl<T> Outcome<T> {
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Outcome::NotApplicable(reason.into())
    }

    pub fn handled(self) -> Option<T> {
        match self {
            Outcome::Handled(value) => Some(value),
            Outcome::NotApplicable(_) => None,
        }
    }
}

/// Result of one independent step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Skipped(String),
    Failed(String),
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Done => write!(f, "done"),
            StepOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            StepOutcome::Failed(message) => write!(f, "failed ({})", message),
        }
    }
}
