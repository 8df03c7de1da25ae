// mixline/src/core/control.rs

//! Signals a step handler returns, and the overall outcome of a run.

/// Returned by each handler to tell the runner what to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Keep going: remaining handlers of this step, then the next step.
  Continue,
  /// Park the run here. Nothing after this handler executes; the caller
  /// inspects the context to learn why and may start a fresh run later.
  Suspend,
}

/// How a pipeline run ended when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
  Completed,
  /// A handler returned `StepControl::Suspend`; carries the step it happened in.
  Suspended { step_index: usize },
}

impl RunOutcome {
  pub fn is_completed(&self) -> bool {
    matches!(self, RunOutcome::Completed)
  }
}
