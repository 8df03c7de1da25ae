// mixline/src/core/step.rs

use super::ContextData;
use std::sync::Arc;

/// Predicate deciding, right before a step runs, that it should be skipped.
pub type SkipCondition<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync + 'static>;

/// A named slot in a pipeline.
#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  /// Optional steps may be left without handlers.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
}

impl<TData: 'static + Send + Sync> StepDef<TData> {
  pub fn required(name: &str) -> Self {
    Self {
      name: name.to_string(),
      optional: false,
      skip_if: None,
    }
  }

  pub fn optional(name: &str) -> Self {
    Self {
      optional: true,
      ..Self::required(name)
    }
  }

  pub fn skip_when(mut self, condition: impl Fn(&TData) -> bool + Send + Sync + 'static) -> Self {
    self.skip_if = Some(Arc::new(condition));
    self
  }

  pub(crate) fn should_skip(&self, ctx: &ContextData<TData>) -> bool {
    match &self.skip_if {
      Some(cond) => {
        let guard = ctx.read();
        cond(&guard)
      }
      None => false,
    }
  }
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
