// mixline/src/pipeline/hooks.rs

//! Handler registration. Handlers may return any error convertible into the
//! pipeline's `Err`.

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::core::handler::Handler;
use crate::error::PipelineError;
use crate::pipeline::definition::{Phase, Pipeline};
use std::future::Future;
use tracing::{event, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub fn before<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<(), PipelineError>
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(step_name, Phase::Before, handler_fn)
  }

  pub fn on<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<(), PipelineError>
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(step_name, Phase::On, handler_fn)
  }

  pub fn after<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<(), PipelineError>
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.register(step_name, Phase::After, handler_fn)
  }

  /// Registers an already boxed handler.
  pub fn push_handler(
    &mut self,
    step_name: &str,
    phase: Phase,
    handler: Handler<TData, Err>,
  ) -> Result<(), PipelineError> {
    if !self.has_step(step_name) {
      return Err(PipelineError::StepNotFound {
        step_name: step_name.to_string(),
      });
    }
    self
      .handlers
      .entry((step_name.to_string(), phase))
      .or_default()
      .push(handler);
    event!(Level::TRACE, %step_name, phase = phase.as_str(), "Handler registered.");
    Ok(())
  }

  fn register<F, UserErr>(
    &mut self,
    step_name: &str,
    phase: Phase,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<(), PipelineError>
  where
    F: Future<Output = Result<StepControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    let boxed: Handler<TData, Err> = Box::new(move |ctx_data| {
      let user_fut = handler_fn(ctx_data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.push_handler(step_name, phase, boxed)
  }
}
