// mixline/src/pipeline/execution.rs

//! `Pipeline::run`: walks the steps in order and drives each phase's handlers.

use crate::core::context_data::ContextData;
use crate::core::control::{RunOutcome, StepControl};
use crate::error::PipelineError;
use crate::pipeline::definition::{Phase, Pipeline};
use tracing::{event, instrument, span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Stops at the first handler error (returned as-is) or the first
  /// `StepControl::Suspend` (reported as `RunOutcome::Suspended`). A required
  /// step without any handler is a configuration fault and yields
  /// `PipelineError::HandlerMissing` converted into `Err`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<RunOutcome, Err> {
    for (step_index, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(Level::DEBUG, "pipeline_step", step_name, step_index);

      if step_def.should_skip(&ctx_data) {
        event!(parent: &step_span, Level::DEBUG, "Step skipped by its skip condition.");
        continue;
      }

      if !self.has_any_handler(step_name) {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(PipelineError::HandlerMissing {
          step_name: step_name.to_string(),
        }));
      }

      for phase in Phase::ORDER {
        let control = self
          .run_phase(step_name, phase, &ctx_data)
          .instrument(step_span.clone())
          .await?;
        if control == StepControl::Suspend {
          event!(parent: &step_span, Level::INFO, phase = phase.as_str(), "Run suspended.");
          return Ok(RunOutcome::Suspended { step_index });
        }
      }
    }

    event!(Level::DEBUG, "Run completed.");
    Ok(RunOutcome::Completed)
  }

  async fn run_phase(&self, step_name: &str, phase: Phase, ctx_data: &ContextData<TData>) -> Result<StepControl, Err> {
    for handler in self.handlers_for(step_name, phase) {
      match handler(ctx_data.clone()).await {
        Ok(StepControl::Continue) => {}
        Ok(StepControl::Suspend) => return Ok(StepControl::Suspend),
        Err(e) => {
          event!(Level::WARN, error = %e, phase = phase.as_str(), "Handler failed.");
          return Err(e);
        }
      }
    }
    Ok(StepControl::Continue)
  }
}
