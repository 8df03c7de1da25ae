// mixline/demos/front_counter/src/counter.rs

//! A scripted front-counter operator: asks the engine for a stage change and,
//! when told inputs are missing, answers from its script and asks again.

use crate::errors::{AppError, Result};
use mixline::memory::{InMemoryAuditLog, InMemoryOrderRepository};
use mixline::{
  MissingInput, Order, OrderStatus, Role, SuppliedInputs, TransactionId, TransitionOutcome, TransitionRequest,
  WorkflowEngine,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// What the operator types when prompted.
#[derive(Debug, Clone, Default)]
pub struct Answers {
  pub employee_code: Option<String>,
  pub colour_code: Option<String>,
  pub reason: Option<String>,
}

impl Answers {
  fn fill(&self, missing: &[MissingInput], inputs: &mut SuppliedInputs) -> Result<()> {
    for input in missing {
      let (slot, answer) = match input {
        MissingInput::EmployeeCode => (&mut inputs.employee_code, &self.employee_code),
        MissingInput::ColourCode => (&mut inputs.colour_code, &self.colour_code),
        MissingInput::Reason => (&mut inputs.reason, &self.reason),
      };
      let answer = answer.clone().ok_or_else(|| AppError::Unanswered(input.to_string()))?;
      *slot = Some(answer);
    }
    Ok(())
  }
}

pub struct Counter {
  pub engine: WorkflowEngine,
  pub repo: Arc<InMemoryOrderRepository>,
  pub audit: Arc<InMemoryAuditLog>,
  pub role: Role,
}

impl Counter {
  /// Requests `target` for the stored order, answering at most one prompt.
  #[instrument(skip(self, answers), fields(role = %self.role))]
  pub async fn move_order(&self, id: &TransactionId, target: OrderStatus, answers: &Answers) -> Result<Order> {
    let mut inputs = SuppliedInputs {
      reason: answers.reason.clone(),
      ..Default::default()
    };

    for round in 1..=2 {
      match self.engine.transition_by_id(id, target, self.role, inputs.clone()).await? {
        TransitionOutcome::Committed { order, audit_warning } => {
          if let Some(warning) = audit_warning {
            warn!(message = %warning.message, "Stage changed but the audit entry was lost.");
          }
          info!(status = %order.current_status, employee = %order.assigned_employee, round, "Stage changed.");
          return Ok(order);
        }
        TransitionOutcome::NeedsInput { missing } => {
          let prompt: Vec<String> = missing.iter().map(ToString::to_string).collect();
          info!(prompt = %prompt.join(", "), round, "Operator prompted.");
          answers.fill(&missing, &mut inputs)?;
        }
      }
    }
    Err(AppError::Unanswered(format!("{} still incomplete after answering", target)))
  }

  /// Replays a request against an order copy the caller already holds.
  pub async fn move_copy(&self, copy: Order, target: OrderStatus, answers: &Answers) -> Result<TransitionOutcome> {
    let inputs = SuppliedInputs {
      employee_code: answers.employee_code.clone(),
      colour_code: answers.colour_code.clone(),
      reason: answers.reason.clone(),
    };
    let request = TransitionRequest::new(copy, target, self.role).with_inputs(inputs);
    Ok(self.engine.request_transition(request).await?)
  }
}
