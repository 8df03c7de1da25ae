// mixline/src/workflow/engine.rs

//! `WorkflowEngine`: runs every stage-change request through a fixed step
//! pipeline and reports either a committed order or the inputs still needed.
//!
//! Steps, in order:
//!
//! 1. `check_edge`: the edge must exist (`IllegalTransition`).
//! 2. `authorize`: privileged edges need `Role::Admin` (`Forbidden`).
//! 3. `require_reason`: reverts and cancellations need a reason (`MissingReason`).
//! 4. `gate_inputs`: suspends with the missing inputs, if any.
//! 5. `resolve_employee`: turns a supplied code into a verified name.
//! 6. `commit`: `before` prepares the field changes, `on` writes them.
//! 7. `record_audit`: best-effort audit entry.
//!
//! Steps 1–4 never touch a collaborator. The engine keeps nothing between
//! calls; a suspended request is simply re-sent with the inputs filled in.

use crate::config::WorkflowConfig;
use crate::core::{ContextData, RunOutcome, StepControl, StepDef};
use crate::error::{PipelineError, Result, WorkflowError};
use crate::model::order::is_concrete_colour_code;
use crate::model::{Category, Order, OrderStatus, OrderType, Role, SuppliedInputs, TransactionId, TransitionRequest};
use crate::pipeline::Pipeline;
use crate::ports::{AuditStore, CommitChanges, EmployeeDirectory, OrderRepository};
use crate::workflow::audit::{AuditEntry, AuditRecorder, AuditWarning};
use crate::workflow::context::TransitionCtx;
use crate::workflow::eta::{queue_depth, EtaEstimator, QueueEstimate};
use crate::workflow::gate::{MissingInput, Requirements, VerificationGate};
use crate::workflow::rules::{self, EdgeKind};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const CHECK_EDGE: &str = "check_edge";
pub const AUTHORIZE: &str = "authorize";
pub const REQUIRE_REASON: &str = "require_reason";
pub const GATE_INPUTS: &str = "gate_inputs";
pub const RESOLVE_EMPLOYEE: &str = "resolve_employee";
pub const COMMIT: &str = "commit";
pub const RECORD_AUDIT: &str = "record_audit";

/// Result of one `request_transition` call that did not fail.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
  /// The change is stored. `audit_warning` is set when the audit entry was lost.
  Committed {
    order: Order,
    audit_warning: Option<AuditWarning>,
  },
  /// Nothing was changed; re-send the request with these inputs supplied.
  NeedsInput { missing: Vec<MissingInput> },
}

impl TransitionOutcome {
  pub fn committed(&self) -> Option<&Order> {
    match self {
      TransitionOutcome::Committed { order, .. } => Some(order),
      TransitionOutcome::NeedsInput { .. } => None,
    }
  }

  pub fn missing(&self) -> &[MissingInput] {
    match self {
      TransitionOutcome::NeedsInput { missing } => missing,
      TransitionOutcome::Committed { .. } => &[],
    }
  }
}

pub struct WorkflowEngine {
  repository: Arc<dyn OrderRepository>,
  gate: VerificationGate,
  eta: EtaEstimator,
  config: WorkflowConfig,
  pipeline: Pipeline<TransitionCtx, WorkflowError>,
}

impl WorkflowEngine {
  pub fn new(
    repository: Arc<dyn OrderRepository>,
    directory: Arc<dyn EmployeeDirectory>,
    audit_store: Arc<dyn AuditStore>,
    config: WorkflowConfig,
  ) -> Result<Self> {
    let gate = VerificationGate::new(config.pending_sentinel.clone());
    let recorder = AuditRecorder::new(audit_store);
    let pipeline = build_pipeline(Arc::clone(&repository), directory, recorder, gate.clone())?;
    debug!(steps = ?pipeline.step_names(), "Transition pipeline assembled.");

    Ok(Self {
      repository,
      gate,
      eta: EtaEstimator::new(config.eta.clone()),
      config,
      pipeline,
    })
  }

  /// Validates, gates and (when everything is supplied) commits one stage change.
  #[instrument(
    name = "WorkflowEngine::request_transition",
    skip_all,
    fields(
      order_id = %request.order.transaction_id,
      from = %request.from_status(),
      to = %request.target,
      role = %request.role,
    )
  )]
  pub async fn request_transition(&self, request: TransitionRequest) -> Result<TransitionOutcome> {
    let ctx = ContextData::new(TransitionCtx::new(request));

    match self.pipeline.run(ctx.clone()).await? {
      RunOutcome::Suspended { .. } => {
        let missing = std::mem::take(&mut ctx.write().missing);
        info!(?missing, "Transition waiting for input.");
        Ok(TransitionOutcome::NeedsInput { missing })
      }
      RunOutcome::Completed => {
        let (committed, audit_warning, requirements) = {
          let mut guard = ctx.write();
          (guard.committed.take(), guard.audit_warning.take(), guard.requirements)
        };
        let order = committed.ok_or_else(|| PipelineError::IncompleteRun {
          step_name: COMMIT.to_string(),
        })?;
        info!(
          employee = %order.assigned_employee,
          ?requirements,
          audit_stored = audit_warning.is_none(),
          "Transition committed."
        );
        Ok(TransitionOutcome::Committed { order, audit_warning })
      }
    }
  }

  /// Loads the current copy of the order, then behaves like `request_transition`.
  pub async fn transition_by_id(
    &self,
    id: &TransactionId,
    target: OrderStatus,
    role: Role,
    inputs: SuppliedInputs,
  ) -> Result<TransitionOutcome> {
    let order = self.repository.get(id).await?;
    self
      .request_transition(TransitionRequest::new(order, target, role).with_inputs(inputs))
      .await
  }

  pub fn allowed_targets(&self, from: OrderStatus, role: Role) -> Vec<OrderStatus> {
    rules::allowed_targets(from, role)
  }

  /// What the gate would ask for, without validating the edge.
  pub fn requirements(&self, order: &Order, target: OrderStatus) -> Requirements {
    self.gate.evaluate(order, target)
  }

  pub fn config(&self) -> &WorkflowConfig {
    &self.config
  }

  /// A fresh `Waiting` order carrying the configured placeholders.
  pub fn new_order(&self, id: TransactionId, category: Category, order_type: OrderType) -> Order {
    Order::with_placeholders(
      id,
      category,
      order_type,
      Utc::now(),
      &self.config.pending_sentinel,
      &self.config.unassigned_label,
    )
  }

  pub fn eta(&self) -> &EtaEstimator {
    &self.eta
  }

  /// Wait estimate for an order of `category` joining the current queue.
  pub async fn estimate_new_order(&self, category: Category) -> Result<QueueEstimate> {
    let active = self.repository.list_active().await?;
    let depth = queue_depth(&active);
    Ok(self.eta.estimate_ready_at(category, depth, Utc::now()))
  }
}

impl std::fmt::Debug for WorkflowEngine {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WorkflowEngine")
      .field("gate", &self.gate)
      .field("eta", &self.eta)
      .field("pipeline", &self.pipeline)
      .finish_non_exhaustive()
  }
}

fn build_pipeline(
  repository: Arc<dyn OrderRepository>,
  directory: Arc<dyn EmployeeDirectory>,
  recorder: AuditRecorder,
  gate: VerificationGate,
) -> std::result::Result<Pipeline<TransitionCtx, WorkflowError>, PipelineError> {
  let mut p: Pipeline<TransitionCtx, WorkflowError> = Pipeline::new(vec![
    StepDef::required(CHECK_EDGE),
    StepDef::required(AUTHORIZE),
    StepDef::required(REQUIRE_REASON)
      .skip_when(|ctx: &TransitionCtx| !ctx.edge.is_some_and(|e| e.requires_reason())),
    StepDef::required(GATE_INPUTS),
    StepDef::required(RESOLVE_EMPLOYEE).skip_when(|ctx: &TransitionCtx| ctx.request.inputs.employee_code().is_none()),
    StepDef::required(COMMIT),
    StepDef::required(RECORD_AUDIT),
  ]);

  p.on(CHECK_EDGE, check_edge)?;
  p.on(AUTHORIZE, authorize)?;
  p.on(REQUIRE_REASON, require_reason)?;

  let sentinel = gate.pending_sentinel().to_string();
  p.on(GATE_INPUTS, move |ctx| gate_inputs(ctx, gate.clone()))?;
  p.on(RESOLVE_EMPLOYEE, move |ctx| resolve_employee(ctx, Arc::clone(&directory)))?;
  p.before(COMMIT, move |ctx| prepare_changes(ctx, sentinel.clone()))?;
  p.on(COMMIT, move |ctx| commit(ctx, Arc::clone(&repository)))?;
  p.on(RECORD_AUDIT, move |ctx| record_audit(ctx, recorder.clone()))?;
  Ok(p)
}

async fn check_edge(ctx: ContextData<TransitionCtx>) -> Result<StepControl> {
  let mut guard = ctx.write();
  let from = guard.request.order.current_status;
  let to = guard.request.target;
  let kind = rules::edge_kind(from, to).ok_or(WorkflowError::IllegalTransition { from, to })?;
  guard.edge = Some(kind);
  Ok(StepControl::Continue)
}

async fn authorize(ctx: ContextData<TransitionCtx>) -> Result<StepControl> {
  let guard = ctx.read();
  let role = guard.request.role;
  if guard.edge.is_some_and(|e| e.requires_admin()) && role != Role::Admin {
    return Err(WorkflowError::Forbidden {
      role,
      from: guard.request.order.current_status,
      to: guard.request.target,
    });
  }
  Ok(StepControl::Continue)
}

async fn require_reason(ctx: ContextData<TransitionCtx>) -> Result<StepControl> {
  let guard = ctx.read();
  if guard.request.inputs.reason().is_none() {
    return Err(WorkflowError::MissingReason {
      from: guard.request.order.current_status,
      to: guard.request.target,
    });
  }
  Ok(StepControl::Continue)
}

async fn gate_inputs(ctx: ContextData<TransitionCtx>, gate: VerificationGate) -> Result<StepControl> {
  let mut guard = ctx.write();
  let requirements = gate.evaluate(&guard.request.order, guard.request.target);
  let missing = gate.missing(&requirements, &guard.request.inputs);
  guard.requirements = requirements;
  if missing.is_empty() {
    return Ok(StepControl::Continue);
  }
  debug!(?requirements, ?missing, "Inputs outstanding.");
  guard.missing = missing;
  Ok(StepControl::Suspend)
}

async fn resolve_employee(ctx: ContextData<TransitionCtx>, directory: Arc<dyn EmployeeDirectory>) -> Result<StepControl> {
  let code = ctx.read().request.inputs.employee_code().map(str::to_string);
  let Some(code) = code else {
    return Ok(StepControl::Continue);
  };
  let employee = directory.resolve(&code).await?;
  debug!(employee = %employee.name, "Employee verified.");
  ctx.write().resolved_employee = Some(employee.name);
  Ok(StepControl::Continue)
}

async fn prepare_changes(ctx: ContextData<TransitionCtx>, sentinel: String) -> Result<StepControl> {
  let mut guard = ctx.write();
  let changes = changes_for(&guard, &sentinel)?;
  guard.changes = Some(changes);
  Ok(StepControl::Continue)
}

async fn commit(ctx: ContextData<TransitionCtx>, repository: Arc<dyn OrderRepository>) -> Result<StepControl> {
  let (id, expected, changes) = {
    let guard = ctx.read();
    let changes = guard.changes.clone().ok_or_else(|| PipelineError::IncompleteRun {
      step_name: COMMIT.to_string(),
    })?;
    (
      guard.request.order.transaction_id.clone(),
      guard.request.order.current_status,
      changes,
    )
  };
  let stored = repository.commit(&id, expected, changes).await?;
  ctx.write().committed = Some(stored);
  Ok(StepControl::Continue)
}

async fn record_audit(ctx: ContextData<TransitionCtx>, recorder: AuditRecorder) -> Result<StepControl> {
  let event = {
    let guard = ctx.read();
    let committed = guard.committed.as_ref().ok_or_else(|| PipelineError::IncompleteRun {
      step_name: COMMIT.to_string(),
    })?;
    let edge = guard.edge.ok_or_else(|| PipelineError::IncompleteRun {
      step_name: CHECK_EDGE.to_string(),
    })?;
    AuditRecorder::build(AuditEntry {
      before: &guard.request.order,
      to: guard.request.target,
      action: edge.audit_action(),
      employee_name: &committed.assigned_employee,
      role: guard.request.role,
      remarks: guard.request.inputs.reason(),
      at: committed.status_started_at,
    })
  };
  let warning = recorder.record(event).await;
  ctx.write().audit_warning = warning;
  Ok(StepControl::Continue)
}

/// Field values the commit writes: verified name (else the current one),
/// supplied concrete colour code (else the current one), a fresh
/// `started_at`, and the reason appended to the note for reverts and cancellations.
fn changes_for(ctx: &TransitionCtx, sentinel: &str) -> Result<CommitChanges> {
  let order = &ctx.request.order;
  let inputs = &ctx.request.inputs;
  let edge = ctx.edge.ok_or_else(|| PipelineError::IncompleteRun {
    step_name: CHECK_EDGE.to_string(),
  })?;

  let employee = ctx
    .resolved_employee
    .clone()
    .unwrap_or_else(|| order.assigned_employee.clone());

  let colour_code = match inputs.colour_code() {
    Some(code) if is_concrete_colour_code(code, sentinel) => Some(code.to_string()),
    _ => order.colour_code.clone(),
  };

  let note = match inputs.reason() {
    Some(reason) if edge.requires_reason() => Some(append_note(
      order.note.as_deref(),
      &reason_line(edge, order.current_status, ctx.request.target, reason),
    )),
    _ => order.note.clone(),
  };

  Ok(CommitChanges {
    status: ctx.request.target,
    employee,
    colour_code,
    started_at: Utc::now(),
    note,
  })
}

fn reason_line(edge: EdgeKind, from: OrderStatus, to: OrderStatus, reason: &str) -> String {
  match edge {
    EdgeKind::Cancel => format!("Cancelled from {}: {}", from, reason),
    _ => format!("Reverted from {} to {}: {}", from, to, reason),
  }
}

fn append_note(existing: Option<&str>, line: &str) -> String {
  match existing.map(str::trim_end).filter(|n| !n.is_empty()) {
    Some(note) => format!("{}\n{}", note, line),
    None => line.to_string(),
  }
}
