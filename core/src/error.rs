// mixline/src/error.rs
use crate::model::{OrderStatus, Role, TransactionId};
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Faults in how a pipeline was assembled, as opposed to failures of the work it does.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for required step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Run finished without step '{step_name}' leaving its result in the context")]
  IncompleteRun { step_name: String },
}

/// Everything `WorkflowEngine` can reject a transition with.
///
/// `IllegalTransition`, `Forbidden` and `MissingReason` are decided locally,
/// before any collaborator is contacted. `Conflict` and `Unavailable` come
/// back from collaborators and are never retried by the engine.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("No transition from {from} to {to}")]
  IllegalTransition { from: OrderStatus, to: OrderStatus },

  #[error("Role {role} may not move an order from {from} to {to}")]
  Forbidden {
    role: Role,
    from: OrderStatus,
    to: OrderStatus,
  },

  #[error("Employee code '{code}' is not recognised")]
  InvalidEmployeeCode { code: String },

  #[error("A reason is required to move an order from {from} to {to}")]
  MissingReason { from: OrderStatus, to: OrderStatus },

  #[error("Order {order_id} changed underneath this request (expected {expected}, found {actual})")]
  Conflict {
    order_id: TransactionId,
    expected: OrderStatus,
    actual: OrderStatus,
  },

  #[error("Order {order_id} not found")]
  NotFound { order_id: TransactionId },

  #[error("Collaborator unavailable: {source}")]
  Unavailable {
    #[source]
    source: AnyhowError,
  },

  #[error("Pipeline misconfigured: {0}")]
  Pipeline(#[from] PipelineError),
}

impl WorkflowError {
  /// True for the errors raised before any collaborator call.
  pub fn is_local(&self) -> bool {
    matches!(
      self,
      WorkflowError::IllegalTransition { .. } | WorkflowError::Forbidden { .. } | WorkflowError::MissingReason { .. }
    )
  }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Order {order_id} not found")]
  NotFound { order_id: TransactionId },

  #[error("Stale commit for order {order_id}: expected {expected}, stored {actual}")]
  Conflict {
    order_id: TransactionId,
    expected: OrderStatus,
    actual: OrderStatus,
  },

  #[error("Order store unavailable: {0}")]
  Unavailable(#[source] AnyhowError),
}

#[derive(Debug, Error)]
pub enum DirectoryError {
  #[error("Unknown employee code '{code}'")]
  UnknownCode { code: String },

  #[error("Employee directory unavailable: {0}")]
  Unavailable(#[source] AnyhowError),
}

#[derive(Debug, Error)]
#[error("Audit store rejected event: {source}")]
pub struct AuditError {
  #[source]
  pub source: AnyhowError,
}

impl AuditError {
  pub fn new(source: impl Into<AnyhowError>) -> Self {
    Self { source: source.into() }
  }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {message}")]
  Invalid { var: String, message: String },
}

impl From<RepositoryError> for WorkflowError {
  fn from(err: RepositoryError) -> Self {
    match err {
      RepositoryError::NotFound { order_id } => WorkflowError::NotFound { order_id },
      RepositoryError::Conflict {
        order_id,
        expected,
        actual,
      } => WorkflowError::Conflict {
        order_id,
        expected,
        actual,
      },
      RepositoryError::Unavailable(source) => WorkflowError::Unavailable { source },
    }
  }
}

impl From<DirectoryError> for WorkflowError {
  fn from(err: DirectoryError) -> Self {
    match err {
      DirectoryError::UnknownCode { code } => WorkflowError::InvalidEmployeeCode { code },
      DirectoryError::Unavailable(source) => WorkflowError::Unavailable { source },
    }
  }
}

pub type Result<T, E = WorkflowError> = std::result::Result<T, E>;
