// mixline/src/lib.rs

//! Mixline: the order workflow engine of a paint-mixing counter.
//!
//! An order moves through `Waiting → Mixing → Spraying → (Re-Mixing ⇄ Spraying)
//! → Ready → Complete`, and can be `Cancelled` from any non-terminal stage.
//! Each requested move is run through a small named-step pipeline:
//!  - Edge, role and reason checks that never leave the process.
//!  - A verification gate that may ask for an employee code, a colour code
//!    or a reason before anything is written.
//!  - A conditional commit against the order store.
//!  - A best-effort audit entry.
//!
//! ```text
//!   let outcome = engine.request_transition(request).await?;
//!   if let TransitionOutcome::NeedsInput { missing } = outcome {
//!     // collect `missing`, then re-send the same request with inputs filled in
//!   }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod memory;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod workflow;

pub use crate::core::{ContextData, RunOutcome, StepControl, StepDef};
pub use crate::pipeline::{Phase, Pipeline};

pub use crate::config::{EtaConfig, WorkflowConfig};
pub use crate::error::{AuditError, ConfigError, DirectoryError, PipelineError, RepositoryError, WorkflowError};
pub use crate::model::{
  AuditAction, Category, Order, OrderStatus, OrderType, PoType, Role, StatusEvent, SuppliedInputs, TransactionId,
  TransitionRequest,
};
pub use crate::ports::{AuditStore, CommitChanges, Employee, EmployeeDirectory, OrderRepository};
pub use crate::workflow::{
  AuditRecorder, AuditWarning, EtaEstimator, MissingInput, QueueEstimate, Requirements, TransitionOutcome,
  VerificationGate, WorkflowEngine,
};
