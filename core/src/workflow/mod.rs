// mixline/src/workflow/mod.rs

//! Stage-change rules and the engine that applies them.

pub mod audit;
pub mod context;
pub mod engine;
pub mod eta;
pub mod gate;
pub mod rules;

pub use audit::{AuditEntry, AuditRecorder, AuditWarning};
pub use context::TransitionCtx;
pub use engine::{TransitionOutcome, WorkflowEngine};
pub use eta::{queue_depth, EtaEstimator, QueueEstimate};
pub use gate::{MissingInput, Requirements, VerificationGate};
pub use rules::{allowed_targets, edge_kind, is_revert, EdgeKind};
