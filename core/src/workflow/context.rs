// mixline/src/workflow/context.rs

//! Per-request data the transition pipeline reads and fills in.

use crate::model::{Order, TransitionRequest};
use crate::ports::CommitChanges;
use crate::workflow::audit::AuditWarning;
use crate::workflow::gate::{MissingInput, Requirements};
use crate::workflow::rules::EdgeKind;

#[derive(Debug, Clone)]
pub struct TransitionCtx {
  pub request: TransitionRequest,
  pub edge: Option<EdgeKind>,
  pub requirements: Requirements,
  pub missing: Vec<MissingInput>,
  /// Directory-verified display name, when a code was resolved.
  pub resolved_employee: Option<String>,
  pub changes: Option<CommitChanges>,
  pub committed: Option<Order>,
  pub audit_warning: Option<AuditWarning>,
}

impl TransitionCtx {
  pub fn new(request: TransitionRequest) -> Self {
    Self {
      request,
      edge: None,
      requirements: Requirements::default(),
      missing: Vec::new(),
      resolved_employee: None,
      changes: None,
      committed: None,
      audit_warning: None,
    }
  }
}
