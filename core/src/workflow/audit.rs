// mixline/src/workflow/audit.rs

use crate::model::{AuditAction, Order, OrderStatus, Role, StatusEvent};
use crate::ports::AuditStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// An audit entry that could not be stored. The stage change it describes
/// is already committed and stays committed.
#[derive(Debug, Clone)]
pub struct AuditWarning {
  pub event: StatusEvent,
  pub message: String,
}

/// Everything needed to describe one committed change.
#[derive(Debug, Clone)]
pub struct AuditEntry<'a> {
  pub before: &'a Order,
  pub to: OrderStatus,
  pub action: AuditAction,
  pub employee_name: &'a str,
  pub role: Role,
  pub remarks: Option<&'a str>,
  pub at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AuditRecorder {
  store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
  pub fn new(store: Arc<dyn AuditStore>) -> Self {
    Self { store }
  }

  pub fn build(entry: AuditEntry<'_>) -> StatusEvent {
    StatusEvent {
      event_id: Uuid::new_v4(),
      order_id: entry.before.transaction_id.clone(),
      action: entry.action,
      from_status: entry.before.current_status,
      to_status: entry.to,
      employee_name: entry.employee_name.to_string(),
      role: entry.role,
      timestamp: entry.at,
      remarks: entry.remarks.map(str::to_string),
    }
  }

  /// Forwards `event` to the store. Best effort: a failure is logged and
  /// handed back as a warning.
  #[instrument(
    skip_all,
    fields(order_id = %event.order_id, from = %event.from_status, to = %event.to_status)
  )]
  pub async fn record(&self, event: StatusEvent) -> Option<AuditWarning> {
    match self.store.append(&event).await {
      Ok(()) => None,
      Err(e) => {
        warn!(error = %e, "Audit entry not stored; status change stands.");
        Some(AuditWarning {
          message: e.to_string(),
          event,
        })
      }
    }
  }
}

impl std::fmt::Debug for AuditRecorder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AuditRecorder").finish_non_exhaustive()
  }
}
