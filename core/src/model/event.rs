// mixline/src/model/event.rs

use crate::model::order::{OrderStatus, TransactionId};
use crate::model::request::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of stage change an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
  Advance,
  Revert,
  Complete,
  Cancel,
}

/// One committed stage change. Built once by `AuditRecorder` and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
  pub event_id: Uuid,
  pub order_id: TransactionId,
  pub action: AuditAction,
  pub from_status: OrderStatus,
  pub to_status: OrderStatus,
  pub employee_name: String,
  pub role: Role,
  pub timestamp: DateTime<Utc>,
  pub remarks: Option<String>,
}
