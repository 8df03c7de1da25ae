// mixline/src/model/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shop transaction number. Unique and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TransactionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<&str> for TransactionId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

/// Kind of job. Drives the ETA base time and which stage changes need verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
  #[serde(rename = "New Mix")]
  NewMix,
  #[serde(rename = "Mix More")]
  MixMore,
  #[serde(rename = "Colour Code")]
  ColourCode,
  #[serde(rename = "Detailing")]
  Detailing,
}

impl Category {
  pub const ALL: [Category; 4] = [
    Category::NewMix,
    Category::MixMore,
    Category::ColourCode,
    Category::Detailing,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Category::NewMix => "New Mix",
      Category::MixMore => "Mix More",
      Category::ColourCode => "Colour Code",
      Category::Detailing => "Detailing",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Production stage of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
  Waiting,
  Mixing,
  Spraying,
  #[serde(rename = "Re-Mixing")]
  ReMixing,
  Ready,
  Complete,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 7] = [
    OrderStatus::Waiting,
    OrderStatus::Mixing,
    OrderStatus::Spraying,
    OrderStatus::ReMixing,
    OrderStatus::Ready,
    OrderStatus::Complete,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Waiting => "Waiting",
      OrderStatus::Mixing => "Mixing",
      OrderStatus::Spraying => "Spraying",
      OrderStatus::ReMixing => "Re-Mixing",
      OrderStatus::Ready => "Ready",
      OrderStatus::Complete => "Complete",
      OrderStatus::Cancelled => "Cancelled",
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, OrderStatus::Complete | OrderStatus::Cancelled)
  }

  /// Someone is physically working the order.
  pub fn is_in_progress(&self) -> bool {
    matches!(self, OrderStatus::Mixing | OrderStatus::Spraying | OrderStatus::ReMixing)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .iter()
      .copied()
      .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown order status '{}'", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoType {
  Nexa,
  Carvello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
  Paid,
  Order,
}

pub const PENDING_COLOUR_CODE: &str = "Pending";
pub const UNASSIGNED_EMPLOYEE: &str = "Unassigned";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
  pub transaction_id: TransactionId,
  pub category: Category,
  pub current_status: OrderStatus,
  pub colour_code: Option<String>,
  pub assigned_employee: String,
  pub po_type: Option<PoType>,
  pub order_type: OrderType,
  pub note: Option<String>,
  pub status_started_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Order {
  /// A freshly received order: `Waiting`, colour code pending, nobody assigned.
  ///
  /// Uses the built-in placeholders. `WorkflowEngine::new_order` is the
  /// configured path and goes through `with_placeholders`.
  pub fn new(transaction_id: TransactionId, category: Category, order_type: OrderType, now: DateTime<Utc>) -> Self {
    Self::with_placeholders(
      transaction_id,
      category,
      order_type,
      now,
      PENDING_COLOUR_CODE,
      UNASSIGNED_EMPLOYEE,
    )
  }

  pub fn with_placeholders(
    transaction_id: TransactionId,
    category: Category,
    order_type: OrderType,
    now: DateTime<Utc>,
    pending_colour_code: &str,
    unassigned_label: &str,
  ) -> Self {
    Self {
      transaction_id,
      category,
      current_status: OrderStatus::Waiting,
      colour_code: Some(pending_colour_code.to_string()),
      assigned_employee: unassigned_label.to_string(),
      po_type: None,
      order_type,
      note: None,
      status_started_at: now,
      created_at: now,
    }
  }

  pub fn is_paid(&self) -> bool {
    self.order_type == OrderType::Paid
  }

  /// True when the colour code is set to something other than blank,
  /// `PENDING_COLOUR_CODE` or `sentinel`.
  pub fn has_concrete_colour_code(&self, sentinel: &str) -> bool {
    self.colour_code.as_deref().is_some_and(|code| is_concrete_colour_code(code, sentinel))
  }
}

/// `PENDING_COLOUR_CODE` is always a placeholder; `sentinel` is an extra one.
pub fn is_concrete_colour_code(code: &str, sentinel: &str) -> bool {
  let code = code.trim();
  !code.is_empty() && !code.eq_ignore_ascii_case(PENDING_COLOUR_CODE) && !code.eq_ignore_ascii_case(sentinel.trim())
}
