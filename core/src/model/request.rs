// mixline/src/model/request.rs

use crate::model::order::{Order, OrderStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Staff,
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::Admin => f.write_str("admin"),
      Role::Staff => f.write_str("staff"),
    }
  }
}

/// Inputs the caller collected before (or after a `NeedsInput`) asking for a transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppliedInputs {
  pub colour_code: Option<String>,
  pub employee_code: Option<String>,
  pub reason: Option<String>,
}

impl SuppliedInputs {
  pub fn colour_code(&self) -> Option<&str> {
    non_blank(self.colour_code.as_deref())
  }

  pub fn employee_code(&self) -> Option<&str> {
    non_blank(self.employee_code.as_deref())
  }

  pub fn reason(&self) -> Option<&str> {
    non_blank(self.reason.as_deref())
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

/// A single ask to move `order` to `target`. Consumed by one engine call.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
  pub order: Order,
  pub target: OrderStatus,
  pub role: Role,
  pub inputs: SuppliedInputs,
}

impl TransitionRequest {
  pub fn new(order: Order, target: OrderStatus, role: Role) -> Self {
    Self {
      order,
      target,
      role,
      inputs: SuppliedInputs::default(),
    }
  }

  pub fn with_inputs(mut self, inputs: SuppliedInputs) -> Self {
    self.inputs = inputs;
    self
  }

  pub fn with_colour_code(mut self, code: impl Into<String>) -> Self {
    self.inputs.colour_code = Some(code.into());
    self
  }

  pub fn with_employee_code(mut self, code: impl Into<String>) -> Self {
    self.inputs.employee_code = Some(code.into());
    self
  }

  pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
    self.inputs.reason = Some(reason.into());
    self
  }

  pub fn from_status(&self) -> OrderStatus {
    self.order.current_status
  }
}
