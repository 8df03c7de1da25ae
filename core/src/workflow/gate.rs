// mixline/src/workflow/gate.rs

//! Decides what extra input a stage change needs before it can be committed.
//!
//! The rules are a flat table keyed by `(category, from, to)` so the full set
//! can be listed, tested exhaustively, and diffed between revisions. Reverts
//! and cancellations are classified through `rules::edge_kind` and layered on
//! top of the table.

use crate::model::order::is_concrete_colour_code;
use crate::model::{Category, Order, OrderStatus, SuppliedInputs};
use crate::workflow::rules::{edge_kind, EdgeKind};
use std::fmt;

/// An input the caller has to collect and send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MissingInput {
  ColourCode,
  EmployeeCode,
  Reason,
}

impl fmt::Display for MissingInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MissingInput::ColourCode => f.write_str("colour code"),
      MissingInput::EmployeeCode => f.write_str("employee code"),
      MissingInput::Reason => f.write_str("reason"),
    }
  }
}

/// The three independent requirements of one proposed stage change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Requirements {
  pub employee: bool,
  pub colour_code: bool,
  pub reason: bool,
}

impl Requirements {
  pub fn is_empty(&self) -> bool {
    !self.employee && !self.colour_code && !self.reason
  }
}

/// What a table row asks for when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demand {
  Employee,
  /// Colour code, but only while the order's code is still blank or pending.
  ColourCodeIfPending,
}

struct GateRule {
  categories: &'static [Category],
  from: OrderStatus,
  to: OrderStatus,
  demand: Demand,
}

const VERIFIED_CATEGORIES: &[Category] = &[Category::NewMix, Category::MixMore, Category::ColourCode];
const FINISH_VERIFIED: &[Category] = &[Category::MixMore, Category::ColourCode];
const COLOUR_TRACKED: &[Category] = &[Category::NewMix];

use crate::model::OrderStatus as S;

const GATE_RULES: &[GateRule] = &[
  GateRule { categories: VERIFIED_CATEGORIES, from: S::Waiting, to: S::Mixing, demand: Demand::Employee },
  GateRule { categories: VERIFIED_CATEGORIES, from: S::Mixing, to: S::Spraying, demand: Demand::Employee },
  GateRule { categories: VERIFIED_CATEGORIES, from: S::Spraying, to: S::ReMixing, demand: Demand::Employee },
  GateRule { categories: VERIFIED_CATEGORIES, from: S::ReMixing, to: S::Spraying, demand: Demand::Employee },
  GateRule { categories: FINISH_VERIFIED, from: S::Spraying, to: S::Ready, demand: Demand::Employee },
  GateRule { categories: COLOUR_TRACKED, from: S::Mixing, to: S::Ready, demand: Demand::ColourCodeIfPending },
  GateRule { categories: COLOUR_TRACKED, from: S::Spraying, to: S::Ready, demand: Demand::ColourCodeIfPending },
  GateRule { categories: COLOUR_TRACKED, from: S::ReMixing, to: S::Ready, demand: Demand::ColourCodeIfPending },
];

#[derive(Debug, Clone)]
pub struct VerificationGate {
  pending_sentinel: String,
}

impl VerificationGate {
  pub fn new(pending_sentinel: impl Into<String>) -> Self {
    Self {
      pending_sentinel: pending_sentinel.into(),
    }
  }

  pub fn pending_sentinel(&self) -> &str {
    &self.pending_sentinel
  }

  /// Requirements for moving `order` to `to`.
  ///
  /// A required colour code always brings employee verification with it: the
  /// two are collected and resolved in one round.
  pub fn evaluate(&self, order: &Order, to: OrderStatus) -> Requirements {
    let from = order.current_status;
    let mut req = Requirements::default();

    for rule in rule_matches(order.category, from, to) {
      match rule.demand {
        Demand::Employee => req.employee = true,
        Demand::ColourCodeIfPending => {
          if !order.has_concrete_colour_code(&self.pending_sentinel) {
            req.colour_code = true;
          }
        }
      }
    }

    match edge_kind(from, to) {
      Some(EdgeKind::Revert) => {
        req.employee = true;
        req.reason = true;
      }
      Some(EdgeKind::Cancel) => req.reason = true,
      _ => {}
    }

    if req.colour_code {
      req.employee = true;
    }
    req
  }

  /// The inputs in `supplied` that do not yet satisfy `req`, in prompt order.
  ///
  /// A missing colour code reports the employee code as well, even if one was
  /// supplied, since both belong to the same prompt.
  pub fn missing(&self, req: &Requirements, supplied: &SuppliedInputs) -> Vec<MissingInput> {
    let mut missing = Vec::new();
    let colour_ok = supplied
      .colour_code()
      .is_some_and(|code| is_concrete_colour_code(code, &self.pending_sentinel));

    if req.colour_code && !colour_ok {
      missing.push(MissingInput::ColourCode);
      missing.push(MissingInput::EmployeeCode);
    } else if req.employee && supplied.employee_code().is_none() {
      missing.push(MissingInput::EmployeeCode);
    }
    if req.reason && supplied.reason().is_none() {
      missing.push(MissingInput::Reason);
    }
    missing
  }
}

impl Default for VerificationGate {
  fn default() -> Self {
    Self::new(crate::model::order::PENDING_COLOUR_CODE)
  }
}

fn rule_matches(category: Category, from: OrderStatus, to: OrderStatus) -> impl Iterator<Item = &'static GateRule> {
  GATE_RULES
    .iter()
    .filter(move |r| r.from == from && r.to == to && r.categories.contains(&category))
}
