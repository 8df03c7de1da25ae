// mixline/src/workflow/rules.rs

//! Which stage changes exist, and what kind each one is.

use crate::model::{AuditAction, OrderStatus, Role};

/// Classification of a legal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
  /// Normal production progress, any role.
  Advance,
  /// Ready → Complete.
  Complete,
  /// Ready back into Spraying or Re-Mixing.
  Revert,
  /// Any non-terminal stage → Cancelled.
  Cancel,
}

impl EdgeKind {
  pub fn requires_admin(&self) -> bool {
    !matches!(self, EdgeKind::Advance)
  }

  pub fn requires_reason(&self) -> bool {
    matches!(self, EdgeKind::Revert | EdgeKind::Cancel)
  }

  pub fn audit_action(&self) -> AuditAction {
    match self {
      EdgeKind::Advance => AuditAction::Advance,
      EdgeKind::Complete => AuditAction::Complete,
      EdgeKind::Revert => AuditAction::Revert,
      EdgeKind::Cancel => AuditAction::Cancel,
    }
  }
}

use crate::model::OrderStatus as S;

const EDGES: &[(OrderStatus, OrderStatus, EdgeKind)] = &[
  (S::Waiting, S::Mixing, EdgeKind::Advance),
  (S::Mixing, S::Spraying, EdgeKind::Advance),
  (S::Spraying, S::ReMixing, EdgeKind::Advance),
  (S::ReMixing, S::Spraying, EdgeKind::Advance),
  (S::Spraying, S::Ready, EdgeKind::Advance),
  (S::Ready, S::Complete, EdgeKind::Complete),
  (S::Ready, S::Spraying, EdgeKind::Revert),
  (S::Ready, S::ReMixing, EdgeKind::Revert),
];

/// The edge from `from` to `to`, if there is one.
pub fn edge_kind(from: OrderStatus, to: OrderStatus) -> Option<EdgeKind> {
  if to == S::Cancelled {
    return (!from.is_terminal()).then_some(EdgeKind::Cancel);
  }
  EDGES
    .iter()
    .find(|(f, t, _)| *f == from && *t == to)
    .map(|(_, _, kind)| *kind)
}

pub fn is_revert(from: OrderStatus, to: OrderStatus) -> bool {
  edge_kind(from, to) == Some(EdgeKind::Revert)
}

/// Statuses `role` may request from `from`, in pipeline order.
pub fn allowed_targets(from: OrderStatus, role: Role) -> Vec<OrderStatus> {
  OrderStatus::ALL
    .iter()
    .copied()
    .filter(|to| match edge_kind(from, *to) {
      Some(kind) => !kind.requires_admin() || role == Role::Admin,
      None => false,
    })
    .collect()
}
