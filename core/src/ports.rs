// mixline/src/ports.rs

//! Collaborators the engine talks to but does not own. Implementations live
//! outside the crate (the `memory` module has in-process ones).

use crate::error::{AuditError, DirectoryError, RepositoryError};
use crate::model::{Order, OrderStatus, StatusEvent, TransactionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A directory-verified person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
  pub name: String,
}

/// The mutable fields written by one committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitChanges {
  pub status: OrderStatus,
  pub employee: String,
  pub colour_code: Option<String>,
  pub started_at: DateTime<Utc>,
  pub note: Option<String>,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  /// Orders not yet `Complete` or `Cancelled`.
  async fn list_active(&self) -> Result<Vec<Order>, RepositoryError>;

  async fn get(&self, id: &TransactionId) -> Result<Order, RepositoryError>;

  /// Conditional update: applies `changes` only if the stored status still
  /// equals `expected`, otherwise fails with `RepositoryError::Conflict`.
  async fn commit(
    &self,
    id: &TransactionId,
    expected: OrderStatus,
    changes: CommitChanges,
  ) -> Result<Order, RepositoryError>;
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
  async fn resolve(&self, code: &str) -> Result<Employee, DirectoryError>;
}

#[async_trait]
pub trait AuditStore: Send + Sync {
  async fn append(&self, event: &StatusEvent) -> Result<(), AuditError>;
}
