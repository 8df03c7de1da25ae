// mixline/src/memory.rs

//! In-process collaborators with switchable faults, for tests and demos.

use crate::error::{AuditError, DirectoryError, RepositoryError};
use crate::model::{Order, OrderStatus, StatusEvent, TransactionId};
use crate::ports::{AuditStore, CommitChanges, Employee, EmployeeDirectory, OrderRepository};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, instrument};

/// Orders keyed by transaction id, with compare-and-set commits.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
  orders: Mutex<BTreeMap<TransactionId, Order>>,
  offline: AtomicBool,
  commit_calls: AtomicUsize,
}

impl InMemoryOrderRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
    let repo = Self::new();
    for order in orders {
      repo.insert(order);
    }
    repo
  }

  pub fn insert(&self, order: Order) {
    self.orders.lock().insert(order.transaction_id.clone(), order);
  }

  /// Current stored copy, bypassing the fault switch.
  pub fn stored(&self, id: &TransactionId) -> Option<Order> {
    self.orders.lock().get(id).cloned()
  }

  /// While offline every call fails with `Unavailable`.
  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  pub fn commit_calls(&self) -> usize {
    self.commit_calls.load(Ordering::SeqCst)
  }

  fn check_online(&self) -> Result<(), RepositoryError> {
    if self.offline.load(Ordering::SeqCst) {
      return Err(RepositoryError::Unavailable(anyhow::anyhow!("order store is offline")));
    }
    Ok(())
  }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
  async fn list_active(&self) -> Result<Vec<Order>, RepositoryError> {
    self.check_online()?;
    Ok(
      self
        .orders
        .lock()
        .values()
        .filter(|o| !o.current_status.is_terminal())
        .cloned()
        .collect(),
    )
  }

  async fn get(&self, id: &TransactionId) -> Result<Order, RepositoryError> {
    self.check_online()?;
    self
      .orders
      .lock()
      .get(id)
      .cloned()
      .ok_or_else(|| RepositoryError::NotFound { order_id: id.clone() })
  }

  #[instrument(skip(self, changes), fields(order_id = %id, expected = %expected, to = %changes.status))]
  async fn commit(
    &self,
    id: &TransactionId,
    expected: OrderStatus,
    changes: CommitChanges,
  ) -> Result<Order, RepositoryError> {
    self.commit_calls.fetch_add(1, Ordering::SeqCst);
    self.check_online()?;

    let mut orders = self.orders.lock();
    let order = orders
      .get_mut(id)
      .ok_or_else(|| RepositoryError::NotFound { order_id: id.clone() })?;
    if order.current_status != expected {
      return Err(RepositoryError::Conflict {
        order_id: id.clone(),
        expected,
        actual: order.current_status,
      });
    }

    order.current_status = changes.status;
    order.assigned_employee = changes.employee;
    order.colour_code = changes.colour_code;
    order.status_started_at = changes.started_at;
    order.note = changes.note;
    debug!("Order committed.");
    Ok(order.clone())
  }
}

/// Fixed code → name table.
#[derive(Debug, Default)]
pub struct StaticEmployeeDirectory {
  employees: HashMap<String, String>,
  offline: AtomicBool,
  lookups: AtomicUsize,
}

impl StaticEmployeeDirectory {
  pub fn new<C, N>(entries: impl IntoIterator<Item = (C, N)>) -> Self
  where
    C: Into<String>,
    N: Into<String>,
  {
    Self {
      employees: entries.into_iter().map(|(c, n)| (c.into(), n.into())).collect(),
      ..Default::default()
    }
  }

  pub fn set_offline(&self, offline: bool) {
    self.offline.store(offline, Ordering::SeqCst);
  }

  pub fn lookups(&self) -> usize {
    self.lookups.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl EmployeeDirectory for StaticEmployeeDirectory {
  async fn resolve(&self, code: &str) -> Result<Employee, DirectoryError> {
    self.lookups.fetch_add(1, Ordering::SeqCst);
    if self.offline.load(Ordering::SeqCst) {
      return Err(DirectoryError::Unavailable(anyhow::anyhow!("employee directory is offline")));
    }
    self
      .employees
      .get(code.trim())
      .map(|name| Employee { name: name.clone() })
      .ok_or_else(|| DirectoryError::UnknownCode { code: code.to_string() })
  }
}

/// Append-only event list.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
  events: Mutex<Vec<StatusEvent>>,
  failing: AtomicBool,
  attempts: AtomicUsize,
}

impl InMemoryAuditLog {
  pub fn new() -> Self {
    Self::default()
  }

  /// While failing, `append` rejects events (and keeps nothing).
  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn events(&self) -> Vec<StatusEvent> {
    self.events.lock().clone()
  }

  /// Appends attempted, successful or not.
  pub fn attempts(&self) -> usize {
    self.attempts.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl AuditStore for InMemoryAuditLog {
  async fn append(&self, event: &StatusEvent) -> Result<(), AuditError> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    if self.failing.load(Ordering::SeqCst) {
      return Err(AuditError::new(anyhow::anyhow!("audit store rejected the write")));
    }
    self.events.lock().push(event.clone());
    Ok(())
  }
}
