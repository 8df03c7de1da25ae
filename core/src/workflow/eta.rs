// mixline/src/workflow/eta.rs

use crate::config::EtaConfig;
use crate::model::{Category, Order, OrderStatus};
use chrono::{DateTime, Duration, Utc};

/// Wait-time estimate for an order joining the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEstimate {
  pub queue_depth: u32,
  pub minutes: u32,
  pub ready_at: DateTime<Utc>,
}

/// Estimates minutes until a newly queued order is ready: `depth × base(category)`.
#[derive(Debug, Clone, Default)]
pub struct EtaEstimator {
  config: EtaConfig,
}

impl EtaEstimator {
  pub fn new(config: EtaConfig) -> Self {
    Self { config }
  }

  pub fn base_minutes(&self, category: Category) -> u32 {
    self.config.base_minutes(category)
  }

  pub fn estimate(&self, category: Category, queue_depth: u32) -> u32 {
    queue_depth.saturating_mul(self.base_minutes(category))
  }

  pub fn estimate_ready_at(&self, category: Category, queue_depth: u32, now: DateTime<Utc>) -> QueueEstimate {
    let minutes = self.estimate(category, queue_depth);
    QueueEstimate {
      queue_depth,
      minutes,
      ready_at: now + Duration::minutes(i64::from(minutes)),
    }
  }
}

/// Position a new order would take: everything waiting, everything being
/// worked, plus the new order itself. `Ready` and terminal orders are not ahead of it.
pub fn queue_depth<'a>(orders: impl IntoIterator<Item = &'a Order>) -> u32 {
  let ahead = orders
    .into_iter()
    .filter(|o| o.current_status == OrderStatus::Waiting || o.current_status.is_in_progress())
    .count();
  u32::try_from(ahead).unwrap_or(u32::MAX).saturating_add(1)
}
