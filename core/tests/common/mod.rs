// tests/common/mod.rs
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use mixline::core::handler::{Handler, HandlerFuture};
use mixline::memory::{InMemoryAuditLog, InMemoryOrderRepository, StaticEmployeeDirectory};
use mixline::{
  Category, ContextData, Order, OrderStatus, OrderType, PipelineError, StepControl, TransactionId, WorkflowConfig,
  WorkflowEngine,
};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::Level;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Generic pipeline fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub suspend_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Pipeline error: {0}")]
  Pipeline(#[from] PipelineError),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| -> HandlerFuture<TestError> {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, counter = guard.counter, "executed");
      if guard.suspend_at.as_deref() == Some(step_name) {
        return Ok(StepControl::Suspend);
      }
      Ok(StepControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| -> HandlerFuture<TestError> {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Workflow fixtures ---
pub const ALICE_CODE: &str = "E100";
pub const ALICE: &str = "Alice Ong";
pub const RAJ_CODE: &str = "E200";
pub const RAJ: &str = "Raj Kumar";

pub fn t0() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// An order already sitting in `status`.
pub fn order_at(id: &str, category: Category, status: OrderStatus) -> Order {
  let mut order = Order::new(TransactionId::new(id), category, OrderType::Paid, t0());
  order.current_status = status;
  order
}

pub struct Harness {
  pub engine: WorkflowEngine,
  pub repo: Arc<InMemoryOrderRepository>,
  pub directory: Arc<StaticEmployeeDirectory>,
  pub audit: Arc<InMemoryAuditLog>,
}

impl Harness {
  pub fn stored(&self, id: &str) -> Order {
    self.repo.stored(&TransactionId::new(id)).expect("order should be stored")
  }
}

pub fn harness(orders: impl IntoIterator<Item = Order>) -> Harness {
  harness_with_config(orders, WorkflowConfig::default())
}

pub fn harness_with_config(orders: impl IntoIterator<Item = Order>, config: WorkflowConfig) -> Harness {
  setup_tracing();
  let repo = Arc::new(InMemoryOrderRepository::with_orders(orders));
  let directory = Arc::new(StaticEmployeeDirectory::new([(ALICE_CODE, ALICE), (RAJ_CODE, RAJ)]));
  let audit = Arc::new(InMemoryAuditLog::new());
  let engine = WorkflowEngine::new(repo.clone(), directory.clone(), audit.clone(), config)
    .expect("transition pipeline should assemble");
  Harness {
    engine,
    repo,
    directory,
    audit,
  }
}
