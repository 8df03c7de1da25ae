// mixline/demos/front_counter/src/main.rs

mod config;
mod counter;
mod errors;

use crate::config::AppConfig;
use crate::counter::{Answers, Counter};
use crate::errors::AppError;

use mixline::memory::{InMemoryAuditLog, InMemoryOrderRepository, StaticEmployeeDirectory};
use mixline::{Category, OrderStatus, OrderType, Role, TransactionId, TransitionOutcome, WorkflowEngine, WorkflowError};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Opening the front counter...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e.into());
    }
  };

  let repo = Arc::new(InMemoryOrderRepository::new());
  let directory = Arc::new(StaticEmployeeDirectory::new([
    ("E100", "Alice Ong"),
    ("E200", "Raj Kumar"),
  ]));
  let audit = Arc::new(InMemoryAuditLog::new());
  let engine = WorkflowEngine::new(repo.clone(), directory, audit.clone(), app_config.workflow.clone())?;

  let counter = Counter {
    engine,
    repo,
    audit,
    role: app_config.role,
  };

  seed_queue(&counter, app_config.seed_orders);
  quote_waits(&counter).await?;
  run_session(&counter).await?;

  tracing::info!(events = counter.audit.events().len(), "Front counter closed.");
  Ok(())
}

fn seed_queue(counter: &Counter, count: usize) {
  for i in 0..count {
    let category = Category::ALL[i % Category::ALL.len()];
    let order = counter
      .engine
      .new_order(TransactionId::new(format!("Q-{:03}", i + 1)), category, OrderType::Paid);
    counter.repo.insert(order);
  }
  tracing::info!(count, "Queue seeded.");
}

async fn quote_waits(counter: &Counter) -> errors::Result<()> {
  for category in Category::ALL {
    let estimate = counter.engine.estimate_new_order(category).await?;
    tracing::info!(
      %category,
      queue_depth = estimate.queue_depth,
      minutes = estimate.minutes,
      ready_at = %estimate.ready_at.format("%H:%M"),
      "Wait quoted."
    );
  }
  Ok(())
}

async fn run_session(counter: &Counter) -> errors::Result<()> {
  let id = TransactionId::new("W-0001");
  counter
    .repo
    .insert(counter.engine.new_order(id.clone(), Category::NewMix, OrderType::Order));

  let mixer = Answers {
    employee_code: Some("E100".to_string()),
    colour_code: Some("5W".to_string()),
    ..Default::default()
  };

  for target in [OrderStatus::Mixing, OrderStatus::Spraying, OrderStatus::Ready] {
    counter.move_order(&id, target, &mixer).await?;
  }

  let rework = Answers {
    employee_code: Some("E200".to_string()),
    reason: Some("Customer reports orange peel".to_string()),
    ..Default::default()
  };
  if counter.role == Role::Admin {
    counter.move_order(&id, OrderStatus::Spraying, &rework).await?;
    counter.move_order(&id, OrderStatus::Ready, &rework).await?;
    counter.move_order(&id, OrderStatus::Complete, &Answers::default()).await?;
  } else {
    let allowed = counter.engine.allowed_targets(OrderStatus::Ready, counter.role);
    tracing::info!(?allowed, "Staff cannot finish or rework a Ready order.");
  }

  demonstrate_conflict(counter, &mixer).await?;

  let finished = counter
    .repo
    .stored(&id)
    .ok_or_else(|| AppError::Internal(format!("order {} vanished", id)))?;
  let json = serde_json::to_string_pretty(&finished).map_err(|e| AppError::Internal(e.to_string()))?;
  println!("{}", json);
  Ok(())
}

/// Two operators hold the same copy; the second commit must be refused.
async fn demonstrate_conflict(counter: &Counter, answers: &Answers) -> errors::Result<()> {
  let id = TransactionId::new("Q-001");
  let Some(stale) = counter.repo.stored(&id) else {
    tracing::info!("No seeded order to race on; skipping conflict demo.");
    return Ok(());
  };

  counter.move_order(&id, OrderStatus::Mixing, answers).await?;
  match counter.move_copy(stale, OrderStatus::Mixing, answers).await {
    Err(AppError::Workflow {
      source: WorkflowError::Conflict { expected, actual, .. },
    }) => {
      tracing::info!(%expected, %actual, "Stale copy refused.");
      Ok(())
    }
    Ok(TransitionOutcome::NeedsInput { missing }) => {
      tracing::warn!(?missing, "Stale request stopped at the gate instead of the store.");
      Ok(())
    }
    Ok(TransitionOutcome::Committed { .. }) => Err(AppError::Internal("stale copy was committed".to_string())),
    Err(e) => Err(e),
  }
}
