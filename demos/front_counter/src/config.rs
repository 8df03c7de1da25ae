// mixline/demos/front_counter/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use mixline::{Role, WorkflowConfig};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub workflow: WorkflowConfig,
  /// Role the scripted counter operator works under.
  pub role: Role,
  /// How many waiting orders to put in the queue before the session starts.
  pub seed_orders: usize,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let workflow = WorkflowConfig::from_env()?;

    let role = match env::var("MIXLINE_DEMO_ROLE") {
      Ok(raw) => parse_role(&raw)?,
      Err(_) => Role::Admin,
    };

    let seed_orders = env::var("MIXLINE_DEMO_SEED")
      .unwrap_or_else(|_| "4".to_string())
      .trim()
      .parse::<usize>()
      .map_err(|e| AppError::Config(format!("Invalid MIXLINE_DEMO_SEED: {}", e)))?;

    tracing::info!(%role, seed_orders, "Application configuration loaded successfully.");
    Ok(Self {
      workflow,
      role,
      seed_orders,
    })
  }
}

fn parse_role(raw: &str) -> Result<Role> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "admin" => Ok(Role::Admin),
    "staff" => Ok(Role::Staff),
    other => Err(AppError::Config(format!(
      "Invalid MIXLINE_DEMO_ROLE '{}': expected admin or staff",
      other
    ))),
  }
}
