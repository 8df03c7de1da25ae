// mixline/demos/front_counter/src/errors.rs

use mixline::{ConfigError, WorkflowError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: WorkflowError,
  },

  #[error("Counter script has no answer for '{0}'")]
  Unanswered(String),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl From<ConfigError> for AppError {
  fn from(err: ConfigError) -> Self {
    AppError::Config(err.to_string())
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
