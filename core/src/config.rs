// mixline/src/config.rs

use crate::error::ConfigError;
use crate::model::order::{Category, PENDING_COLOUR_CODE, UNASSIGNED_EMPLOYEE};
use dotenvy::dotenv;
use std::env;

/// Minutes of work one queued order of a category adds to the wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtaConfig {
  pub new_mix_minutes: u32,
  pub mix_more_minutes: u32,
  pub colour_code_minutes: u32,
  /// Used for every category without its own entry.
  pub default_minutes: u32,
}

impl Default for EtaConfig {
  fn default() -> Self {
    Self {
      new_mix_minutes: 30,
      mix_more_minutes: 15,
      colour_code_minutes: 30,
      default_minutes: 15,
    }
  }
}

impl EtaConfig {
  pub fn base_minutes(&self, category: Category) -> u32 {
    match category {
      Category::NewMix => self.new_mix_minutes,
      Category::MixMore => self.mix_more_minutes,
      Category::ColourCode => self.colour_code_minutes,
      _ => self.default_minutes,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
  /// Colour-code placeholder meaning "not supplied yet".
  pub pending_sentinel: String,
  /// `assigned_employee` value for orders nobody has verified against.
  pub unassigned_label: String,
  pub eta: EtaConfig,
}

impl Default for WorkflowConfig {
  fn default() -> Self {
    Self {
      pending_sentinel: PENDING_COLOUR_CODE.to_string(),
      unassigned_label: UNASSIGNED_EMPLOYEE.to_string(),
      eta: EtaConfig::default(),
    }
  }
}

impl WorkflowConfig {
  /// Defaults overridden by `MIXLINE_*` variables (a `.env` file is honoured).
  ///
  /// Recognised: `MIXLINE_PENDING_SENTINEL`, `MIXLINE_UNASSIGNED_LABEL`,
  /// `MIXLINE_ETA_NEW_MIX_MINUTES`, `MIXLINE_ETA_MIX_MORE_MINUTES`,
  /// `MIXLINE_ETA_COLOUR_CODE_MINUTES`, `MIXLINE_ETA_DEFAULT_MINUTES`.
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenv().ok();
    Self::from_lookup(|var| env::var(var).ok())
  }

  /// Same as `from_env` but reads values through `lookup`.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let minutes = |var: &str, fallback: u32| -> Result<u32, ConfigError> {
      match lookup(var) {
        Some(raw) => raw.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
          var: var.to_string(),
          message: e.to_string(),
        }),
        None => Ok(fallback),
      }
    };
    let text = |var: &str, fallback: String| -> Result<String, ConfigError> {
      match lookup(var) {
        Some(raw) if raw.trim().is_empty() => Err(ConfigError::Invalid {
          var: var.to_string(),
          message: "must not be blank".to_string(),
        }),
        Some(raw) => Ok(raw.trim().to_string()),
        None => Ok(fallback),
      }
    };

    let config = Self {
      pending_sentinel: text("MIXLINE_PENDING_SENTINEL", defaults.pending_sentinel)?,
      unassigned_label: text("MIXLINE_UNASSIGNED_LABEL", defaults.unassigned_label)?,
      eta: EtaConfig {
        new_mix_minutes: minutes("MIXLINE_ETA_NEW_MIX_MINUTES", defaults.eta.new_mix_minutes)?,
        mix_more_minutes: minutes("MIXLINE_ETA_MIX_MORE_MINUTES", defaults.eta.mix_more_minutes)?,
        colour_code_minutes: minutes("MIXLINE_ETA_COLOUR_CODE_MINUTES", defaults.eta.colour_code_minutes)?,
        default_minutes: minutes("MIXLINE_ETA_DEFAULT_MINUTES", defaults.eta.default_minutes)?,
      },
    };
    tracing::debug!(config = ?config, "Workflow configuration loaded.");
    Ok(config)
  }
}
