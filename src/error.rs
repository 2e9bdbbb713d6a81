//! Error taxonomy for the recovery journey engine and its store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum JourneyError {
  #[error("Invalid phase: {0}")]
  InvalidPhase(String),

  #[error("Unknown activity: {0}")]
  UnknownActivity(String),

  #[error("Invalid pace: {0}")]
  InvalidPace(String),

  #[error("Invalid delivery type: {0}")]
  InvalidDeliveryType(String),

  #[error("Invalid category: {0}")]
  InvalidCategory(String),

  #[error("Duplicate activity id in catalog: {0}")]
  DuplicateActivity(String),

  #[error("Activity {id} has intensity {value} (expected 1-10)")]
  InvalidIntensity { id: String, value: u8 },

  #[error("Already at the final recovery phase")]
  FinalPhase,

  #[error("Database error: {0}")]
  Database(String),

  #[error("Missing or invalid configuration: {0}")]
  Config(String),
}

impl From<sqlx::Error> for JourneyError {
  fn from(e: sqlx::Error) -> Self {
    JourneyError::Database(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for JourneyError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    JourneyError::Database(format!("migration failed: {}", e))
  }
}

impl From<serde_json::Error> for JourneyError {
  fn from(e: serde_json::Error) -> Self {
    JourneyError::Database(format!("corrupt stored json: {}", e))
  }
}
