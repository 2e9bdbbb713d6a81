use std::env;

use crate::error::JourneyError;
use crate::models::DeliveryType;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://afterma-journey.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Runtime configuration, read from the environment (and `.env` when present)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyConfig {
  pub database_url: String,
  pub max_connections: u32,
  /// Delivery type for a profile that has never been saved
  pub default_delivery_type: DeliveryType,
}

impl Default for JourneyConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      max_connections: DEFAULT_MAX_CONNECTIONS,
      default_delivery_type: DeliveryType::Normal,
    }
  }
}

impl JourneyConfig {
  pub fn from_env() -> Result<Self, JourneyError> {
    let database_url =
      env::var("AFTERMA_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let max_connections = match env::var("AFTERMA_MAX_CONNECTIONS") {
      Ok(raw) => match raw.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
          return Err(JourneyError::Config(format!(
            "AFTERMA_MAX_CONNECTIONS must be a positive integer, got {:?}",
            raw
          )))
        }
      },
      Err(_) => DEFAULT_MAX_CONNECTIONS,
    };

    let default_delivery_type = match env::var("AFTERMA_DEFAULT_DELIVERY_TYPE") {
      Ok(raw) => raw
        .parse()
        .map_err(|_| JourneyError::Config(format!("AFTERMA_DEFAULT_DELIVERY_TYPE: {:?}", raw)))?,
      Err(_) => DeliveryType::Normal,
    };

    Ok(Self {
      database_url,
      max_connections,
      default_delivery_type,
    })
  }
}
