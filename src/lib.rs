pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod journey;
pub mod models;
pub mod store;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use config::JourneyConfig;
use db::AppState;
use error::JourneyError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing() {
  let _ = tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "afterma_journey_lib=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .try_init();
}

/// Load configuration, open the database and seed the activity catalog
pub async fn bootstrap() -> Result<Arc<AppState>, JourneyError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  init_tracing();

  let config = JourneyConfig::from_env()?;
  start(&config).await
}

/// Same as `bootstrap`, with an explicit configuration
pub async fn start(config: &JourneyConfig) -> Result<Arc<AppState>, JourneyError> {
  let pool = db::initialize_db(config).await?;

  let builtin = catalog::default_catalog();
  catalog::validate_catalog(&builtin)?;
  let changed = store::seed_catalog(&pool, &builtin).await?;
  if changed > 0 {
    tracing::info!(changed, "seeded activity catalog");
  }

  let activities = store::load_catalog(&pool).await?;
  catalog::validate_catalog(&activities)?;
  tracing::info!(activities = activities.len(), "journey ready");

  Ok(Arc::new(AppState::new(pool, activities, config.default_delivery_type)))
}
