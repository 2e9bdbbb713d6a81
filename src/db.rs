use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;

use crate::config::JourneyConfig;
use crate::error::JourneyError;
use crate::models::{Activity, DeliveryType};

pub type DbPool = SqlitePool;

/// Application state holding the database pool and the loaded catalog
pub struct AppState {
  pub db: DbPool,
  pub catalog: Vec<Activity>,
  pub default_delivery_type: DeliveryType,
  /// Serializes load -> mutate -> save of the stored recovery state
  pub journey_lock: Mutex<()>,
}

impl AppState {
  pub fn new(db: DbPool, catalog: Vec<Activity>, default_delivery_type: DeliveryType) -> Self {
    Self {
      db,
      catalog,
      default_delivery_type,
      journey_lock: Mutex::new(()),
    }
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &JourneyConfig) -> Result<DbPool, JourneyError> {
  tracing::info!(url = %config.database_url, "initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("database initialized");

  Ok(pool)
}
