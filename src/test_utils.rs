//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories

use sqlx::SqlitePool;

use crate::catalog::default_catalog;
use crate::db::AppState;
use crate::models::{Activity, Category, DeliveryType, Pace, Phase, UserRecoveryState};
use crate::store;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// In-memory database seeded with the default catalog, plus app state over it
pub async fn setup_test_app() -> (SqlitePool, AppState) {
  let pool = setup_test_db().await;
  store::seed_catalog(&pool, &default_catalog())
    .await
    .expect("Failed to seed catalog");
  let catalog = store::load_catalog(&pool)
    .await
    .expect("Failed to load catalog");

  let state = AppState::new(pool.clone(), catalog, DeliveryType::Normal);
  (pool, state)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_activity(
  id: &str,
  phase: Phase,
  category: Category,
  intensity_scale: u8,
  delivery_type_restriction: Option<DeliveryType>,
) -> Activity {
  Activity {
    id: id.to_string(),
    phase,
    category,
    title: format!("Test {}", id),
    description: String::new(),
    duration_minutes: 5,
    points: 10,
    intensity_scale,
    delivery_type_restriction,
  }
}

pub fn mock_state(delivery_type: DeliveryType, pace: Pace) -> UserRecoveryState {
  UserRecoveryState {
    pace,
    ..UserRecoveryState::new(delivery_type)
  }
}

/// Three Stabilize activities: universal intensity 1, universal intensity 8,
/// cesarean-only intensity 2. None of them are breathing work.
pub fn stabilize_trio() -> Vec<Activity> {
  vec![
    mock_activity("easy", Phase::Stabilize, Category::Pelvic, 1, None),
    mock_activity("hard", Phase::Stabilize, Category::Walking, 8, None),
    mock_activity(
      "cs-only",
      Phase::Stabilize,
      Category::Physio,
      2,
      Some(DeliveryType::CSection),
    ),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('recovery_state', 'activities', 'completion_history')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_setup_app_loads_catalog() {
    let (pool, state) = setup_test_app().await;
    assert_eq!(state.catalog.len(), 9);
    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let trio = stabilize_trio();
    assert!(crate::catalog::validate_catalog(&trio).is_ok());
    assert!(trio.iter().all(|a| a.phase == Phase::Stabilize));

    let state = mock_state(DeliveryType::CSection, Pace::Moderate);
    assert_eq!(state.pace, Pace::Moderate);
    assert_eq!(state.delivery_type, DeliveryType::CSection);
  }
}
