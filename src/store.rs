//! SQLite persistence for the recovery journey
//!
//! The engine never touches storage. Every mutation goes through
//! load -> engine call -> save. Writes take any sqlite executor so a save and
//! its history row can share one transaction.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Row, Sqlite, SqlitePool};

use crate::error::JourneyError;
use crate::models::{Activity, CompletionEvent, DeliveryType, Phase, UserRecoveryState};

// ---------------------------------------------------------------------------
// Recovery State
// ---------------------------------------------------------------------------

/// Load the stored state, or a fresh one when nothing has been saved yet
pub async fn load_state(
    pool: &SqlitePool,
    default_delivery_type: DeliveryType,
) -> Result<UserRecoveryState, JourneyError> {
    let row = sqlx::query(
        r#"
        SELECT delivery_type, pace, current_phase, completed_ids_json, is_paused
        FROM recovery_state
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        tracing::debug!("no stored recovery state, starting fresh");
        return Ok(UserRecoveryState::new(default_delivery_type));
    };

    let delivery_type: String = row.try_get("delivery_type")?;
    let pace: String = row.try_get("pace")?;
    let current_phase: String = row.try_get("current_phase")?;
    let completed_json: String = row.try_get("completed_ids_json")?;
    let completed_activity_ids: BTreeSet<String> = serde_json::from_str(&completed_json)?;

    Ok(UserRecoveryState {
        delivery_type: delivery_type.parse()?,
        pace: pace.parse()?,
        current_phase: current_phase.parse()?,
        completed_activity_ids,
        is_paused: row.try_get("is_paused")?,
    })
}

pub async fn save_state<'e, E>(executor: E, state: &UserRecoveryState) -> Result<(), JourneyError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let completed_json = serde_json::to_string(&state.completed_activity_ids)?;

    sqlx::query(
        r#"
        INSERT INTO recovery_state
            (id, delivery_type, pace, current_phase, completed_ids_json, is_paused, updated_at)
        VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(id) DO UPDATE SET
            delivery_type = excluded.delivery_type,
            pace = excluded.pace,
            current_phase = excluded.current_phase,
            completed_ids_json = excluded.completed_ids_json,
            is_paused = excluded.is_paused,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(state.delivery_type.as_str())
    .bind(state.pace.as_str())
    .bind(state.current_phase.as_str())
    .bind(&completed_json)
    .bind(state.is_paused)
    .bind(Utc::now().to_rfc3339())
    .execute(executor)
    .await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Activity Catalog
// ---------------------------------------------------------------------------

/// Bring stored catalog rows in line with `catalog`.
///
/// Returns how many rows were inserted or refreshed; rows already matching
/// are left alone and not counted.
pub async fn seed_catalog(pool: &SqlitePool, catalog: &[Activity]) -> Result<u64, JourneyError> {
    let mut changed = 0;

    for (sort_order, act) in catalog.iter().enumerate() {
        let result = sqlx::query(
            r#"
            INSERT INTO activities (
                id, sort_order, phase, category, title, description,
                duration_minutes, points, intensity_scale, delivery_type_restriction
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                sort_order = excluded.sort_order,
                phase = excluded.phase,
                category = excluded.category,
                title = excluded.title,
                description = excluded.description,
                duration_minutes = excluded.duration_minutes,
                points = excluded.points,
                intensity_scale = excluded.intensity_scale,
                delivery_type_restriction = excluded.delivery_type_restriction
            WHERE activities.sort_order IS NOT excluded.sort_order
                OR activities.phase IS NOT excluded.phase
                OR activities.category IS NOT excluded.category
                OR activities.title IS NOT excluded.title
                OR activities.description IS NOT excluded.description
                OR activities.duration_minutes IS NOT excluded.duration_minutes
                OR activities.points IS NOT excluded.points
                OR activities.intensity_scale IS NOT excluded.intensity_scale
                OR activities.delivery_type_restriction IS NOT excluded.delivery_type_restriction
            "#,
        )
        .bind(&act.id)
        .bind(sort_order as i64)
        .bind(act.phase.as_str())
        .bind(act.category.as_str())
        .bind(&act.title)
        .bind(&act.description)
        .bind(act.duration_minutes as i64)
        .bind(act.points as i64)
        .bind(act.intensity_scale as i64)
        .bind(act.delivery_type_restriction.map(|d| d.as_str()))
        .execute(pool)
        .await?;

        changed += result.rows_affected();
    }

    Ok(changed)
}

/// Load the catalog in its stored order
pub async fn load_catalog(pool: &SqlitePool) -> Result<Vec<Activity>, JourneyError> {
    let rows = sqlx::query(
        r#"
        SELECT
            id, phase, category, title, description,
            duration_minutes, points, intensity_scale, delivery_type_restriction
        FROM activities
        ORDER BY sort_order, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut catalog = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.try_get("id")?;
        let phase: String = row.try_get("phase")?;
        let category: String = row.try_get("category")?;
        let restriction: Option<String> = row.try_get("delivery_type_restriction")?;
        let intensity: i64 = row.try_get("intensity_scale")?;

        let intensity_scale = u8::try_from(intensity).map_err(|_| {
            JourneyError::Database(format!("intensity_scale out of range for {}: {}", id, intensity))
        })?;

        catalog.push(Activity {
            phase: phase.parse()?,
            category: category.parse()?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            duration_minutes: column_u32(&row, "duration_minutes")?,
            points: column_u32(&row, "points")?,
            intensity_scale,
            delivery_type_restriction: restriction.map(|s| s.parse()).transpose()?,
            id,
        });
    }

    Ok(catalog)
}

fn column_u32(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<u32, JourneyError> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value)
        .map_err(|_| JourneyError::Database(format!("{} out of range: {}", column, value)))
}

// ---------------------------------------------------------------------------
// Completion History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    /// "completed", "uncompleted" or "phase_change"
    pub change_type: String,
    pub activity_id: Option<String>,
    pub points: i64,
    pub previous_phase: Option<String>,
    pub new_phase: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn log_completion<'e, E>(executor: E, event: &CompletionEvent) -> Result<(), JourneyError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let change_type = if event.completed { "completed" } else { "uncompleted" };

    sqlx::query(
        r#"
        INSERT INTO completion_history (change_type, activity_id, points, created_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(change_type)
    .bind(&event.activity_id)
    .bind(event.points as i64)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn log_phase_change<'e, E>(
    executor: E,
    previous: Phase,
    next: Phase,
) -> Result<(), JourneyError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO completion_history (change_type, previous_phase, new_phase, created_at)
        VALUES ('phase_change', ?1, ?2, ?3)
        "#,
    )
    .bind(previous.as_str())
    .bind(next.as_str())
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

/// Most recent history entries first
pub async fn load_history(pool: &SqlitePool, limit: i64) -> Result<Vec<HistoryEntry>, JourneyError> {
    let entries = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT id, change_type, activity_id, points, previous_phase, new_phase, created_at
        FROM completion_history
        ORDER BY id DESC
        LIMIT ?1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
