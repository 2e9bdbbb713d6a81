//! Commands for the recovery journey
//!
//! Each mutating command runs load -> engine -> save while holding the
//! state's journey lock, so concurrent callers cannot lose an update. A
//! state change and its history row are written in one transaction.

use crate::db::AppState;
use crate::error::JourneyError;
use crate::journey::{
    self, eligible_activities, next_activity, phase_progress, JourneyOverview, PhaseProgress,
};
use crate::models::{Activity, CompletionEvent, DeliveryType, Pace, Phase, UserRecoveryState};
use crate::store::{self, HistoryEntry};

const DEFAULT_HISTORY_LIMIT: i64 = 50;

async fn current_state(state: &AppState) -> Result<UserRecoveryState, JourneyError> {
    store::load_state(&state.db, state.default_delivery_type).await
}

/// Dashboard and phase-card view of the whole journey
pub async fn get_journey_overview(state: &AppState) -> Result<JourneyOverview, JourneyError> {
    let user = current_state(state).await?;
    Ok(JourneyOverview::compute(&state.catalog, &user))
}

/// Progress for one phase, named as the presentation layer names it
pub async fn get_phase_progress(state: &AppState, phase: &str) -> Result<PhaseProgress, JourneyError> {
    let phase: Phase = phase.parse()?;
    let user = current_state(state).await?;
    let eligible = eligible_activities(&state.catalog, user.delivery_type, user.pace);
    Ok(phase_progress(&eligible, phase, &user.completed_activity_ids))
}

pub async fn get_eligible_activities(state: &AppState) -> Result<Vec<Activity>, JourneyError> {
    let user = current_state(state).await?;
    Ok(eligible_activities(&state.catalog, user.delivery_type, user.pace)
        .into_iter()
        .cloned()
        .collect())
}

pub async fn get_next_activity(state: &AppState) -> Result<Option<Activity>, JourneyError> {
    let user = current_state(state).await?;
    let eligible = eligible_activities(&state.catalog, user.delivery_type, user.pace);
    Ok(next_activity(&eligible, user.current_phase, &user.completed_activity_ids).cloned())
}

/// Toggle an activity. Returns the completion event, or None while paused.
pub async fn toggle_activity(
    state: &AppState,
    activity_id: &str,
) -> Result<Option<CompletionEvent>, JourneyError> {
    let _guard = state.journey_lock.lock().await;
    let mut user = current_state(state).await?;

    let Some(event) = journey::toggle_completion(&mut user, &state.catalog, activity_id)? else {
        tracing::info!(activity_id, "journey paused, toggle ignored");
        return Ok(None);
    };

    // State and history row commit together or not at all
    let mut tx = state.db.begin().await?;
    store::save_state(&mut *tx, &user).await?;
    store::log_completion(&mut *tx, &event).await?;
    tx.commit().await?;

    if event.completed {
        tracing::info!(activity_id, points = event.points, "activity completed");
    } else {
        tracing::info!(activity_id, "activity marked incomplete");
    }

    Ok(Some(event))
}

pub async fn set_journey_pace(state: &AppState, pace: &str) -> Result<JourneyOverview, JourneyError> {
    let pace: Pace = pace.parse()?;
    let _guard = state.journey_lock.lock().await;
    let mut user = current_state(state).await?;

    if journey::set_pace(&mut user, pace) {
        store::save_state(&state.db, &user).await?;
        tracing::info!(%pace, "journey pace changed");
    }

    Ok(JourneyOverview::compute(&state.catalog, &user))
}

pub async fn set_journey_paused(state: &AppState, paused: bool) -> Result<JourneyOverview, JourneyError> {
    let _guard = state.journey_lock.lock().await;
    let mut user = current_state(state).await?;

    if journey::set_paused(&mut user, paused) {
        store::save_state(&state.db, &user).await?;
        tracing::info!(paused, "journey pause toggled");
    }

    Ok(JourneyOverview::compute(&state.catalog, &user))
}

pub async fn set_delivery_type(
    state: &AppState,
    delivery_type: &str,
) -> Result<JourneyOverview, JourneyError> {
    let delivery_type: DeliveryType = delivery_type.parse()?;
    let _guard = state.journey_lock.lock().await;
    let mut user = current_state(state).await?;

    if journey::set_delivery_type(&mut user, delivery_type) {
        store::save_state(&state.db, &user).await?;
        tracing::info!(%delivery_type, "delivery type changed");
    }

    Ok(JourneyOverview::compute(&state.catalog, &user))
}

/// Manual phase advancement; the only way `current_phase` moves
pub async fn advance_journey_phase(state: &AppState) -> Result<JourneyOverview, JourneyError> {
    let _guard = state.journey_lock.lock().await;
    let mut user = current_state(state).await?;

    let previous = user.current_phase;
    let next = journey::advance_phase(&mut user)?;

    let mut tx = state.db.begin().await?;
    store::save_state(&mut *tx, &user).await?;
    store::log_phase_change(&mut *tx, previous, next).await?;
    tx.commit().await?;
    tracing::info!(from = %previous, to = %next, "phase advanced");

    Ok(JourneyOverview::compute(&state.catalog, &user))
}

pub async fn get_completion_history(
    state: &AppState,
    limit: Option<i64>,
) -> Result<Vec<HistoryEntry>, JourneyError> {
    store::load_history(&state.db, limit.unwrap_or(DEFAULT_HISTORY_LIMIT)).await
}
