//! Recovery Journey Engine
//!
//! Phase-gated progression over a static activity catalog:
//! - eligibility by delivery type and pace
//! - per-phase completion accounting
//! - advisory phase gate (locked beyond the current phase)
//! - deterministic next-activity selection
//! - completion toggling, the only writer of completion state
//!
//! Key principles:
//! - Everything is derived on each call, nothing cached
//! - Pure functions; no I/O and no logging here, the store and commands
//!   layers own persistence and side effects
//! - Phase advancement is an explicit call, never triggered by progress

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::find_activity;
use crate::error::JourneyError;
use crate::models::{Activity, CompletionEvent, DeliveryType, Pace, Phase, UserRecoveryState};

/// Gentle pace admits intensities up to and including this value
pub const GENTLE_MAX_INTENSITY: u8 = 5;

// ---------------------------------------------------------------------------
/// Eligibility Filter
// ---------------------------------------------------------------------------

/// Activities the user may see at all, in catalog order
pub fn eligible_activities(
    catalog: &[Activity],
    delivery_type: DeliveryType,
    pace: Pace,
) -> Vec<&Activity> {
    catalog
        .iter()
        .filter(|a| passes_delivery_type(a, delivery_type))
        .filter(|a| passes_pace(a, pace))
        .collect()
}

fn passes_delivery_type(activity: &Activity, delivery_type: DeliveryType) -> bool {
    activity
        .delivery_type_restriction
        .is_none_or(|restriction| restriction == delivery_type)
}

fn passes_pace(activity: &Activity, pace: Pace) -> bool {
    match pace {
        // Breathing work is gentle-safe whatever its intensity score
        Pace::Gentle => activity.intensity_scale <= GENTLE_MAX_INTENSITY || activity.is_breathing(),
        Pace::Moderate => true,
    }
}

// ---------------------------------------------------------------------------
/// Phase Progress Calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    pub completed_count: u32,
    pub total_count: u32,
    /// 0 when the phase has no eligible activities
    pub percent: u32,
}

impl PhaseProgress {
    pub fn new(completed_count: u32, total_count: u32) -> Self {
        Self {
            completed_count,
            total_count,
            percent: rounded_percent(completed_count, total_count),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_count > 0 && self.completed_count == self.total_count
    }
}

/// round(100 * completed / total), half rounds up, integer only
fn rounded_percent(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (200 * completed + total) / (2 * total)
}

pub fn phase_progress(
    eligible: &[&Activity],
    phase: Phase,
    completed: &BTreeSet<String>,
) -> PhaseProgress {
    let in_phase = eligible.iter().filter(|a| a.phase == phase);
    let (done, total) = in_phase.fold((0u32, 0u32), |(done, total), a| {
        let done = if completed.contains(&a.id) { done + 1 } else { done };
        (done, total + 1)
    });
    PhaseProgress::new(done, total)
}

// ---------------------------------------------------------------------------
/// Phase Gate
// ---------------------------------------------------------------------------

/// Whether `requested` lies strictly beyond `current` in `phases`.
///
/// Advisory for the presentation layer only; completion toggling does not
/// consult it.
pub fn is_locked(phases: &[Phase], current: Phase, requested: Phase) -> Result<bool, JourneyError> {
    let current_idx = phase_index(phases, current)?;
    let requested_idx = phase_index(phases, requested)?;
    Ok(requested_idx > current_idx)
}

fn phase_index(phases: &[Phase], phase: Phase) -> Result<usize, JourneyError> {
    phases
        .iter()
        .position(|p| *p == phase)
        .ok_or_else(|| JourneyError::InvalidPhase(phase.to_string()))
}

/// Position of a phase in the canonical sequence
fn phase_rank(phase: Phase) -> usize {
    match phase {
        Phase::Stabilize => 0,
        Phase::Strengthen => 1,
        Phase::Restore => 2,
        Phase::RebuildConfidence => 3,
    }
}

/// A session may start only while the journey runs and the phase is unlocked
pub fn can_start_session(
    state: &UserRecoveryState,
    phases: &[Phase],
    activity: &Activity,
) -> Result<bool, JourneyError> {
    if state.is_paused {
        return Ok(false);
    }
    Ok(!is_locked(phases, state.current_phase, activity.phase)?)
}

// ---------------------------------------------------------------------------
/// Next-Activity Selector
// ---------------------------------------------------------------------------

/// First uncompleted activity of `current_phase`, in catalog order
pub fn next_activity<'a>(
    eligible: &[&'a Activity],
    current_phase: Phase,
    completed: &BTreeSet<String>,
) -> Option<&'a Activity> {
    eligible
        .iter()
        .copied()
        .filter(|a| a.phase == current_phase)
        .find(|a| !completed.contains(&a.id))
}

// ---------------------------------------------------------------------------
/// Completion Mutator
// ---------------------------------------------------------------------------

/// Flip an activity between done and not done.
///
/// Paused journeys are left untouched for any id and yield `Ok(None)`.
/// Ids absent from `catalog` fail with `UnknownActivity`. Eligibility and
/// the phase gate are not checked here.
pub fn toggle_completion(
    state: &mut UserRecoveryState,
    catalog: &[Activity],
    activity_id: &str,
) -> Result<Option<CompletionEvent>, JourneyError> {
    if state.is_paused {
        return Ok(None);
    }

    let activity = find_activity(catalog, activity_id)
        .ok_or_else(|| JourneyError::UnknownActivity(activity_id.to_string()))?;

    let completed = if state.completed_activity_ids.remove(activity_id) {
        false
    } else {
        state.completed_activity_ids.insert(activity_id.to_string());
        true
    };

    Ok(Some(CompletionEvent {
        activity_id: activity.id.clone(),
        completed,
        points: activity.points,
    }))
}

// ---------------------------------------------------------------------------
/// Settings edits
// ---------------------------------------------------------------------------

/// Move to the next phase. Only ever invoked explicitly by the host.
pub fn advance_phase(state: &mut UserRecoveryState) -> Result<Phase, JourneyError> {
    let next = state.current_phase.next().ok_or(JourneyError::FinalPhase)?;
    state.current_phase = next;
    Ok(next)
}

/// Returns true if the pace actually changed
pub fn set_pace(state: &mut UserRecoveryState, pace: Pace) -> bool {
    let changed = state.pace != pace;
    state.pace = pace;
    changed
}

/// Returns true if the pause flag actually changed
pub fn set_paused(state: &mut UserRecoveryState, paused: bool) -> bool {
    let changed = state.is_paused != paused;
    state.is_paused = paused;
    changed
}

/// Returns true if the delivery type actually changed
pub fn set_delivery_type(state: &mut UserRecoveryState, delivery_type: DeliveryType) -> bool {
    let changed = state.delivery_type != delivery_type;
    state.delivery_type = delivery_type;
    changed
}

// ---------------------------------------------------------------------------
/// Journey Overview: what the dashboard and phase cards render
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseStatus {
    pub phase: Phase,
    pub locked: bool,
    pub progress: PhaseProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyOverview {
    pub current_phase: Phase,
    pub pace: Pace,
    pub delivery_type: DeliveryType,
    pub is_paused: bool,
    pub phases: Vec<PhaseStatus>,
    pub current_progress: PhaseProgress,
    /// None while paused, or when the current phase has nothing left
    pub next_activity: Option<Activity>,
    pub eligible_count: usize,
    /// Points of every completed catalog activity, eligible now or not
    pub total_points: u32,
}

impl JourneyOverview {
    pub fn compute(catalog: &[Activity], state: &UserRecoveryState) -> Self {
        let eligible = eligible_activities(catalog, state.delivery_type, state.pace);
        let completed = &state.completed_activity_ids;

        let phases: Vec<PhaseStatus> = Phase::ALL
            .iter()
            .map(|&phase| PhaseStatus {
                phase,
                locked: phase_rank(phase) > phase_rank(state.current_phase),
                progress: phase_progress(&eligible, phase, completed),
            })
            .collect();

        let current_progress = phase_progress(&eligible, state.current_phase, completed);

        let next_activity = if state.is_paused {
            None
        } else {
            next_activity(&eligible, state.current_phase, completed).cloned()
        };

        let total_points = catalog
            .iter()
            .filter(|a| completed.contains(&a.id))
            .map(|a| a.points)
            .sum();

        Self {
            current_phase: state.current_phase,
            pace: state.pace,
            delivery_type: state.delivery_type,
            is_paused: state.is_paused,
            phases,
            current_progress,
            next_activity,
            eligible_count: eligible.len(),
            total_points,
        }
    }

    pub fn get_phase(&self, phase: Phase) -> Option<&PhaseStatus> {
        self.phases.iter().find(|p| p.phase == phase)
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
