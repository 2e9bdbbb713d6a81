use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::activity::{DeliveryType, Pace, Phase};

/// Per-user recovery journey state.
///
/// Owned by the host application; engine functions borrow it and the
/// completion toggle is its only writer of `completed_activity_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecoveryState {
  pub delivery_type: DeliveryType,
  pub pace: Pace,
  pub current_phase: Phase,
  pub completed_activity_ids: BTreeSet<String>,
  pub is_paused: bool,
}

impl UserRecoveryState {
  /// Fresh state at profile creation: first phase, gentle pace, nothing done
  pub fn new(delivery_type: DeliveryType) -> Self {
    Self {
      delivery_type,
      pace: Pace::Gentle,
      current_phase: Phase::Stabilize,
      completed_activity_ids: BTreeSet::new(),
      is_paused: false,
    }
  }

  pub fn is_completed(&self, activity_id: &str) -> bool {
    self.completed_activity_ids.contains(activity_id)
  }
}

impl Default for UserRecoveryState {
  fn default() -> Self {
    Self::new(DeliveryType::default())
  }
}

/// Emitted once per completion toggle that actually changed state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
  pub activity_id: String,
  /// true when the activity was marked done, false when un-marked
  pub completed: bool,
  pub points: u32,
}
