//! Built-in recovery activity catalog
//!
//! The catalog is ordered: catalog order is the order activities are shown
//! and the order the next-activity selector walks.

use std::collections::HashSet;

use crate::error::JourneyError;
use crate::models::{Activity, Category, DeliveryType, Phase};

#[allow(clippy::too_many_arguments)]
fn activity(
  id: &str,
  phase: Phase,
  category: Category,
  title: &str,
  description: &str,
  duration_minutes: u32,
  points: u32,
  intensity_scale: u8,
  delivery_type_restriction: Option<DeliveryType>,
) -> Activity {
  Activity {
    id: id.to_string(),
    phase,
    category,
    title: title.to_string(),
    description: description.to_string(),
    duration_minutes,
    points,
    intensity_scale,
    delivery_type_restriction,
  }
}

/// The default recovery database, four phases from stabilization to confidence rebuilding
pub fn default_catalog() -> Vec<Activity> {
  vec![
    // Stabilize
    activity(
      "st-1",
      Phase::Stabilize,
      Category::Breathing,
      "Deep Diaphragmatic Breath",
      "Gently expand your belly as you inhale. Essential for internal pressure management.",
      5,
      10,
      1,
      None,
    ),
    activity(
      "st-2",
      Phase::Stabilize,
      Category::Pelvic,
      "Gentle Floor Awareness",
      "Visualization and very light engagement of the pelvic floor.",
      3,
      10,
      1,
      None,
    ),
    activity(
      "st-cs-1",
      Phase::Stabilize,
      Category::Physio,
      "Log Rolling Technique",
      "Safe way to get out of bed without straining incision.",
      2,
      15,
      2,
      Some(DeliveryType::CSection),
    ),
    // Strengthen
    activity(
      "sg-1",
      Phase::Strengthen,
      Category::Pelvic,
      "Timed Kegel Series",
      "Structured holds and releases to build functional strength.",
      5,
      20,
      3,
      None,
    ),
    activity(
      "sg-2",
      Phase::Strengthen,
      Category::Physio,
      "Transverse Abdominal Wake-up",
      "Subtle deep core engagement without crunching.",
      4,
      20,
      4,
      None,
    ),
    // Restore
    activity(
      "rt-1",
      Phase::Restore,
      Category::Walking,
      "Structured Interval Walk",
      "10 min walk with posture focus.",
      10,
      30,
      5,
      None,
    ),
    activity(
      "rt-2",
      Phase::Restore,
      Category::Stretching,
      "Post-Nursing Neck Stretch",
      "Relieve tension from nursing or holding the baby.",
      5,
      15,
      3,
      None,
    ),
    // Rebuild Confidence
    activity(
      "rb-1",
      Phase::RebuildConfidence,
      Category::Physio,
      "Functional Mobility Flow",
      "Gentle full-body movement patterns.",
      15,
      50,
      7,
      None,
    ),
    activity(
      "rb-cp",
      Phase::RebuildConfidence,
      Category::Checkpoint,
      "Diastasis Recti Final Check",
      "Assess core closure before advanced activity.",
      10,
      100,
      2,
      None,
    ),
  ]
}

/// Reject catalogs with duplicate ids or out-of-range intensities
pub fn validate_catalog(catalog: &[Activity]) -> Result<(), JourneyError> {
  let mut seen = HashSet::new();
  for act in catalog {
    if !seen.insert(act.id.as_str()) {
      return Err(JourneyError::DuplicateActivity(act.id.clone()));
    }
    if !(1..=10).contains(&act.intensity_scale) {
      return Err(JourneyError::InvalidIntensity {
        id: act.id.clone(),
        value: act.intensity_scale,
      });
    }
  }
  Ok(())
}

pub fn find_activity<'a>(catalog: &'a [Activity], id: &str) -> Option<&'a Activity> {
  catalog.iter().find(|a| a.id == id)
}
