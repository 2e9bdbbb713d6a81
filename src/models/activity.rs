use serde::{Deserialize, Serialize};

use crate::error::JourneyError;

/// Ordered recovery phases, earliest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Phase {
  #[default]
  Stabilize,
  Strengthen,
  Restore,
  #[serde(rename = "Rebuild Confidence")]
  RebuildConfidence,
}

impl Phase {
  pub const ALL: [Phase; 4] = [
    Phase::Stabilize,
    Phase::Strengthen,
    Phase::Restore,
    Phase::RebuildConfidence,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Phase::Stabilize => "Stabilize",
      Phase::Strengthen => "Strengthen",
      Phase::Restore => "Restore",
      Phase::RebuildConfidence => "Rebuild Confidence",
    }
  }

  /// The phase after this one in `Phase::ALL`, if any
  pub fn next(&self) -> Option<Phase> {
    let idx = Phase::ALL.iter().position(|p| p == self)?;
    Phase::ALL.get(idx + 1).copied()
  }
}

impl std::fmt::Display for Phase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Phase {
  type Err = JourneyError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Phase::ALL
      .iter()
      .find(|p| p.as_str() == s)
      .copied()
      .ok_or_else(|| JourneyError::InvalidPhase(s.to_string()))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Breathing,
  Pelvic,
  Walking,
  Physio,
  Checkpoint,
  Stretching,
}

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Breathing => "breathing",
      Category::Pelvic => "pelvic",
      Category::Walking => "walking",
      Category::Physio => "physio",
      Category::Checkpoint => "checkpoint",
      Category::Stretching => "stretching",
    }
  }
}

impl std::str::FromStr for Category {
  type Err = JourneyError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "breathing" => Ok(Self::Breathing),
      "pelvic" => Ok(Self::Pelvic),
      "walking" => Ok(Self::Walking),
      "physio" => Ok(Self::Physio),
      "checkpoint" => Ok(Self::Checkpoint),
      "stretching" => Ok(Self::Stretching),
      _ => Err(JourneyError::InvalidCategory(s.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum DeliveryType {
  #[default]
  #[serde(rename = "normal")]
  Normal,
  #[serde(rename = "c-section")]
  CSection,
}

impl DeliveryType {
  pub fn as_str(&self) -> &'static str {
    match self {
      DeliveryType::Normal => "normal",
      DeliveryType::CSection => "c-section",
    }
  }
}

impl std::fmt::Display for DeliveryType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for DeliveryType {
  type Err = JourneyError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "normal" => Ok(Self::Normal),
      "c-section" => Ok(Self::CSection),
      _ => Err(JourneyError::InvalidDeliveryType(s.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Pace {
  /// Intensity capped at 5, breathing work always allowed
  #[default]
  Gentle,
  Moderate,
}

impl Pace {
  pub fn as_str(&self) -> &'static str {
    match self {
      Pace::Gentle => "gentle",
      Pace::Moderate => "moderate",
    }
  }
}

impl std::fmt::Display for Pace {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Pace {
  type Err = JourneyError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "gentle" => Ok(Self::Gentle),
      "moderate" => Ok(Self::Moderate),
      _ => Err(JourneyError::InvalidPace(s.to_string())),
    }
  }
}

/// A catalog-defined recovery activity. Immutable at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
  pub id: String,
  pub phase: Phase,
  pub category: Category,
  pub title: String,
  pub description: String,
  pub duration_minutes: u32,
  pub points: u32,
  /// Subjective exertion, 1-10
  pub intensity_scale: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub delivery_type_restriction: Option<DeliveryType>,
}

impl Activity {
  pub fn is_breathing(&self) -> bool {
    self.category == Category::Breathing
  }
}
