//! Achievements recorded against a person.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
  pub achievement_id: Uuid,
  pub person_id:      Uuid,
  /// Lookup id of kind `achievement_type`.
  pub type_id:        i64,
  pub achieved_on:    NaiveDate,
  pub description:    Option<String>,
  pub recorded_at:    DateTime<Utc>,
}

/// Input to [`crate::registry::add_achievement`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAchievement {
  pub type_id:     i64,
  pub achieved_on: NaiveDate,
  #[serde(default)]
  pub description: Option<String>,
}
