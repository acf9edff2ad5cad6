//! Read-only reference lists consumed by the registry.
//!
//! The engine never validates their contents, only that a referenced id
//! exists when one is supplied.

use serde::{Deserialize, Serialize};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LookupKind {
  Birthplace,
  Occupation,
  DeathCause,
  BurialSite,
  AchievementType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupItem {
  pub kind:  LookupKind,
  pub id:    i64,
  pub label: String,
}
