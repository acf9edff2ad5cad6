//! Person — a member of the registry, optionally attached to one tree.
//!
//! Generation and tree membership are derived from the relationship a person
//! was enrolled through. They are never accepted from callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Recorded gender. Parental slots and spouse ordering depend on it.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
  Other,
}

// ─── Death ───────────────────────────────────────────────────────────────────

/// Death fields. A person is deceased exactly when this record is present,
/// so the "death timestamp is set" invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
  pub died_at:        DateTime<Utc>,
  /// Lookup id of kind `death_cause`.
  pub cause_id:       Option<i64>,
  /// Lookup id of kind `burial_site`.
  pub burial_site_id: Option<i64>,
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:     Uuid,
  pub full_name:     String,
  pub gender:        Gender,
  pub born_at:       DateTime<Utc>,
  pub address:       Option<String>,
  /// Lookup id of kind `birthplace`.
  pub birthplace_id: Option<i64>,
  /// Lookup id of kind `occupation`.
  pub occupation_id: Option<i64>,
  /// Depth within the tree; the founder is generation 0.
  pub generation:    u32,
  /// `None` means the person is not attached to any tree.
  pub tree_id:       Option<Uuid>,
  pub death:         Option<DeathRecord>,
  pub created_at:    DateTime<Utc>,
}

impl Person {
  pub fn is_living(&self) -> bool { self.death.is_none() }

  /// Build a freshly-identified person from caller input plus the derived
  /// placement (generation and tree).
  pub fn from_new(
    input: NewPerson,
    generation: u32,
    tree_id: Option<Uuid>,
  ) -> Self {
    Self {
      person_id: Uuid::new_v4(),
      full_name: input.full_name.trim().to_owned(),
      gender: input.gender,
      born_at: input.born_at,
      address: input.address,
      birthplace_id: input.birthplace_id,
      occupation_id: input.occupation_id,
      generation,
      tree_id,
      death: None,
      created_at: Utc::now(),
    }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Caller-supplied attributes of a person being added to the registry.
///
/// There is deliberately no generation or tree field: both are consequences
/// of where the person is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub full_name:     String,
  pub gender:        Gender,
  pub born_at:       DateTime<Utc>,
  #[serde(default)]
  pub address:       Option<String>,
  #[serde(default)]
  pub birthplace_id: Option<i64>,
  #[serde(default)]
  pub occupation_id: Option<i64>,
}

/// Editable descriptive fields. `None` leaves a field unchanged.
///
/// Gender and birth timestamp are identity fields that other invariants
/// (parental slots, birth order) were validated against, so they are absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonUpdate {
  pub full_name:     Option<String>,
  pub address:       Option<String>,
  pub birthplace_id: Option<i64>,
  pub occupation_id: Option<i64>,
}

impl PersonUpdate {
  pub fn is_empty(&self) -> bool {
    self.full_name.is_none()
      && self.address.is_none()
      && self.birthplace_id.is_none()
      && self.occupation_id.is_none()
  }

  /// Apply the set fields onto `person`.
  pub fn apply_to(self, person: &mut Person) {
    if let Some(name) = self.full_name {
      person.full_name = name.trim().to_owned();
    }
    if let Some(address) = self.address {
      person.address = Some(address);
    }
    if let Some(id) = self.birthplace_id {
      person.birthplace_id = Some(id);
    }
    if let Some(id) = self.occupation_id {
      person.occupation_id = Some(id);
    }
  }
}
