//! Parent/child and marriage relations between two existing people.
//!
//! Relations are created only by the enrollment workflow or the relationship
//! services, and deleting one never deletes the people it references.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::person::Gender;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// Which relation links a newly enrolled person to the existing anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationKind {
  /// The new person is a child of the anchor.
  Child,
  /// The new person is a spouse of the anchor.
  Spouse,
}

/// Family relation families, used in error details and deletion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationFamily {
  Marriage,
  ParentChild,
}

/// The parental slot a person occupies in a [`ParentChildRelation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParentRole {
  Father,
  Mother,
}

impl ParentRole {
  /// The slot implied by a recorded gender, if any.
  pub fn for_gender(gender: Gender) -> Option<Self> {
    match gender {
      Gender::Male => Some(Self::Father),
      Gender::Female => Some(Self::Mother),
      Gender::Other => None,
    }
  }

  pub fn required_gender(self) -> Gender {
    match self {
      Self::Father => Gender::Male,
      Self::Mother => Gender::Female,
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A child's single parent record, progressively completed.
///
/// At least one of `father_id` / `mother_id` is always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentChildRelation {
  pub child_id:       Uuid,
  pub father_id:      Option<Uuid>,
  pub mother_id:      Option<Uuid>,
  /// Date the relation was established (e.g. birth-certificate date).
  pub established_on: Option<NaiveDate>,
}

impl ParentChildRelation {
  pub fn parent(&self, role: ParentRole) -> Option<Uuid> {
    match role {
      ParentRole::Father => self.father_id,
      ParentRole::Mother => self.mother_id,
    }
  }

  pub fn set_parent(&mut self, role: ParentRole, id: Uuid) {
    match role {
      ParentRole::Father => self.father_id = Some(id),
      ParentRole::Mother => self.mother_id = Some(id),
    }
  }
}

/// A marriage keyed by the `(person_a, person_b)` pair.
///
/// `end_date == None` means the marriage is ongoing ("open").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarriageRelation {
  pub person_a:   Uuid,
  pub person_b:   Uuid,
  pub start_date: NaiveDate,
  pub end_date:   Option<NaiveDate>,
}

impl MarriageRelation {
  pub fn is_open(&self) -> bool { self.end_date.is_none() }

  pub fn involves(&self, person_id: Uuid) -> bool {
    self.person_a == person_id || self.person_b == person_id
  }

  /// Whether this record is for the unordered pair `{x, y}`.
  pub fn is_pair(&self, x: Uuid, y: Uuid) -> bool {
    (self.person_a == x && self.person_b == y)
      || (self.person_a == y && self.person_b == x)
  }

  /// The other partner, if `person_id` is one of the two.
  pub fn spouse_of(&self, person_id: Uuid) -> Option<Uuid> {
    if self.person_a == person_id {
      Some(self.person_b)
    } else if self.person_b == person_id {
      Some(self.person_a)
    } else {
      None
    }
  }
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// Every relation row touching one person, for display.
///
/// Marriages are ordered by start date, parent/child rows by establishment
/// date with undated rows last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSet {
  pub marriages:    Vec<MarriageRelation>,
  pub parent_child: Vec<ParentChildRelation>,
}

/// Identifies a relation row for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationRef {
  Marriage { person_a: Uuid, person_b: Uuid },
  ParentChild { child_id: Uuid },
}

impl RelationRef {
  pub fn family(&self) -> RelationFamily {
    match self {
      Self::Marriage { .. } => RelationFamily::Marriage,
      Self::ParentChild { .. } => RelationFamily::ParentChild,
    }
  }
}
