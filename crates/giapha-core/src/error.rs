//! Error types for `giapha-core`.
//!
//! Every variant is recoverable at the request boundary and carries enough
//! detail (ids, dates) to render a precise message.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  access::Action,
  account::Role,
  lookup::LookupKind,
  person::Gender,
  relation::{ParentRole, RelationFamily},
};

#[derive(Debug, Error)]
pub enum Error {
  // ── Not found ─────────────────────────────────────────────────────────
  #[error("person not found: {0}")]
  PersonNotFound(Uuid),

  #[error("tree not found: {0}")]
  TreeNotFound(Uuid),

  #[error("account not found: {0}")]
  AccountNotFound(Uuid),

  #[error("achievement not found: {0}")]
  AchievementNotFound(Uuid),

  #[error("{kind} {id} not found")]
  LookupNotFound { kind: LookupKind, id: i64 },

  // ── Access ────────────────────────────────────────────────────────────
  #[error("account {account_id} may not {action} {}", describe_target(.target))]
  AccessDenied {
    account_id: Uuid,
    action:     Action,
    target:     Option<Uuid>,
  },

  // ── Business rules ────────────────────────────────────────────────────
  #[error("person {person_id} is recorded as {gender} and cannot be the {role}")]
  InvalidRoleAssignment {
    person_id: Uuid,
    role:      ParentRole,
    gender:    Gender,
  },

  #[error(
    "child born {child_born} is not after parent {parent_id} born {parent_born}"
  )]
  BirthOrderViolation {
    parent_id:   Uuid,
    child_born:  DateTime<Utc>,
    parent_born: DateTime<Utc>,
  },

  #[error("marriage date {date} for person {person_id} is before {earliest}")]
  InvalidMarriageDate {
    person_id: Uuid,
    date:      NaiveDate,
    earliest:  NaiveDate,
  },

  #[error("{family} relation already exists for {person_id}{}", describe_other(.other_id))]
  DuplicateRelation {
    family:    RelationFamily,
    person_id: Uuid,
    other_id:  Option<Uuid>,
  },

  #[error(
    "person already exists as {existing_id}; link the existing record instead"
  )]
  DuplicatePerson { existing_id: Uuid },

  #[error("person {person_id} already has an open marriage{}", describe_other(.spouse_id))]
  OpenMarriage {
    person_id: Uuid,
    spouse_id: Option<Uuid>,
  },

  #[error("no {family} relation found for {person_id}{}", describe_other(.other_id))]
  RelationNotFound {
    family:    RelationFamily,
    person_id: Uuid,
    other_id:  Option<Uuid>,
  },

  #[error("account {account_id} cannot move from {from} to {to}")]
  InvalidRoleTransition {
    account_id: Uuid,
    from:       Role,
    to:         Role,
  },

  #[error("parent record for {0} needs a father or a mother")]
  MissingParent(Uuid),

  #[error("person {0} cannot be related to themselves")]
  SelfRelation(Uuid),

  #[error("person {person_id} does not belong to tree {tree_id}")]
  PersonNotInTree { person_id: Uuid, tree_id: Uuid },

  #[error("death at {died_at} for person {person_id} is not after birth at {born_at}")]
  DeathBeforeBirth {
    person_id: Uuid,
    died_at:   DateTime<Utc>,
    born_at:   DateTime<Utc>,
  },

  #[error("account already exists: {0}")]
  DuplicateAccount(String),

  #[error("{0} must not be blank")]
  BlankField(&'static str),

  // ── Store ─────────────────────────────────────────────────────────────
  /// Connection or pool exhaustion; safe to retry unchanged.
  #[error("store temporarily unavailable: {0}")]
  TransientStore(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::PersonNotFound(_)
        | Self::TreeNotFound(_)
        | Self::AccountNotFound(_)
        | Self::AchievementNotFound(_)
        | Self::LookupNotFound { .. }
        | Self::RelationNotFound { .. }
    )
  }

  /// Stable snake_case name of the variant, for wire responses.
  pub fn code(&self) -> &'static str {
    match self {
      Self::PersonNotFound(_) => "person_not_found",
      Self::TreeNotFound(_) => "tree_not_found",
      Self::AccountNotFound(_) => "account_not_found",
      Self::AchievementNotFound(_) => "achievement_not_found",
      Self::LookupNotFound { .. } => "lookup_not_found",
      Self::AccessDenied { .. } => "access_denied",
      Self::InvalidRoleAssignment { .. } => "invalid_role_assignment",
      Self::BirthOrderViolation { .. } => "birth_order_violation",
      Self::InvalidMarriageDate { .. } => "invalid_marriage_date",
      Self::DuplicateRelation { .. } => "duplicate_relation",
      Self::DuplicatePerson { .. } => "duplicate_person",
      Self::OpenMarriage { .. } => "open_marriage",
      Self::RelationNotFound { .. } => "relation_not_found",
      Self::InvalidRoleTransition { .. } => "invalid_role_transition",
      Self::MissingParent(_) => "missing_parent",
      Self::SelfRelation(_) => "self_relation",
      Self::PersonNotInTree { .. } => "person_not_in_tree",
      Self::DeathBeforeBirth { .. } => "death_before_birth",
      Self::DuplicateAccount(_) => "duplicate_account",
      Self::BlankField(_) => "blank_field",
      Self::TransientStore(_) => "transient_store_error",
      Self::Store(_) => "store_error",
    }
  }
}

fn describe_target(target: &Option<Uuid>) -> String {
  match target {
    Some(id) => format!("person {id}"),
    None => "this resource".to_owned(),
  }
}

fn describe_other(other: &Option<Uuid>) -> String {
  other.map(|id| format!(" and {id}")).unwrap_or_default()
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
