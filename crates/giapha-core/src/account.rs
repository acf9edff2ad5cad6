//! Accounts, roles, and the caller identity threaded through every operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Role ────────────────────────────────────────────────────────────────────

/// Account role.
///
/// `User ⇄ Owner` transitions are Admin-driven. `Admin` is terminal and
/// externally seeded; no transition leads into or out of it.
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
pub enum Role {
  Admin,
  Owner,
  User,
}

/// An Admin-driven role change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleTransition {
  Promote,
  Demote,
}

impl RoleTransition {
  /// The single source role this transition applies to.
  pub fn from_role(self) -> Role {
    match self {
      Self::Promote => Role::User,
      Self::Demote => Role::Owner,
    }
  }

  pub fn to_role(self) -> Role {
    match self {
      Self::Promote => Role::Owner,
      Self::Demote => Role::User,
    }
  }

  /// The resulting role, or `None` if the transition is not defined from
  /// `current`.
  pub fn apply(self, current: Role) -> Option<Role> {
    (current == self.from_role()).then(|| self.to_role())
  }
}

// ─── Account ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub account_id: Uuid,
  pub login:      String,
  /// The person this account acts as. Seeded Admin accounts may have none.
  pub person_id:  Option<Uuid>,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
}

// ─── Caller ──────────────────────────────────────────────────────────────────

/// The already-authenticated identity an operation runs on behalf of.
///
/// `tree_id` is inherited from the linked person and is `None` for Admins or
/// for accounts whose person is not attached to any tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub account_id: Uuid,
  pub role:       Role,
  pub person_id:  Option<Uuid>,
  pub tree_id:    Option<Uuid>,
}

impl Caller {
  pub fn is_self(&self, person_id: Uuid) -> bool {
    self.person_id == Some(person_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn transition_table() {
    assert_eq!(RoleTransition::Promote.apply(Role::User), Some(Role::Owner));
    assert_eq!(RoleTransition::Demote.apply(Role::Owner), Some(Role::User));
    assert_eq!(RoleTransition::Promote.apply(Role::Owner), None);
    assert_eq!(RoleTransition::Demote.apply(Role::User), None);
    assert_eq!(RoleTransition::Promote.apply(Role::Admin), None);
    assert_eq!(RoleTransition::Demote.apply(Role::Admin), None);
  }

  #[test]
  fn role_string_forms() {
    assert_eq!(Role::Owner.as_ref(), "owner");
    assert_eq!("user".parse::<Role>().unwrap(), Role::User);
    assert!("superuser".parse::<Role>().is_err());
  }
}
