//! Access scope resolution.
//!
//! Every service asks this module before it reads or writes. The caller is an
//! explicit parameter; nothing here consults ambient request state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  account::{Caller, Role},
  person::Person,
};

// ─── Scope ───────────────────────────────────────────────────────────────────

/// What part of the registry a caller can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tree_id", rename_all = "snake_case")]
pub enum Scope {
  /// Admin: no filtering.
  Global,
  /// Owner or User attached to a tree.
  Tree(Uuid),
  /// A tree-scoped role with no tree attached.
  Denied,
}

impl Scope {
  pub fn resolve(caller: &Caller) -> Self {
    match (caller.role, caller.tree_id) {
      (Role::Admin, _) => Self::Global,
      (Role::Owner | Role::User, Some(tree_id)) => Self::Tree(tree_id),
      (Role::Owner | Role::User, None) => Self::Denied,
    }
  }

  /// Whether records of tree `tree_id` are visible in this scope.
  pub fn contains(&self, tree_id: Option<Uuid>) -> bool {
    match self {
      Self::Global => true,
      Self::Tree(own) => tree_id == Some(*own),
      Self::Denied => false,
    }
  }

  /// The tree filter to apply to listings; `None` means unfiltered.
  pub fn tree_filter(&self, caller: &Caller) -> Result<Option<Uuid>> {
    match self {
      Self::Global => Ok(None),
      Self::Tree(tree_id) => Ok(Some(*tree_id)),
      Self::Denied => Err(denied(caller, Action::View, None)),
    }
  }
}

// ─── Actions ─────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
  View,
  Create,
  Update,
  Delete,
  Administer,
}

fn denied(caller: &Caller, action: Action, target: Option<Uuid>) -> Error {
  Error::AccessDenied {
    account_id: caller.account_id,
    action,
    target,
  }
}

/// Whether the role permits `action` on `target`, assuming the target is
/// already known to be inside the caller's scope.
fn role_permits(caller: &Caller, action: Action, target: &Person) -> bool {
  match (caller.role, action) {
    (Role::Admin, _) => true,
    (_, Action::View) => true,
    (Role::Owner, Action::Create | Action::Update | Action::Delete) => true,
    (Role::Owner, Action::Administer) => false,
    (Role::User, Action::Create | Action::Update) => {
      caller.is_self(target.person_id)
    }
    (Role::User, Action::Delete | Action::Administer) => false,
  }
}

// ─── Checks ──────────────────────────────────────────────────────────────────

/// Reject `action` when the caller's role can never perform it, whatever the
/// target. Runs before any target is loaded.
pub fn role_may(caller: &Caller, action: Action) -> Result<()> {
  let possible = match (caller.role, action) {
    (Role::Admin, _) => true,
    (Role::Owner, Action::Administer) => false,
    (Role::Owner, _) => true,
    (Role::User, Action::Delete | Action::Administer) => false,
    (Role::User, _) => true,
  };
  if possible { Ok(()) } else { Err(denied(caller, action, None)) }
}

/// Authorise `action` on a single person.
pub fn authorize(caller: &Caller, action: Action, target: &Person) -> Result<()> {
  let scope = Scope::resolve(caller);
  if scope.contains(target.tree_id) && role_permits(caller, action, target) {
    Ok(())
  } else {
    Err(denied(caller, action, Some(target.person_id)))
  }
}

/// Authorise `action` on a relation touching `people`.
///
/// Every touched person must be visible, and the action must be permitted on
/// at least one of them. A User can therefore change relations that include
/// themselves, and never delete them.
pub fn authorize_relation(
  caller: &Caller,
  action: Action,
  people: &[&Person],
) -> Result<()> {
  role_may(caller, action)?;
  let scope = Scope::resolve(caller);
  if let Some(outside) = people.iter().find(|p| !scope.contains(p.tree_id)) {
    return Err(denied(caller, action, Some(outside.person_id)));
  }
  if people.iter().any(|p| role_permits(caller, action, p)) {
    Ok(())
  } else {
    Err(denied(caller, action, people.first().map(|p| p.person_id)))
  }
}

/// Authorise an administrative action on a whole tree (e.g. changing its
/// head of family): the tree's Owner or an Admin.
pub fn authorize_tree(caller: &Caller, action: Action, tree_id: Uuid) -> Result<()> {
  let scope = Scope::resolve(caller);
  let permitted = match caller.role {
    Role::Admin => true,
    Role::Owner => scope.contains(Some(tree_id)),
    Role::User => action == Action::View && scope.contains(Some(tree_id)),
  };
  if permitted { Ok(()) } else { Err(denied(caller, action, None)) }
}

pub fn require_admin(caller: &Caller) -> Result<()> {
  if caller.role == Role::Admin {
    Ok(())
  } else {
    Err(denied(caller, Action::Administer, None))
  }
}
