//! Registry services outside the relationship engine: self-registration,
//! person maintenance, trees, accounts, achievements and lookups.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  access::{self, Action, Scope},
  account::{Account, Caller, Role, RoleTransition},
  achievement::{Achievement, NewAchievement},
  lookup::{LookupItem, LookupKind},
  person::{DeathRecord, NewPerson, Person, PersonUpdate},
  rules,
  store::{RegistryStore, check_lookup, fetch_person},
  tree::GenealogyTree,
};

// ─── Registration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
  pub login:     String,
  pub person:    NewPerson,
  pub tree_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
  pub account: Account,
  pub person:  Person,
  pub tree:    GenealogyTree,
}

/// Self-registration: a new tree, its founder (generation 0, also head of
/// family) and an Owner account for the founder, written together.
pub async fn register<S>(
  store: &S,
  request: RegistrationRequest,
) -> Result<Registration>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let login = rules::require_text("login", &request.login)?;
  let tree_name = rules::require_text("tree_name", &request.tree_name)?;
  rules::require_text("full_name", &request.person.full_name)?;
  check_lookup(store, LookupKind::Birthplace, request.person.birthplace_id).await?;
  check_lookup(store, LookupKind::Occupation, request.person.occupation_id).await?;

  let tree_id = Uuid::new_v4();
  let person = Person::from_new(request.person, 0, Some(tree_id));
  let now = Utc::now();

  let tree = GenealogyTree {
    tree_id,
    name: tree_name,
    founder_id: Some(person.person_id),
    head_id: Some(person.person_id),
    created_at: now,
  };
  let account = Account {
    account_id: Uuid::new_v4(),
    login,
    person_id:  Some(person.person_id),
    role:       Role::Owner,
    created_at: now,
  };

  store
    .register(tree.clone(), person.clone(), account.clone())
    .await?;
  Ok(Registration { account, person, tree })
}

// ─── People ──────────────────────────────────────────────────────────────────

pub async fn get_person<S>(store: &S, caller: &Caller, id: Uuid) -> Result<Person>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let person = fetch_person(store, id).await?;
  access::authorize(caller, Action::View, &person)?;
  Ok(person)
}

/// Everyone visible to the caller.
pub async fn list_people<S>(store: &S, caller: &Caller) -> Result<Vec<Person>>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let filter = Scope::resolve(caller).tree_filter(caller)?;
  Ok(store.list_people(filter).await?)
}

pub async fn update_person<S>(
  store: &S,
  caller: &Caller,
  id: Uuid,
  update: PersonUpdate,
) -> Result<Person>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let mut person = fetch_person(store, id).await?;
  access::authorize(caller, Action::Update, &person)?;
  if update.is_empty() {
    return Ok(person);
  }
  if let Some(name) = &update.full_name {
    rules::require_text("full_name", name)?;
  }

  check_lookup(store, LookupKind::Birthplace, update.birthplace_id).await?;
  check_lookup(store, LookupKind::Occupation, update.occupation_id).await?;

  update.apply_to(&mut person);
  store.update_person(person.clone()).await?;
  Ok(person)
}

pub async fn record_death<S>(
  store: &S,
  caller: &Caller,
  id: Uuid,
  death: DeathRecord,
) -> Result<Person>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let mut person = fetch_person(store, id).await?;
  access::authorize(caller, Action::Update, &person)?;
  rules::validate_death(&person, death.died_at)?;
  check_lookup(store, LookupKind::DeathCause, death.cause_id).await?;
  check_lookup(store, LookupKind::BurialSite, death.burial_site_id).await?;

  store.set_death(id, death.clone()).await?;
  person.death = Some(death);
  Ok(person)
}

/// Administrative removal of a person from their tree. Generation is kept;
/// relations are untouched.
pub async fn detach_from_tree<S>(
  store: &S,
  caller: &Caller,
  id: Uuid,
) -> Result<Person>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  access::role_may(caller, Action::Delete)?;
  let person = fetch_person(store, id).await?;
  access::authorize(caller, Action::Delete, &person)?;
  if person.tree_id.is_none() {
    return Ok(person);
  }
  Ok(store.detach_person(id).await?)
}

// ─── Trees ───────────────────────────────────────────────────────────────────

pub async fn get_tree<S>(store: &S, caller: &Caller, id: Uuid) -> Result<GenealogyTree>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let tree = store.get_tree(id).await?.ok_or(Error::TreeNotFound(id))?;
  access::authorize_tree(caller, Action::View, id)?;
  Ok(tree)
}

pub async fn list_trees<S>(store: &S, caller: &Caller) -> Result<Vec<GenealogyTree>>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let filter = Scope::resolve(caller).tree_filter(caller)?;
  Ok(store.list_trees(filter).await?)
}

/// Change the head of family. The new head must belong to the tree.
pub async fn set_tree_head<S>(
  store: &S,
  caller: &Caller,
  tree_id: Uuid,
  person_id: Uuid,
) -> Result<GenealogyTree>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let mut tree = store.get_tree(tree_id).await?.ok_or(Error::TreeNotFound(tree_id))?;
  access::authorize_tree(caller, Action::Update, tree_id)?;

  let person = fetch_person(store, person_id).await?;
  let not_in_tree = || Error::PersonNotInTree { person_id, tree_id };
  if person.tree_id != Some(tree_id) {
    return Err(not_in_tree());
  }
  if !store.set_tree_head(tree_id, person_id).await? {
    return Err(not_in_tree());
  }

  tree.head_id = Some(person_id);
  Ok(tree)
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
  pub login:     String,
  pub person_id: Uuid,
}

/// Link a new `User` account to a person. Tree Owners may do this for people
/// in their tree; people outside any tree are Admin-only.
pub async fn create_account<S>(
  store: &S,
  caller: &Caller,
  input: NewAccount,
) -> Result<Account>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let login = rules::require_text("login", &input.login)?;
  let person = fetch_person(store, input.person_id).await?;
  match person.tree_id {
    Some(tree_id) => access::authorize_tree(caller, Action::Create, tree_id)?,
    None => access::require_admin(caller)?,
  }

  let account = Account {
    account_id: Uuid::new_v4(),
    login,
    person_id:  Some(person.person_id),
    role:       Role::User,
    created_at: Utc::now(),
  };
  store.insert_account(account.clone()).await?;
  Ok(account)
}

/// Apply an Admin-driven role transition to `account_id`.
pub async fn change_role<S>(
  store: &S,
  caller: &Caller,
  account_id: Uuid,
  transition: RoleTransition,
) -> Result<Account>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  access::require_admin(caller)?;
  if account_id == caller.account_id {
    return Err(Error::InvalidRoleTransition {
      account_id,
      from: caller.role,
      to:   transition.to_role(),
    });
  }

  let mut account = store
    .get_account(account_id)
    .await?
    .ok_or(Error::AccountNotFound(account_id))?;

  let invalid = |from: Role| Error::InvalidRoleTransition {
    account_id,
    from,
    to: transition.to_role(),
  };
  let to = transition.apply(account.role).ok_or_else(|| invalid(account.role))?;

  if !store.transition_role(account_id, account.role, to).await? {
    return Err(invalid(account.role));
  }
  account.role = to;
  Ok(account)
}

pub async fn promote<S>(store: &S, caller: &Caller, account_id: Uuid) -> Result<Account>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  change_role(store, caller, account_id, RoleTransition::Promote).await
}

pub async fn demote<S>(store: &S, caller: &Caller, account_id: Uuid) -> Result<Account>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  change_role(store, caller, account_id, RoleTransition::Demote).await
}

// ─── Achievements ────────────────────────────────────────────────────────────

pub async fn add_achievement<S>(
  store: &S,
  caller: &Caller,
  person_id: Uuid,
  input: NewAchievement,
) -> Result<Achievement>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let person = fetch_person(store, person_id).await?;
  access::authorize(caller, Action::Update, &person)?;
  check_lookup(store, LookupKind::AchievementType, Some(input.type_id)).await?;

  let achievement = Achievement {
    achievement_id: Uuid::new_v4(),
    person_id,
    type_id: input.type_id,
    achieved_on: input.achieved_on,
    description: input.description,
    recorded_at: Utc::now(),
  };
  store.insert_achievement(achievement.clone()).await?;
  Ok(achievement)
}

pub async fn list_achievements<S>(
  store: &S,
  caller: &Caller,
  person_id: Uuid,
) -> Result<Vec<Achievement>>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let person = fetch_person(store, person_id).await?;
  access::authorize(caller, Action::View, &person)?;
  Ok(store.list_achievements(person_id).await?)
}

pub async fn delete_achievement<S>(
  store: &S,
  caller: &Caller,
  achievement_id: Uuid,
) -> Result<()>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  access::role_may(caller, Action::Delete)?;
  let achievement = store
    .get_achievement(achievement_id)
    .await?
    .ok_or(Error::AchievementNotFound(achievement_id))?;
  let person = fetch_person(store, achievement.person_id).await?;
  access::authorize(caller, Action::Delete, &person)?;

  if !store.delete_achievement(achievement_id).await? {
    return Err(Error::AchievementNotFound(achievement_id));
  }
  Ok(())
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

pub async fn list_lookups<S>(store: &S, kind: LookupKind) -> Result<Vec<LookupItem>>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  Ok(store.list_lookups(kind).await?)
}
