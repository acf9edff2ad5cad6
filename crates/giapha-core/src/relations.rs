//! Relationship services — marriage and parent/child links between people who
//! already exist.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  access::{self, Action},
  account::Caller,
  person::Person,
  relation::{
    MarriageRelation, ParentChildRelation, ParentRole, RelationFamily,
    RelationRef, RelationSet,
  },
  rules,
  store::{RegistryStore, fetch_person},
};

// ─── Marriage ────────────────────────────────────────────────────────────────

/// Record a marriage between `marriage.person_a` and `marriage.person_b`.
///
/// A record with no end date is an open marriage and is refused while either
/// partner already has one.
pub async fn establish_marriage<S>(
  store: &S,
  caller: &Caller,
  marriage: MarriageRelation,
) -> Result<MarriageRelation>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  rules::validate_distinct(marriage.person_a, marriage.person_b)?;
  let a = fetch_person(store, marriage.person_a).await?;
  let b = fetch_person(store, marriage.person_b).await?;
  access::authorize_relation(caller, Action::Create, &[&a, &b])?;

  rules::validate_marriage_start(marriage.start_date, &a)?;
  if let Some(end) = marriage.end_date {
    rules::validate_marriage_end(a.person_id, marriage.start_date, end)?;
  }

  let of_a = store.marriages_of(a.person_id).await?;
  if of_a.iter().any(|m| m.is_pair(a.person_id, b.person_id)) {
    return Err(Error::DuplicateRelation {
      family:    RelationFamily::Marriage,
      person_id: a.person_id,
      other_id:  Some(b.person_id),
    });
  }

  if marriage.is_open() {
    rules::ensure_no_open_marriage(&of_a, a.person_id)?;
    let of_b = store.marriages_of(b.person_id).await?;
    rules::ensure_no_open_marriage(&of_b, b.person_id)?;
  }

  store.insert_marriage(marriage.clone()).await?;
  Ok(marriage)
}

/// Close the open marriage between `x` and `y` (in either order).
pub async fn end_marriage<S>(
  store: &S,
  caller: &Caller,
  x: Uuid,
  y: Uuid,
  end_date: NaiveDate,
) -> Result<MarriageRelation>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let px = fetch_person(store, x).await?;
  let py = fetch_person(store, y).await?;
  access::authorize_relation(caller, Action::Update, &[&px, &py])?;

  let not_found = || Error::RelationNotFound {
    family:    RelationFamily::Marriage,
    person_id: x,
    other_id:  Some(y),
  };

  let mut marriage = store
    .marriages_of(x)
    .await?
    .into_iter()
    .find(|m| m.is_open() && m.is_pair(x, y))
    .ok_or_else(not_found)?;

  rules::validate_marriage_end(marriage.person_a, marriage.start_date, end_date)?;

  if !store.end_marriage(x, y, end_date).await? {
    return Err(not_found());
  }
  marriage.end_date = Some(end_date);
  Ok(marriage)
}

// ─── Parent / child ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentLinkRequest {
  pub child_id:       Uuid,
  #[serde(default)]
  pub father_id:      Option<Uuid>,
  #[serde(default)]
  pub mother_id:      Option<Uuid>,
  #[serde(default)]
  pub established_on: Option<NaiveDate>,
}

/// Create or progressively complete a child's single parent record.
///
/// Empty slots are filled; filled slots are never overwritten.
pub async fn establish_parent_child<S>(
  store: &S,
  caller: &Caller,
  request: ParentLinkRequest,
) -> Result<ParentChildRelation>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  if request.father_id.is_none() && request.mother_id.is_none() {
    return Err(Error::MissingParent(request.child_id));
  }

  let child = fetch_person(store, request.child_id).await?;
  let father = fetch_parent(store, &child, request.father_id).await?;
  let mother = fetch_parent(store, &child, request.mother_id).await?;

  let mut touched = vec![&child];
  touched.extend(father.iter());
  touched.extend(mother.iter());
  access::authorize_relation(caller, Action::Create, &touched)?;

  for (role, parent) in [(ParentRole::Father, &father), (ParentRole::Mother, &mother)] {
    if let Some(parent) = parent {
      rules::validate_parent_gender(role, parent)?;
      rules::validate_child_birth_order(child.born_at, parent)?;
    }
  }

  let previous = store.get_parent_record(child.person_id).await?;
  let merged = rules::merge_parent_record(
    previous.clone(),
    child.person_id,
    request.father_id,
    request.mother_id,
    request.established_on,
  )?;

  if previous.as_ref() != Some(&merged) {
    store.save_parent_record(merged.clone(), previous).await?;
  }
  Ok(merged)
}

async fn fetch_parent<S>(
  store: &S,
  child: &Person,
  parent_id: Option<Uuid>,
) -> Result<Option<Person>>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let Some(id) = parent_id else { return Ok(None) };
  rules::validate_distinct(child.person_id, id)?;
  Ok(Some(fetch_person(store, id).await?))
}

// ─── Deletion & listing ──────────────────────────────────────────────────────

/// Hard-delete a relation row. The people it referenced are untouched.
pub async fn delete_relation<S>(
  store: &S,
  caller: &Caller,
  target: RelationRef,
) -> Result<()>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  access::role_may(caller, Action::Delete)?;
  let deleted = match target {
    RelationRef::Marriage { person_a, person_b } => {
      let a = fetch_person(store, person_a).await?;
      let b = fetch_person(store, person_b).await?;
      access::authorize_relation(caller, Action::Delete, &[&a, &b])?;
      store.delete_marriage(person_a, person_b).await?
    }
    RelationRef::ParentChild { child_id } => {
      let child = fetch_person(store, child_id).await?;
      let mut touched = vec![child];
      if let Some(record) = store.get_parent_record(child_id).await? {
        for id in [record.father_id, record.mother_id].into_iter().flatten() {
          touched.push(fetch_person(store, id).await?);
        }
      }
      let refs: Vec<&Person> = touched.iter().collect();
      access::authorize_relation(caller, Action::Delete, &refs)?;
      store.delete_parent_record(child_id).await?
    }
  };

  if !deleted {
    let (person_id, other_id) = match target {
      RelationRef::Marriage { person_a, person_b } => (person_a, Some(person_b)),
      RelationRef::ParentChild { child_id } => (child_id, None),
    };
    return Err(Error::RelationNotFound {
      family: target.family(),
      person_id,
      other_id,
    });
  }
  Ok(())
}

/// Every marriage and parent/child row touching `person_id`.
pub async fn list_relations_for<S>(
  store: &S,
  caller: &Caller,
  person_id: Uuid,
) -> Result<RelationSet>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let person = fetch_person(store, person_id).await?;
  access::authorize(caller, Action::View, &person)?;
  Ok(store.relations_for(person_id).await?)
}
