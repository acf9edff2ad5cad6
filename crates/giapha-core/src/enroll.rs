//! Enrollment — add a new person together with exactly one relationship to an
//! existing person, as a single atomic unit.
//!
//! Checks run fail-fast in a fixed order, and only then is the store asked to
//! write the person and the relation together. The new person's generation
//! and tree are consequences of the anchor; callers cannot set them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  access::{self, Action},
  account::Caller,
  lookup::LookupKind,
  person::{NewPerson, Person},
  relation::{
    MarriageRelation, ParentChildRelation, ParentRole, RelationFamily,
    RelationKind,
  },
  rules,
  store::{RegistryStore, check_lookup, fetch_person},
};

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollRequest {
  pub person:      NewPerson,
  /// The existing person the new person is related to.
  pub existing_id: Uuid,
  pub kind:        RelationKind,
  /// Birth-certificate date for a child, marriage date for a spouse.
  pub event_date:  NaiveDate,
  /// For a child: the slot the existing person fills. Derived from their
  /// gender when absent.
  #[serde(default)]
  pub parent_role: Option<ParentRole>,
}

/// The single relation row written alongside the new person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "relation", rename_all = "snake_case")]
pub enum EnrollmentLink {
  ParentChild(ParentChildRelation),
  Marriage(MarriageRelation),
}

/// The outcome of a successful enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
  /// The new person as re-read from the store.
  pub person:      Person,
  pub link:        EnrollmentLink,
  /// Human-readable description of the relation established.
  pub description: String,
}

// ─── Workflow ────────────────────────────────────────────────────────────────

pub async fn enroll<S>(
  store: &S,
  caller: &Caller,
  request: EnrollRequest,
) -> Result<Enrollment>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  let existing = fetch_person(store, request.existing_id).await?;
  access::authorize(caller, Action::Create, &existing)?;
  rules::require_text("full_name", &request.person.full_name)?;

  check_lookup(store, LookupKind::Birthplace, request.person.birthplace_id).await?;
  check_lookup(store, LookupKind::Occupation, request.person.occupation_id).await?;

  let generation = rules::compute_generation(&existing, request.kind);

  let (person, link) = match request.kind {
    RelationKind::Child => {
      let role = rules::parent_slot(&existing, request.parent_role)?;

      let siblings = store.children_of(existing.person_id).await?;
      if let Some(dup) = rules::detect_duplicate_child_of_same_parent(
        &siblings,
        &request.person.full_name,
        request.person.born_at,
      ) {
        return Err(Error::DuplicateRelation {
          family:    RelationFamily::ParentChild,
          person_id: dup.person_id,
          other_id:  Some(existing.person_id),
        });
      }

      rules::validate_child_birth_order(request.person.born_at, &existing)?;

      let person = Person::from_new(request.person, generation, existing.tree_id);
      let mut relation = ParentChildRelation {
        child_id:       person.person_id,
        father_id:      None,
        mother_id:      None,
        established_on: Some(request.event_date),
      };
      relation.set_parent(role, existing.person_id);
      (person, EnrollmentLink::ParentChild(relation))
    }

    RelationKind::Spouse => {
      let marriages = store.marriages_of(existing.person_id).await?;
      rules::ensure_no_open_marriage(&marriages, existing.person_id)?;

      let candidates = store
        .find_people_by_name(request.person.full_name.trim().to_owned())
        .await?;
      if let Some(dup) = rules::detect_duplicate_person(
        &candidates,
        &request.person.full_name,
        request.person.born_at,
        request.person.gender,
      ) {
        return Err(Error::DuplicatePerson { existing_id: dup.person_id });
      }

      let person = Person::from_new(request.person, generation, existing.tree_id);
      let (a, b) = rules::spouse_slots(&existing, &person);
      rules::validate_marriage_start(request.event_date, a)?;

      let relation = MarriageRelation {
        person_a:   a.person_id,
        person_b:   b.person_id,
        start_date: request.event_date,
        end_date:   None,
      };
      (person, EnrollmentLink::Marriage(relation))
    }
  };

  let stored = store.insert_enrollment(person, link.clone()).await?;
  let description = describe(&stored, &existing, &link);

  Ok(Enrollment { person: stored, link, description })
}

fn describe(new: &Person, existing: &Person, link: &EnrollmentLink) -> String {
  match link {
    EnrollmentLink::ParentChild(relation) => {
      let role = if relation.father_id == Some(existing.person_id) {
        ParentRole::Father
      } else {
        ParentRole::Mother
      };
      format!(
        "{} recorded as child of {} ({role}), generation {}",
        new.full_name, existing.full_name, new.generation
      )
    }
    EnrollmentLink::Marriage(relation) => format!(
      "{} recorded as spouse of {} since {}",
      new.full_name, existing.full_name, relation.start_date
    ),
  }
}
