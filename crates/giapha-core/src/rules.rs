//! Integrity rules — pure validation and derivation, no I/O.
//!
//! Every rule here runs before a write. The store's own constraints catch
//! whatever slips past them in a race.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  person::{Gender, Person},
  relation::{
    MarriageRelation, ParentChildRelation, ParentRole, RelationFamily,
    RelationKind,
  },
};

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Generation of a person attached to `existing` through `kind`.
///
/// Children sit one generation below their parent; spouses share the
/// generation of the existing partner.
pub fn compute_generation(existing: &Person, kind: RelationKind) -> u32 {
  match kind {
    RelationKind::Child => existing.generation.saturating_add(1),
    RelationKind::Spouse => existing.generation,
  }
}

/// The parental slot `parent` fills for a new child.
///
/// An explicitly requested role is validated against the recorded gender;
/// otherwise the role is derived from it.
pub fn parent_slot(
  parent: &Person,
  requested: Option<ParentRole>,
) -> Result<ParentRole> {
  match requested.or_else(|| ParentRole::for_gender(parent.gender)) {
    Some(role) => {
      validate_parent_gender(role, parent)?;
      Ok(role)
    }
    None => Err(Error::InvalidRoleAssignment {
      person_id: parent.person_id,
      role:      ParentRole::Father,
      gender:    parent.gender,
    }),
  }
}

/// Order a couple into `(person_a, person_b)`: the male partner is A; with no
/// male partner the first argument stays A.
pub fn spouse_slots<'a>(
  existing: &'a Person,
  other: &'a Person,
) -> (&'a Person, &'a Person) {
  if other.gender == Gender::Male && existing.gender != Gender::Male {
    (other, existing)
  } else {
    (existing, other)
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

pub fn validate_parent_gender(role: ParentRole, person: &Person) -> Result<()> {
  if person.gender == role.required_gender() {
    Ok(())
  } else {
    Err(Error::InvalidRoleAssignment {
      person_id: person.person_id,
      role,
      gender: person.gender,
    })
  }
}

/// A child must be born strictly after the parent.
pub fn validate_child_birth_order(
  child_born: DateTime<Utc>,
  parent: &Person,
) -> Result<()> {
  if child_born > parent.born_at {
    Ok(())
  } else {
    Err(Error::BirthOrderViolation {
      parent_id: parent.person_id,
      child_born,
      parent_born: parent.born_at,
    })
  }
}

/// The marriage start may not precede person A's calendar date of birth.
pub fn validate_marriage_start(start: NaiveDate, person_a: &Person) -> Result<()> {
  let born_on = person_a.born_at.date_naive();
  if start < born_on {
    return Err(Error::InvalidMarriageDate {
      person_id: person_a.person_id,
      date:      start,
      earliest:  born_on,
    });
  }
  Ok(())
}

pub fn validate_marriage_end(
  person_a: Uuid,
  start: NaiveDate,
  end: NaiveDate,
) -> Result<()> {
  if end < start {
    return Err(Error::InvalidMarriageDate {
      person_id: person_a,
      date:      end,
      earliest:  start,
    });
  }
  Ok(())
}

pub fn validate_death(person: &Person, died_at: DateTime<Utc>) -> Result<()> {
  if died_at <= person.born_at {
    return Err(Error::DeathBeforeBirth {
      person_id: person.person_id,
      died_at,
      born_at: person.born_at,
    });
  }
  Ok(())
}

pub fn validate_distinct(x: Uuid, y: Uuid) -> Result<()> {
  if x == y { Err(Error::SelfRelation(x)) } else { Ok(()) }
}

/// `value` without surrounding whitespace, or `BlankField` if nothing is left.
pub fn require_text(field: &'static str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::BlankField(field))
  } else {
    Ok(trimmed.to_owned())
  }
}

// ─── Duplicate detection ─────────────────────────────────────────────────────

fn same_name(a: &str, b: &str) -> bool { a.trim() == b.trim() }

/// An existing person with the same name, calendar date of birth and gender.
pub fn detect_duplicate_person<'a>(
  candidates: &'a [Person],
  full_name: &str,
  born_at: DateTime<Utc>,
  gender: Gender,
) -> Option<&'a Person> {
  let born_on = born_at.date_naive();
  candidates.iter().find(|p| {
    p.gender == gender
      && p.born_at.date_naive() == born_on
      && same_name(&p.full_name, full_name)
  })
}

/// A child of the same parent with the same name and calendar date of birth.
///
/// `children` are the people already recorded as children of that parent.
pub fn detect_duplicate_child_of_same_parent<'a>(
  children: &'a [Person],
  full_name: &str,
  born_at: DateTime<Utc>,
) -> Option<&'a Person> {
  let born_on = born_at.date_naive();
  children
    .iter()
    .find(|c| c.born_at.date_naive() == born_on && same_name(&c.full_name, full_name))
}

/// The open marriage referencing `person_id` on either side, if any.
pub fn detect_open_marriage(
  marriages: &[MarriageRelation],
  person_id: Uuid,
) -> Option<&MarriageRelation> {
  marriages
    .iter()
    .find(|m| m.is_open() && m.involves(person_id))
}

pub fn ensure_no_open_marriage(
  marriages: &[MarriageRelation],
  person_id: Uuid,
) -> Result<()> {
  match detect_open_marriage(marriages, person_id) {
    Some(m) => Err(Error::OpenMarriage {
      person_id,
      spouse_id: m.spouse_of(person_id),
    }),
    None => Ok(()),
  }
}

// ─── Parent record merge ─────────────────────────────────────────────────────

/// Merge newly supplied parents into a child's parent record.
///
/// Only empty slots are filled. Supplying a different person for an already
/// filled slot is a [`Error::DuplicateRelation`]; supplying the same person
/// is a no-op for that slot.
pub fn merge_parent_record(
  existing: Option<ParentChildRelation>,
  child_id: Uuid,
  father_id: Option<Uuid>,
  mother_id: Option<Uuid>,
  established_on: Option<NaiveDate>,
) -> Result<ParentChildRelation> {
  let mut record = existing.unwrap_or(ParentChildRelation {
    child_id,
    father_id: None,
    mother_id: None,
    established_on: None,
  });

  for (role, supplied) in [
    (ParentRole::Father, father_id),
    (ParentRole::Mother, mother_id),
  ] {
    let Some(id) = supplied else { continue };
    match record.parent(role) {
      None => record.set_parent(role, id),
      Some(current) if current == id => {}
      Some(current) => {
        return Err(Error::DuplicateRelation {
          family:    RelationFamily::ParentChild,
          person_id: child_id,
          other_id:  Some(current),
        });
      }
    }
  }

  if record.established_on.is_none() {
    record.established_on = established_on;
  }

  if record.father_id.is_none() && record.mother_id.is_none() {
    return Err(Error::MissingParent(child_id));
  }

  Ok(record)
}
