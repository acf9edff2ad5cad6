//! Enrollment of a new person with exactly one relation to an existing one.

use giapha_core::{
  Error as CoreError,
  enroll::{Enrollment, EnrollmentLink},
  lookup::LookupKind,
  relation::{ParentRole, RelationFamily},
};

use super::*;

fn child_request(
  anchor: &Person,
  name: &str,
  gender: Gender,
  born_at: DateTime<Utc>,
) -> EnrollRequest {
  EnrollRequest {
    person:      new_person(name, gender, born_at),
    existing_id: anchor.person_id,
    kind:        RelationKind::Child,
    event_date:  born_at.date_naive(),
    parent_role: None,
  }
}

fn spouse_request(
  anchor: &Person,
  name: &str,
  gender: Gender,
  born_at: DateTime<Utc>,
  since: NaiveDate,
) -> EnrollRequest {
  EnrollRequest {
    person:      new_person(name, gender, born_at),
    existing_id: anchor.person_id,
    kind:        RelationKind::Spouse,
    event_date:  since,
    parent_role: None,
  }
}

async fn daughter_of_founder(f: &Family) -> Person {
  child_of(
    &f.store,
    &f.owner,
    &f.founder,
    "Nguyễn Thị Lan",
    Gender::Female,
    born(1975, 6, 1),
  )
  .await
}

// ─── Child ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn child_is_one_generation_below_and_in_the_same_tree() {
  let f = family().await;
  let son = first_son(&f).await;
  let grandson = child_of(
    &f.store,
    &f.owner,
    &son,
    "Nguyễn Văn Cường",
    Gender::Male,
    born(1995, 4, 30),
  )
  .await;
  assert_eq!(grandson.generation, 2);

  let Enrollment { person, link, description } = enroll::enroll(
    &f.store,
    &f.owner,
    child_request(&grandson, "Nguyễn Minh Đức", Gender::Male, born(2020, 9, 2)),
  )
  .await
  .unwrap();

  assert_eq!(person.generation, 3);
  assert_eq!(person.tree_id, Some(f.tree_id));
  let EnrollmentLink::ParentChild(record) = link else {
    panic!("expected a parent/child link");
  };
  assert_eq!(record.child_id, person.person_id);
  assert_eq!(record.father_id, Some(grandson.person_id));
  assert_eq!(record.mother_id, None);
  assert_eq!(record.established_on, Some(date(2020, 9, 2)));
  assert!(description.contains("child of Nguyễn Văn Cường"));
  assert!(description.contains("generation 3"));

  let stored = f.store.get_parent_record(person.person_id).await.unwrap();
  assert_eq!(stored, Some(record));
}

#[tokio::test]
async fn mother_slot_is_derived_from_a_female_anchor() {
  let f = family().await;
  let daughter = daughter_of_founder(&f).await;
  let grandchild = child_of(
    &f.store,
    &f.owner,
    &daughter,
    "Trần Thị Ngọc",
    Gender::Female,
    born(2000, 1, 1),
  )
  .await;

  let record = f
    .store
    .get_parent_record(grandchild.person_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(record.mother_id, Some(daughter.person_id));
  assert_eq!(record.father_id, None);
}

#[tokio::test]
async fn anchor_of_other_gender_needs_a_role() {
  let f = family().await;
  let other = child_of(
    &f.store,
    &f.owner,
    &f.founder,
    "Nguyễn Hạ",
    Gender::Other,
    born(1975, 6, 1),
  )
  .await;

  let err = enroll::enroll(
    &f.store,
    &f.owner,
    child_request(&other, "Nguyễn Thu", Gender::Female, born(2001, 1, 1)),
  )
  .await
  .unwrap_err();
  assert!(matches!(
    err,
    CoreError::InvalidRoleAssignment { person_id, .. } if person_id == other.person_id
  ));
}

#[tokio::test]
async fn requested_role_must_match_gender() {
  let f = family().await;
  let mut request =
    child_request(&f.founder, "Nguyễn Văn Bình", Gender::Male, born(1972, 1, 1));
  request.parent_role = Some(ParentRole::Mother);

  let err = enroll::enroll(&f.store, &f.owner, request).await.unwrap_err();
  assert!(matches!(
    err,
    CoreError::InvalidRoleAssignment {
      role: ParentRole::Mother,
      gender: Gender::Male,
      ..
    }
  ));
  assert!(
    f.store
      .find_people_by_name("Nguyễn Văn Bình".into())
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn child_born_before_parent_is_refused() {
  let f = family().await;
  let err = enroll::enroll(
    &f.store,
    &f.owner,
    child_request(&f.founder, "Nguyễn Văn Xưa", Gender::Male, born(1949, 1, 1)),
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err,
    CoreError::BirthOrderViolation { parent_id, .. } if parent_id == f.founder.person_id
  ));
  assert!(
    f.store
      .find_people_by_name("Nguyễn Văn Xưa".into())
      .await
      .unwrap()
      .is_empty()
  );
}

#[tokio::test]
async fn same_child_twice_is_a_duplicate_relation() {
  let f = family().await;
  let first = first_son(&f).await;

  let err = enroll::enroll(
    &f.store,
    &f.owner,
    child_request(&f.founder, " Nguyễn Văn Bình ", Gender::Male, born(1972, 1, 1)),
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err,
    CoreError::DuplicateRelation {
      family: RelationFamily::ParentChild,
      person_id,
      ..
    } if person_id == first.person_id
  ));
  assert_eq!(
    f.store.children_of(f.founder.person_id).await.unwrap().len(),
    1
  );
}

#[tokio::test]
async fn blank_name_is_refused() {
  let f = family().await;
  let err = enroll::enroll(
    &f.store,
    &f.owner,
    child_request(&f.founder, "  ", Gender::Male, born(1972, 1, 1)),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, CoreError::BlankField("full_name")));
  assert!(
    f.store
      .children_of(f.founder.person_id)
      .await
      .unwrap()
      .is_empty()
  );
}

// ─── Spouse ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn spouse_shares_generation_and_opens_a_marriage() {
  let f = family().await;
  let Enrollment { person, link, description } = enroll::enroll(
    &f.store,
    &f.owner,
    spouse_request(
      &f.founder,
      "Lê Thị Hoa",
      Gender::Female,
      born(1952, 8, 8),
      date(1971, 2, 14),
    ),
  )
  .await
  .unwrap();

  assert_eq!(person.generation, f.founder.generation);
  assert_eq!(person.tree_id, Some(f.tree_id));
  let EnrollmentLink::Marriage(m) = link else {
    panic!("expected a marriage link");
  };
  assert_eq!(m.person_a, f.founder.person_id);
  assert_eq!(m.person_b, person.person_id);
  assert_eq!(m.start_date, date(1971, 2, 14));
  assert!(m.is_open());
  assert!(description.contains("spouse of Nguyễn Văn An"));

  assert_eq!(
    f.store.marriages_of(person.person_id).await.unwrap(),
    vec![m]
  );
}

#[tokio::test]
async fn male_spouse_takes_the_first_slot() {
  let f = family().await;
  let daughter = daughter_of_founder(&f).await;

  let husband = spouse_of(
    &f.store,
    &f.owner,
    &daughter,
    "Trần Văn Hùng",
    Gender::Male,
    born(1973, 3, 3),
    date(1998, 5, 5),
  )
  .await;
  let marriages = f.store.marriages_of(daughter.person_id).await.unwrap();
  assert_eq!(marriages[0].person_a, husband.person_id);
  assert_eq!(marriages[0].person_b, daughter.person_id);
  assert_eq!(husband.generation, daughter.generation);
}

#[tokio::test]
async fn anchor_with_open_marriage_refuses_another_spouse() {
  let f = family().await;
  let wife = founders_wife(&f).await;

  let err = enroll::enroll(
    &f.store,
    &f.owner,
    spouse_request(
      &f.founder,
      "Phạm Thị Mai",
      Gender::Female,
      born(1955, 1, 1),
      date(1990, 1, 1),
    ),
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err,
    CoreError::OpenMarriage { person_id, spouse_id: Some(s) }
      if person_id == f.founder.person_id && s == wife.person_id
  ));
  assert!(
    f.store
      .find_people_by_name("Phạm Thị Mai".into())
      .await
      .unwrap()
      .is_empty()
  );
  assert_eq!(
    f.store.marriages_of(f.founder.person_id).await.unwrap().len(),
    1
  );
}

#[tokio::test]
async fn ended_marriage_allows_a_new_spouse() {
  let f = family().await;
  let wife = founders_wife(&f).await;
  f.store
    .end_marriage(f.founder.person_id, wife.person_id, date(1985, 1, 1))
    .await
    .unwrap();

  spouse_of(
    &f.store,
    &f.owner,
    &f.founder,
    "Phạm Thị Mai",
    Gender::Female,
    born(1955, 1, 1),
    date(1990, 1, 1),
  )
  .await;
  assert_eq!(
    f.store.marriages_of(f.founder.person_id).await.unwrap().len(),
    2
  );
}

#[tokio::test]
async fn spouse_matching_an_existing_person_is_a_duplicate() {
  let f = family().await;
  let existing = registry::register(
    &f.store,
    RegistrationRequest {
      login:     "hoa.le".into(),
      person:    new_person("Lê Thị Hoa", Gender::Female, born(1952, 8, 8)),
      tree_name: "Họ Lê".into(),
    },
  )
  .await
  .unwrap();

  let err = enroll::enroll(
    &f.store,
    &f.owner,
    spouse_request(
      &f.founder,
      "Lê Thị Hoa",
      Gender::Female,
      born(1952, 8, 8),
      date(1971, 2, 14),
    ),
  )
  .await
  .unwrap_err();
  assert!(matches!(
    err,
    CoreError::DuplicatePerson { existing_id } if existing_id == existing.person.person_id
  ));
}

#[tokio::test]
async fn marriage_before_birth_of_first_partner_is_refused() {
  let f = family().await;
  let err = enroll::enroll(
    &f.store,
    &f.owner,
    spouse_request(
      &f.founder,
      "Lê Thị Hoa",
      Gender::Female,
      born(1952, 8, 8),
      date(1949, 12, 31),
    ),
  )
  .await
  .unwrap_err();

  assert!(matches!(
    err,
    CoreError::InvalidMarriageDate { person_id, earliest, .. }
      if person_id == f.founder.person_id && earliest == date(1950, 3, 2)
  ));
}

// ─── Access & lookups ────────────────────────────────────────────────────────

#[tokio::test]
async fn user_may_enroll_only_relatives_of_themselves() {
  let f = family().await;
  let son = first_son(&f).await;
  let caller = user_for(&f.store, &son).await;

  let own = child_of(
    &f.store,
    &caller,
    &son,
    "Nguyễn Văn Cường",
    Gender::Male,
    born(1995, 4, 30),
  )
  .await;
  assert_eq!(own.generation, 2);

  let err = enroll::enroll(
    &f.store,
    &caller,
    child_request(&f.founder, "Nguyễn Thị Lan", Gender::Female, born(1975, 6, 1)),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, CoreError::AccessDenied { .. }));
}

#[tokio::test]
async fn owner_of_another_tree_cannot_enroll_here() {
  let f = family().await;
  let other = registry::register(
    &f.store,
    RegistrationRequest {
      login:     "bao.tran".into(),
      person:    new_person("Trần Văn Bảo", Gender::Male, born(1960, 5, 5)),
      tree_name: "Họ Trần".into(),
    },
  )
  .await
  .unwrap();
  let stranger = f
    .store
    .load_caller(other.account.account_id)
    .await
    .unwrap()
    .unwrap();

  let err = enroll::enroll(
    &f.store,
    &stranger,
    child_request(&f.founder, "Nguyễn Văn Bình", Gender::Male, born(1972, 1, 1)),
  )
  .await
  .unwrap_err();
  assert!(matches!(
    err,
    CoreError::AccessDenied { target: Some(t), .. } if t == f.founder.person_id
  ));

  // Admins see every tree.
  child_of(
    &f.store,
    &admin(),
    &f.founder,
    "Nguyễn Văn Bình",
    Gender::Male,
    born(1972, 1, 1),
  )
  .await;
}

#[tokio::test]
async fn unknown_birthplace_is_refused() {
  let f = family().await;
  let hue = f
    .store
    .add_lookup(LookupKind::Birthplace, "Huế".into())
    .await
    .unwrap();

  let mut request =
    child_request(&f.founder, "Nguyễn Văn Bình", Gender::Male, born(1972, 1, 1));
  request.person.birthplace_id = Some(hue.id + 100);
  let err = enroll::enroll(&f.store, &f.owner, request.clone())
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    CoreError::LookupNotFound { kind: LookupKind::Birthplace, .. }
  ));

  request.person.birthplace_id = Some(hue.id);
  let enrolled = enroll::enroll(&f.store, &f.owner, request).await.unwrap();
  assert_eq!(enrolled.person.birthplace_id, Some(hue.id));
}

#[tokio::test]
async fn missing_anchor_is_not_found() {
  let f = family().await;
  let ghost = Person::from_new(
    new_person("Vô Danh", Gender::Male, born(1900, 1, 1)),
    0,
    None,
  );
  let err = enroll::enroll(
    &f.store,
    &f.owner,
    child_request(&ghost, "Nguyễn Văn Bình", Gender::Male, born(1972, 1, 1)),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, CoreError::PersonNotFound(id) if id == ghost.person_id));
}
