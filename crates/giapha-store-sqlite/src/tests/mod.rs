//! Integration tests for `SqliteStore` and the core services running on top
//! of it, against an in-memory database.

mod enrollment;

use chrono::{DateTime, NaiveDate, TimeZone as _, Utc};
use giapha_core::{
  account::{Account, Caller, Role},
  enroll::{self, EnrollRequest},
  person::{Gender, NewPerson, Person},
  relation::RelationKind,
  registry::{self, Registration, RegistrationRequest},
  store::RegistryStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn born(y: i32, m: u32, d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, 8, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_person(name: &str, gender: Gender, born_at: DateTime<Utc>) -> NewPerson {
  NewPerson {
    full_name: name.to_owned(),
    gender,
    born_at,
    address: None,
    birthplace_id: None,
    occupation_id: None,
  }
}

fn admin() -> Caller {
  Caller {
    account_id: Uuid::new_v4(),
    role:       Role::Admin,
    person_id:  None,
    tree_id:    None,
  }
}

/// A freshly registered tree with its founder and the founder's Owner
/// account.
struct Family {
  store:   SqliteStore,
  founder: Person,
  owner:   Caller,
  tree_id: Uuid,
}

async fn family() -> Family {
  let store = store().await;
  let Registration { account, person, tree } = registry::register(
    &store,
    RegistrationRequest {
      login:     "an.nguyen".into(),
      person:    new_person("Nguyễn Văn An", Gender::Male, born(1950, 3, 2)),
      tree_name: "Họ Nguyễn".into(),
    },
  )
  .await
  .unwrap();

  let owner = store.load_caller(account.account_id).await.unwrap().unwrap();
  Family {
    store,
    founder: person,
    owner,
    tree_id: tree.tree_id,
  }
}

/// The founder's son, enrolled by the Owner.
async fn first_son(f: &Family) -> Person {
  child_of(
    &f.store,
    &f.owner,
    &f.founder,
    "Nguyễn Văn Bình",
    Gender::Male,
    born(1972, 1, 1),
  )
  .await
}

/// The founder's wife, married in 1971 and still married.
async fn founders_wife(f: &Family) -> Person {
  spouse_of(
    &f.store,
    &f.owner,
    &f.founder,
    "Lê Thị Hoa",
    Gender::Female,
    born(1952, 8, 8),
    date(1971, 2, 14),
  )
  .await
}

/// Give `person` a `User` account and return it as a caller.
async fn user_for(store: &SqliteStore, person: &Person) -> Caller {
  let account = Account {
    account_id: Uuid::new_v4(),
    login:      format!("user-{}", person.person_id),
    person_id:  Some(person.person_id),
    role:       Role::User,
    created_at: Utc::now(),
  };
  store.insert_account(account.clone()).await.unwrap();
  store.load_caller(account.account_id).await.unwrap().unwrap()
}

/// Enroll `name` as a child of `parent` with the parent's gender-derived
/// role.
async fn child_of(
  store: &SqliteStore,
  caller: &Caller,
  parent: &Person,
  name: &str,
  gender: Gender,
  born_at: DateTime<Utc>,
) -> Person {
  enroll::enroll(
    store,
    caller,
    EnrollRequest {
      person:      new_person(name, gender, born_at),
      existing_id: parent.person_id,
      kind:        RelationKind::Child,
      event_date:  born_at.date_naive(),
      parent_role: None,
    },
  )
  .await
  .unwrap()
  .person
}

/// Enroll `name` as the open-marriage spouse of `partner`.
async fn spouse_of(
  store: &SqliteStore,
  caller: &Caller,
  partner: &Person,
  name: &str,
  gender: Gender,
  born_at: DateTime<Utc>,
  since: NaiveDate,
) -> Person {
  enroll::enroll(
    store,
    caller,
    EnrollRequest {
      person:      new_person(name, gender, born_at),
      existing_id: partner.person_id,
      kind:        RelationKind::Spouse,
      event_date:  since,
      parent_role: None,
    },
  )
  .await
  .unwrap()
  .person
}
