//! The `RegistryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `giapha-store-sqlite`).
//! The services in this crate and the HTTP layer depend on this abstraction,
//! not on any concrete backend.
//!
//! Methods that write more than one row are atomic. Backends enforce marriage
//! pair uniqueness, open-marriage exclusivity and one parent record per child
//! as hard constraints, reporting violations as the matching [`crate::Error`]
//! variants.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Error, Result,
  account::{Account, Caller, Role},
  achievement::Achievement,
  enroll::EnrollmentLink,
  lookup::{LookupItem, LookupKind},
  person::{DeathRecord, Person},
  relation::{MarriageRelation, ParentChildRelation, RelationSet},
  tree::GenealogyTree,
};

/// Abstraction over a registry storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List people, restricted to one tree when `tree_id` is set.
  fn list_people(
    &self,
    tree_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Every person recorded under exactly `full_name`, across all trees.
  fn find_people_by_name(
    &self,
    full_name: String,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// People whose parent record names `parent_id` as father or mother.
  fn children_of(
    &self,
    parent_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Persist the descriptive fields of `person`. Generation, tree and death
  /// fields are not written.
  fn update_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn set_death(
    &self,
    person_id: Uuid,
    death: DeathRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Reset the person's tree to none and, atomically, clear any tree head
  /// that pointed at them. Returns the updated person.
  fn detach_person(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── Atomic multi-row writes ───────────────────────────────────────────

  /// Insert a tree, its founding person and the person's account together.
  fn register(
    &self,
    tree: GenealogyTree,
    person: Person,
    account: Account,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert a new person together with the one relation linking them to an
  /// existing person, then re-read the person. Either both rows persist or
  /// neither does.
  fn insert_enrollment(
    &self,
    person: Person,
    link: EnrollmentLink,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  // ── Marriages ─────────────────────────────────────────────────────────

  /// Every marriage record referencing `person_id` on either side.
  fn marriages_of(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<MarriageRelation>, Self::Error>> + Send + '_;

  fn insert_marriage(
    &self,
    marriage: MarriageRelation,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Close the open marriage of the unordered pair. Returns `false` if no
  /// open record exists.
  fn end_marriage(
    &self,
    x: Uuid,
    y: Uuid,
    end_date: NaiveDate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if the unordered pair has no record.
  fn delete_marriage(
    &self,
    x: Uuid,
    y: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Parent records ────────────────────────────────────────────────────

  fn get_parent_record(
    &self,
    child_id: Uuid,
  ) -> impl Future<Output = Result<Option<ParentChildRelation>, Self::Error>> + Send + '_;

  /// Insert or replace the child's parent record.
  ///
  /// `previous` is the record the caller merged into; the write fails with
  /// a duplicate-relation error if the stored row no longer matches it.
  fn save_parent_record(
    &self,
    record: ParentChildRelation,
    previous: Option<ParentChildRelation>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Returns `false` if the child has no parent record.
  fn delete_parent_record(
    &self,
    child_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn relations_for(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<RelationSet, Self::Error>> + Send + '_;

  // ── Trees ─────────────────────────────────────────────────────────────

  fn get_tree(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<GenealogyTree>, Self::Error>> + Send + '_;

  fn list_trees(
    &self,
    tree_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<GenealogyTree>, Self::Error>> + Send + '_;

  /// Set the head of family. Returns `false` unless the person currently
  /// belongs to the tree.
  fn set_tree_head(
    &self,
    tree_id: Uuid,
    person_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Resolve an account into a caller identity, inheriting the tree of the
  /// linked person.
  fn load_caller(
    &self,
    account_id: Uuid,
  ) -> impl Future<Output = Result<Option<Caller>, Self::Error>> + Send + '_;

  fn insert_account(
    &self,
    account: Account,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Compare-and-set the role. Returns `false` if the stored role is not
  /// `from`.
  fn transition_role(
    &self,
    account_id: Uuid,
    from: Role,
    to: Role,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Achievements ──────────────────────────────────────────────────────

  fn insert_achievement(
    &self,
    achievement: Achievement,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_achievement(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Achievement>, Self::Error>> + Send + '_;

  fn list_achievements(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Achievement>, Self::Error>> + Send + '_;

  fn delete_achievement(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Lookups ───────────────────────────────────────────────────────────

  fn add_lookup(
    &self,
    kind: LookupKind,
    label: String,
  ) -> impl Future<Output = Result<LookupItem, Self::Error>> + Send + '_;

  fn lookup_exists(
    &self,
    kind: LookupKind,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_lookups(
    &self,
    kind: LookupKind,
  ) -> impl Future<Output = Result<Vec<LookupItem>, Self::Error>> + Send + '_;
}

// ─── Shared fetch helpers ────────────────────────────────────────────────────

pub(crate) async fn fetch_person<S>(store: &S, id: Uuid) -> Result<Person>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  store.get_person(id).await?.ok_or(Error::PersonNotFound(id))
}

/// Check that an optional lookup reference points at an existing item.
pub(crate) async fn check_lookup<S>(
  store: &S,
  kind: LookupKind,
  id: Option<i64>,
) -> Result<()>
where
  S: RegistryStore,
  Error: From<S::Error>,
{
  match id {
    Some(id) if !store.lookup_exists(kind, id).await? => {
      Err(Error::LookupNotFound { kind, id })
    }
    _ => Ok(()),
  }
}
