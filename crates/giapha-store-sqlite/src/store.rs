//! [`SqliteStore`] — the SQLite implementation of [`RegistryStore`].

use std::{path::Path, time::Duration};

use chrono::NaiveDate;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use giapha_core::{
  account::{Account, Caller, Role},
  achievement::Achievement,
  enroll::EnrollmentLink,
  lookup::{LookupItem, LookupKind},
  person::{DeathRecord, Person},
  relation::{MarriageRelation, ParentChildRelation, RelationSet},
  store::RegistryStore,
  tree::GenealogyTree,
};

use crate::{
  Error, Result,
  encode::{
    ACCOUNT_COLUMNS, ACHIEVEMENT_COLUMNS, AccountRow, AchievementRow, MarriageRow,
    PERSON_COLUMNS, ParentRecordRow, PersonRow, TREE_COLUMNS, TreeRow, decode_role,
    decode_uuid, encode_date, encode_dt, encode_lookup_kind, encode_uuid,
    lookup_item,
  },
  error::Constraint,
  schema::SCHEMA,
};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Gia Phả registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are serialised on the connection's thread; a caller that cannot acquire
/// the database within the busy timeout gets a transient error.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(busy_timeout).await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(DEFAULT_BUSY_TIMEOUT).await?;
    Ok(store)
  }

  async fn init_schema(&self, busy_timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_people(
    &self,
    filter: &'static str,
    param: Option<String>,
  ) -> Result<Vec<Person>> {
    let rows: Vec<PersonRow> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PERSON_COLUMNS} FROM persons {filter}
           ORDER BY generation, born_at, full_name"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], PersonRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], PersonRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(PersonRow::into_person).collect()
  }
}

fn select_person(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<PersonRow>> {
  conn
    .query_row(
      &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE person_id = ?1"),
      rusqlite::params![id],
      PersonRow::from_row,
    )
    .optional()
}

fn insert_person(conn: &rusqlite::Connection, row: &PersonRow) -> rusqlite::Result<()> {
  conn.execute(
    &format!(
      "INSERT INTO persons ({PERSON_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
    ),
    rusqlite::params![
      row.person_id,
      row.full_name,
      row.gender,
      row.born_at,
      row.address,
      row.birthplace_id,
      row.occupation_id,
      row.generation,
      row.tree_id,
      row.died_at,
      row.death_cause_id,
      row.burial_site_id,
      row.created_at,
    ],
  )?;
  Ok(())
}

fn insert_marriage_row(
  conn: &rusqlite::Connection,
  row: &MarriageRow,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO marriages (person_a, person_b, start_date, end_date)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![row.person_a, row.person_b, row.start_date, row.end_date],
  )?;
  Ok(())
}

fn insert_parent_row(
  conn: &rusqlite::Connection,
  row: &ParentRecordRow,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO parent_child (child_id, father_id, mother_id, established_on)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![row.child_id, row.father_id, row.mother_id, row.established_on],
  )?;
  Ok(())
}

fn insert_account_row(
  conn: &rusqlite::Connection,
  row: &AccountRow,
) -> rusqlite::Result<()> {
  conn.execute(
    &format!("INSERT INTO accounts ({ACCOUNT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
    rusqlite::params![row.account_id, row.login, row.person_id, row.role, row.created_at],
  )?;
  Ok(())
}

fn not_found(id: Uuid) -> Error { giapha_core::Error::PersonNotFound(id).into() }

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);
    let row = self
      .conn
      .call(move |conn| Ok(select_person(conn, &id_str)?))
      .await?;
    row.map(PersonRow::into_person).transpose()
  }

  async fn list_people(&self, tree_id: Option<Uuid>) -> Result<Vec<Person>> {
    match tree_id {
      Some(t) => {
        self
          .query_people("WHERE tree_id = ?1", Some(encode_uuid(t)))
          .await
      }
      None => self.query_people("", None).await,
    }
  }

  async fn find_people_by_name(&self, full_name: String) -> Result<Vec<Person>> {
    self
      .query_people("WHERE full_name = ?1", Some(full_name.trim().to_owned()))
      .await
  }

  async fn children_of(&self, parent_id: Uuid) -> Result<Vec<Person>> {
    self
      .query_people(
        "WHERE person_id IN (
           SELECT child_id FROM parent_child WHERE father_id = ?1 OR mother_id = ?1
         )",
        Some(encode_uuid(parent_id)),
      )
      .await
  }

  async fn update_person(&self, person: Person) -> Result<()> {
    let id = person.person_id;
    let row = PersonRow::from_person(&person);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons
              SET full_name = ?2, address = ?3, birthplace_id = ?4, occupation_id = ?5
            WHERE person_id = ?1",
          rusqlite::params![
            row.person_id,
            row.full_name,
            row.address,
            row.birthplace_id,
            row.occupation_id,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(not_found(id));
    }
    Ok(())
  }

  async fn set_death(&self, person_id: Uuid, death: DeathRecord) -> Result<()> {
    let id_str = encode_uuid(person_id);
    let died_at = encode_dt(death.died_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons
              SET died_at = ?2, death_cause_id = ?3, burial_site_id = ?4
            WHERE person_id = ?1",
          rusqlite::params![id_str, died_at, death.cause_id, death.burial_site_id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(not_found(person_id));
    }
    Ok(())
  }

  async fn detach_person(&self, person_id: Uuid) -> Result<Person> {
    let id_str = encode_uuid(person_id);

    let row = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE persons SET tree_id = NULL WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        tx.execute(
          "UPDATE trees SET head_id = NULL WHERE head_id = ?1",
          rusqlite::params![id_str],
        )?;
        let row = select_person(&tx, &id_str)?;
        tx.commit()?;
        Ok(row)
      })
      .await?;

    row.ok_or_else(|| not_found(person_id))?.into_person()
  }

  // ── Atomic multi-row writes ───────────────────────────────────────────────

  async fn register(
    &self,
    tree: GenealogyTree,
    person: Person,
    account: Account,
  ) -> Result<()> {
    let login = account.login.clone();
    let tree_row = TreeRow::from_tree(&tree);
    let person_row = PersonRow::from_person(&person);
    let account_row = AccountRow::from_account(&account);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          &format!("INSERT INTO trees ({TREE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
          rusqlite::params![
            tree_row.tree_id,
            tree_row.name,
            tree_row.founder_id,
            tree_row.head_id,
            tree_row.created_at,
          ],
        )?;
        insert_person(&tx, &person_row)?;
        insert_account_row(&tx, &account_row)?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(|e| Error::from(e).for_account(&login))?;
    Ok(())
  }

  async fn insert_enrollment(&self, person: Person, link: EnrollmentLink) -> Result<Person> {
    let person_id = person.person_id;
    let person_row = PersonRow::from_person(&person);

    enum LinkRow {
      Parent(ParentRecordRow),
      Marriage(MarriageRow),
    }
    let link_row = match &link {
      EnrollmentLink::ParentChild(r) => LinkRow::Parent(ParentRecordRow::from_relation(r)),
      EnrollmentLink::Marriage(m) => LinkRow::Marriage(MarriageRow::from_relation(m)),
    };

    let row = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        insert_person(&tx, &person_row)?;
        match &link_row {
          LinkRow::Parent(r) => insert_parent_row(&tx, r)?,
          LinkRow::Marriage(m) => insert_marriage_row(&tx, m)?,
        }
        let row = select_person(&tx, &person_row.person_id)?;
        tx.commit()?;
        Ok(row)
      })
      .await
      .map_err(|e| match &link {
        EnrollmentLink::ParentChild(r) => Error::from(e).for_parent_record(r.child_id),
        EnrollmentLink::Marriage(m) => Error::from(e).for_marriage(m.person_a, m.person_b),
      })?;

    row.ok_or_else(|| not_found(person_id))?.into_person()
  }

  // ── Marriages ─────────────────────────────────────────────────────────────

  async fn marriages_of(&self, person_id: Uuid) -> Result<Vec<MarriageRelation>> {
    let id_str = encode_uuid(person_id);

    let rows: Vec<MarriageRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT person_a, person_b, start_date, end_date FROM marriages
            WHERE person_a = ?1 OR person_b = ?1
            ORDER BY start_date",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], MarriageRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(MarriageRow::into_relation).collect()
  }

  async fn insert_marriage(&self, marriage: MarriageRelation) -> Result<()> {
    let row = MarriageRow::from_relation(&marriage);
    self
      .conn
      .call(move |conn| Ok(insert_marriage_row(conn, &row)?))
      .await
      .map_err(|e| Error::from(e).for_marriage(marriage.person_a, marriage.person_b))?;
    Ok(())
  }

  async fn end_marriage(&self, x: Uuid, y: Uuid, end_date: NaiveDate) -> Result<bool> {
    let (x_str, y_str) = (encode_uuid(x), encode_uuid(y));
    let end = encode_date(end_date);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE marriages SET end_date = ?3
            WHERE end_date IS NULL
              AND ((person_a = ?1 AND person_b = ?2) OR (person_a = ?2 AND person_b = ?1))",
          rusqlite::params![x_str, y_str, end],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn delete_marriage(&self, x: Uuid, y: Uuid) -> Result<bool> {
    let (x_str, y_str) = (encode_uuid(x), encode_uuid(y));

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM marriages
            WHERE (person_a = ?1 AND person_b = ?2) OR (person_a = ?2 AND person_b = ?1)",
          rusqlite::params![x_str, y_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Parent records ────────────────────────────────────────────────────────

  async fn get_parent_record(&self, child_id: Uuid) -> Result<Option<ParentChildRelation>> {
    let id_str = encode_uuid(child_id);

    let row: Option<ParentRecordRow> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT child_id, father_id, mother_id, established_on
               FROM parent_child WHERE child_id = ?1",
            rusqlite::params![id_str],
            ParentRecordRow::from_row,
          )
          .optional()?)
      })
      .await?;

    row.map(ParentRecordRow::into_relation).transpose()
  }

  async fn save_parent_record(
    &self,
    record: ParentChildRelation,
    previous: Option<ParentChildRelation>,
  ) -> Result<()> {
    let child_id = record.child_id;
    let row = ParentRecordRow::from_relation(&record);
    let prev = previous.as_ref().map(ParentRecordRow::from_relation);

    let changed = self
      .conn
      .call(move |conn| match prev {
        None => {
          insert_parent_row(conn, &row)?;
          Ok(1)
        }
        Some(prev) => Ok(conn.execute(
          "UPDATE parent_child
              SET father_id = ?2, mother_id = ?3, established_on = ?4
            WHERE child_id = ?1
              AND father_id IS ?5 AND mother_id IS ?6 AND established_on IS ?7",
          rusqlite::params![
            row.child_id,
            row.father_id,
            row.mother_id,
            row.established_on,
            prev.father_id,
            prev.mother_id,
            prev.established_on,
          ],
        )?),
      })
      .await
      .map_err(|e| Error::from(e).for_parent_record(child_id))?;

    if changed == 0 {
      return Err(
        Error::Constraint(Constraint::ParentRecordChanged).for_parent_record(child_id),
      );
    }
    Ok(())
  }

  async fn delete_parent_record(&self, child_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(child_id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM parent_child WHERE child_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn relations_for(&self, person_id: Uuid) -> Result<RelationSet> {
    let marriages = self.marriages_of(person_id).await?;
    let id_str = encode_uuid(person_id);

    let rows: Vec<ParentRecordRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT child_id, father_id, mother_id, established_on FROM parent_child
            WHERE child_id = ?1 OR father_id = ?1 OR mother_id = ?1
            ORDER BY established_on IS NULL, established_on, child_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], ParentRecordRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let parent_child = rows
      .into_iter()
      .map(ParentRecordRow::into_relation)
      .collect::<Result<Vec<_>>>()?;
    Ok(RelationSet { marriages, parent_child })
  }

  // ── Trees ─────────────────────────────────────────────────────────────────

  async fn get_tree(&self, id: Uuid) -> Result<Option<GenealogyTree>> {
    let id_str = encode_uuid(id);
    let row: Option<TreeRow> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TREE_COLUMNS} FROM trees WHERE tree_id = ?1"),
            rusqlite::params![id_str],
            TreeRow::from_row,
          )
          .optional()?)
      })
      .await?;
    row.map(TreeRow::into_tree).transpose()
  }

  async fn list_trees(&self, tree_id: Option<Uuid>) -> Result<Vec<GenealogyTree>> {
    let id_str = tree_id.map(encode_uuid);

    let rows: Vec<TreeRow> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(id) = id_str {
          let mut stmt = conn
            .prepare(&format!("SELECT {TREE_COLUMNS} FROM trees WHERE tree_id = ?1"))?;
          stmt
            .query_map(rusqlite::params![id], TreeRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {TREE_COLUMNS} FROM trees ORDER BY created_at, name"
          ))?;
          stmt
            .query_map([], TreeRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    rows.into_iter().map(TreeRow::into_tree).collect()
  }

  async fn set_tree_head(&self, tree_id: Uuid, person_id: Uuid) -> Result<bool> {
    let (tree_str, person_str) = (encode_uuid(tree_id), encode_uuid(person_id));
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE trees SET head_id = ?2
            WHERE tree_id = ?1
              AND EXISTS (SELECT 1 FROM persons WHERE person_id = ?2 AND tree_id = ?1)",
          rusqlite::params![tree_str, person_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    let id_str = encode_uuid(id);
    let row: Option<AccountRow> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"),
            rusqlite::params![id_str],
            AccountRow::from_row,
          )
          .optional()?)
      })
      .await?;
    row.map(AccountRow::into_account).transpose()
  }

  async fn load_caller(&self, account_id: Uuid) -> Result<Option<Caller>> {
    let id_str = encode_uuid(account_id);

    let raw: Option<(String, Option<String>, Option<String>)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT a.role, a.person_id, p.tree_id
               FROM accounts a
               LEFT JOIN persons p ON p.person_id = a.person_id
              WHERE a.account_id = ?1",
            rusqlite::params![id_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
          )
          .optional()?)
      })
      .await?;

    let Some((role, person_id, tree_id)) = raw else { return Ok(None) };
    Ok(Some(Caller {
      account_id,
      role:      decode_role(&role)?,
      person_id: person_id.as_deref().map(decode_uuid).transpose()?,
      tree_id:   tree_id.as_deref().map(decode_uuid).transpose()?,
    }))
  }

  async fn insert_account(&self, account: Account) -> Result<()> {
    let row = AccountRow::from_account(&account);
    self
      .conn
      .call(move |conn| Ok(insert_account_row(conn, &row)?))
      .await
      .map_err(|e| Error::from(e).for_account(&account.login))?;
    Ok(())
  }

  async fn transition_role(&self, account_id: Uuid, from: Role, to: Role) -> Result<bool> {
    let id_str = encode_uuid(account_id);
    let (from_str, to_str) = (from.as_ref().to_owned(), to.as_ref().to_owned());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET role = ?3 WHERE account_id = ?1 AND role = ?2",
          rusqlite::params![id_str, from_str, to_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Achievements ──────────────────────────────────────────────────────────

  async fn insert_achievement(&self, achievement: Achievement) -> Result<()> {
    let row = AchievementRow::from_achievement(&achievement);
    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO achievements ({ACHIEVEMENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
          ),
          rusqlite::params![
            row.achievement_id,
            row.person_id,
            row.type_id,
            row.achieved_on,
            row.description,
            row.recorded_at,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_achievement(&self, id: Uuid) -> Result<Option<Achievement>> {
    let id_str = encode_uuid(id);
    let row: Option<AchievementRow> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements WHERE achievement_id = ?1"
            ),
            rusqlite::params![id_str],
            AchievementRow::from_row,
          )
          .optional()?)
      })
      .await?;
    row.map(AchievementRow::into_achievement).transpose()
  }

  async fn list_achievements(&self, person_id: Uuid) -> Result<Vec<Achievement>> {
    let id_str = encode_uuid(person_id);
    let rows: Vec<AchievementRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACHIEVEMENT_COLUMNS} FROM achievements
            WHERE person_id = ?1 ORDER BY achieved_on, recorded_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], AchievementRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    rows.into_iter().map(AchievementRow::into_achievement).collect()
  }

  async fn delete_achievement(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM achievements WHERE achievement_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Lookups ───────────────────────────────────────────────────────────────

  async fn add_lookup(&self, kind: LookupKind, label: String) -> Result<LookupItem> {
    let kind_str = encode_lookup_kind(kind);
    let label = label.trim().to_owned();
    let stored = label.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO lookups (kind, label) VALUES (?1, ?2)",
          rusqlite::params![kind_str, stored],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(lookup_item(kind, id, label))
  }

  async fn lookup_exists(&self, kind: LookupKind, id: i64) -> Result<bool> {
    let kind_str = encode_lookup_kind(kind);
    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM lookups WHERE id = ?1 AND kind = ?2)",
          rusqlite::params![id, kind_str],
          |row| row.get::<_, bool>(0),
        )?)
      })
      .await?;
    Ok(exists)
  }

  async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<LookupItem>> {
    let kind_str = encode_lookup_kind(kind);
    let rows: Vec<(i64, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT id, label FROM lookups WHERE kind = ?1 ORDER BY label, id")?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows.into_iter().map(|(id, label)| lookup_item(kind, id, label)).collect())
  }
}
