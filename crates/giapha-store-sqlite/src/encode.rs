//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! `YYYY-MM-DD` and UUIDs as hyphenated lowercase strings. Enum columns use
//! the lowercase names the domain types render with.

use chrono::{DateTime, NaiveDate, Utc};
use giapha_core::{
  account::{Account, Role},
  achievement::Achievement,
  lookup::{LookupItem, LookupKind},
  person::{DeathRecord, Gender, Person},
  relation::{MarriageRelation, ParentChildRelation},
  tree::GenealogyTree,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_enum<T: std::str::FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::Decode {
    column,
    value: s.to_owned(),
  })
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const PERSON_COLUMNS: &str = "person_id, full_name, gender, born_at, address,
  birthplace_id, occupation_id, generation, tree_id,
  died_at, death_cause_id, burial_site_id, created_at";

pub const TREE_COLUMNS: &str = "tree_id, name, founder_id, head_id, created_at";

pub const ACCOUNT_COLUMNS: &str = "account_id, login, person_id, role, created_at";

pub const ACHIEVEMENT_COLUMNS: &str =
  "achievement_id, person_id, type_id, achieved_on, description, recorded_at";

// ─── Persons ─────────────────────────────────────────────────────────────────

/// A `persons` row as stored.
pub struct PersonRow {
  pub person_id:      String,
  pub full_name:      String,
  pub gender:         String,
  pub born_at:        String,
  pub address:        Option<String>,
  pub birthplace_id:  Option<i64>,
  pub occupation_id:  Option<i64>,
  pub generation:     i64,
  pub tree_id:        Option<String>,
  pub died_at:        Option<String>,
  pub death_cause_id: Option<i64>,
  pub burial_site_id: Option<i64>,
  pub created_at:     String,
}

impl PersonRow {
  /// Read a row selected with [`PERSON_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:      row.get(0)?,
      full_name:      row.get(1)?,
      gender:         row.get(2)?,
      born_at:        row.get(3)?,
      address:        row.get(4)?,
      birthplace_id:  row.get(5)?,
      occupation_id:  row.get(6)?,
      generation:     row.get(7)?,
      tree_id:        row.get(8)?,
      died_at:        row.get(9)?,
      death_cause_id: row.get(10)?,
      burial_site_id: row.get(11)?,
      created_at:     row.get(12)?,
    })
  }

  pub fn from_person(p: &Person) -> Self {
    Self {
      person_id:      encode_uuid(p.person_id),
      full_name:      p.full_name.clone(),
      gender:         p.gender.as_ref().to_owned(),
      born_at:        encode_dt(p.born_at),
      address:        p.address.clone(),
      birthplace_id:  p.birthplace_id,
      occupation_id:  p.occupation_id,
      generation:     i64::from(p.generation),
      tree_id:        p.tree_id.map(encode_uuid),
      died_at:        p.death.as_ref().map(|d| encode_dt(d.died_at)),
      death_cause_id: p.death.as_ref().and_then(|d| d.cause_id),
      burial_site_id: p.death.as_ref().and_then(|d| d.burial_site_id),
      created_at:     encode_dt(p.created_at),
    }
  }

  pub fn into_person(self) -> Result<Person> {
    let gender: Gender = decode_enum("gender", &self.gender)?;
    let generation = u32::try_from(self.generation).map_err(|_| Error::Decode {
      column: "generation",
      value:  self.generation.to_string(),
    })?;
    let death = match self.died_at {
      Some(at) => Some(DeathRecord {
        died_at:        decode_dt(&at)?,
        cause_id:       self.death_cause_id,
        burial_site_id: self.burial_site_id,
      }),
      None => None,
    };

    Ok(Person {
      person_id: decode_uuid(&self.person_id)?,
      full_name: self.full_name,
      gender,
      born_at: decode_dt(&self.born_at)?,
      address: self.address,
      birthplace_id: self.birthplace_id,
      occupation_id: self.occupation_id,
      generation,
      tree_id: decode_opt_uuid(self.tree_id)?,
      death,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

// ─── Relations ───────────────────────────────────────────────────────────────

/// A `parent_child` row as stored.
#[derive(Clone)]
pub struct ParentRecordRow {
  pub child_id:       String,
  pub father_id:      Option<String>,
  pub mother_id:      Option<String>,
  pub established_on: Option<String>,
}

impl ParentRecordRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      child_id:       row.get(0)?,
      father_id:      row.get(1)?,
      mother_id:      row.get(2)?,
      established_on: row.get(3)?,
    })
  }

  pub fn from_relation(r: &ParentChildRelation) -> Self {
    Self {
      child_id:       encode_uuid(r.child_id),
      father_id:      r.father_id.map(encode_uuid),
      mother_id:      r.mother_id.map(encode_uuid),
      established_on: r.established_on.map(encode_date),
    }
  }

  pub fn into_relation(self) -> Result<ParentChildRelation> {
    Ok(ParentChildRelation {
      child_id:       decode_uuid(&self.child_id)?,
      father_id:      decode_opt_uuid(self.father_id)?,
      mother_id:      decode_opt_uuid(self.mother_id)?,
      established_on: self.established_on.as_deref().map(decode_date).transpose()?,
    })
  }
}

/// A `marriages` row as stored.
pub struct MarriageRow {
  pub person_a:   String,
  pub person_b:   String,
  pub start_date: String,
  pub end_date:   Option<String>,
}

impl MarriageRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_a:   row.get(0)?,
      person_b:   row.get(1)?,
      start_date: row.get(2)?,
      end_date:   row.get(3)?,
    })
  }

  pub fn from_relation(m: &MarriageRelation) -> Self {
    Self {
      person_a:   encode_uuid(m.person_a),
      person_b:   encode_uuid(m.person_b),
      start_date: encode_date(m.start_date),
      end_date:   m.end_date.map(encode_date),
    }
  }

  pub fn into_relation(self) -> Result<MarriageRelation> {
    Ok(MarriageRelation {
      person_a:   decode_uuid(&self.person_a)?,
      person_b:   decode_uuid(&self.person_b)?,
      start_date: decode_date(&self.start_date)?,
      end_date:   self.end_date.as_deref().map(decode_date).transpose()?,
    })
  }
}

// ─── Trees, accounts, achievements, lookups ──────────────────────────────────

pub struct TreeRow {
  pub tree_id:    String,
  pub name:       String,
  pub founder_id: Option<String>,
  pub head_id:    Option<String>,
  pub created_at: String,
}

impl TreeRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      tree_id:    row.get(0)?,
      name:       row.get(1)?,
      founder_id: row.get(2)?,
      head_id:    row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn from_tree(t: &GenealogyTree) -> Self {
    Self {
      tree_id:    encode_uuid(t.tree_id),
      name:       t.name.clone(),
      founder_id: t.founder_id.map(encode_uuid),
      head_id:    t.head_id.map(encode_uuid),
      created_at: encode_dt(t.created_at),
    }
  }

  pub fn into_tree(self) -> Result<GenealogyTree> {
    Ok(GenealogyTree {
      tree_id:    decode_uuid(&self.tree_id)?,
      name:       self.name,
      founder_id: decode_opt_uuid(self.founder_id)?,
      head_id:    decode_opt_uuid(self.head_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct AccountRow {
  pub account_id: String,
  pub login:      String,
  pub person_id:  Option<String>,
  pub role:       String,
  pub created_at: String,
}

impl AccountRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id: row.get(0)?,
      login:      row.get(1)?,
      person_id:  row.get(2)?,
      role:       row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn from_account(a: &Account) -> Self {
    Self {
      account_id: encode_uuid(a.account_id),
      login:      a.login.clone(),
      person_id:  a.person_id.map(encode_uuid),
      role:       a.role.as_ref().to_owned(),
      created_at: encode_dt(a.created_at),
    }
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id: decode_uuid(&self.account_id)?,
      login:      self.login,
      person_id:  decode_opt_uuid(self.person_id)?,
      role:       decode_role(&self.role)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub fn decode_role(s: &str) -> Result<Role> { decode_enum("role", s) }

pub struct AchievementRow {
  pub achievement_id: String,
  pub person_id:      String,
  pub type_id:        i64,
  pub achieved_on:    String,
  pub description:    Option<String>,
  pub recorded_at:    String,
}

impl AchievementRow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      achievement_id: row.get(0)?,
      person_id:      row.get(1)?,
      type_id:        row.get(2)?,
      achieved_on:    row.get(3)?,
      description:    row.get(4)?,
      recorded_at:    row.get(5)?,
    })
  }

  pub fn from_achievement(a: &Achievement) -> Self {
    Self {
      achievement_id: encode_uuid(a.achievement_id),
      person_id:      encode_uuid(a.person_id),
      type_id:        a.type_id,
      achieved_on:    encode_date(a.achieved_on),
      description:    a.description.clone(),
      recorded_at:    encode_dt(a.recorded_at),
    }
  }

  pub fn into_achievement(self) -> Result<Achievement> {
    Ok(Achievement {
      achievement_id: decode_uuid(&self.achievement_id)?,
      person_id:      decode_uuid(&self.person_id)?,
      type_id:        self.type_id,
      achieved_on:    decode_date(&self.achieved_on)?,
      description:    self.description,
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}

pub fn encode_lookup_kind(kind: LookupKind) -> String { kind.as_ref().to_owned() }

pub fn lookup_item(kind: LookupKind, id: i64, label: String) -> LookupItem {
  LookupItem { kind, id, label }
}
