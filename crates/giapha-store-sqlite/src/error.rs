//! Error type for `giapha-store-sqlite`.
//!
//! Constraint and trigger failures are classified so they can be reported as
//! the core business errors they stand for.

use giapha_core::relation::RelationFamily;
use rusqlite::ErrorCode;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] giapha_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// `SQLITE_BUSY` / `SQLITE_LOCKED` after the busy timeout elapsed.
  #[error("database busy: {0}")]
  Busy(String),

  #[error("constraint violated: {0:?}")]
  Constraint(Constraint),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} value: {value:?}")]
  Decode {
    column: &'static str,
    value:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which schema rule a write ran into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
  /// `person_a` of the new row already has an open marriage.
  OpenMarriageA,
  /// `person_b` of the new row already has an open marriage.
  OpenMarriageB,
  /// The unordered pair already has a marriage record.
  MarriagePair,
  /// The child already has a parent record.
  ParentRecord,
  /// The stored parent record changed underneath a merge.
  ParentRecordChanged,
  Login,
  AccountPerson,
  ForeignKey,
  Other(String),
}

impl Constraint {
  fn classify(message: &str) -> Self {
    if message.contains("open_marriage:a") {
      Self::OpenMarriageA
    } else if message.contains("open_marriage:b") {
      Self::OpenMarriageB
    } else if message.contains("marriages_pair_idx")
      || message.contains("marriages.person_a, marriages.person_b")
    {
      Self::MarriagePair
    } else if message.contains("parent_child.child_id") {
      Self::ParentRecord
    } else if message.contains("accounts.login") {
      Self::Login
    } else if message.contains("accounts.person_id") {
      Self::AccountPerson
    } else if message.contains("FOREIGN KEY") {
      Self::ForeignKey
    } else {
      Self::Other(message.to_owned())
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      failure,
      message,
    )) = &e
    {
      match failure.code {
        ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
          return Error::Busy(e.to_string());
        }
        ErrorCode::ConstraintViolation => {
          return Error::Constraint(Constraint::classify(
            message.as_deref().unwrap_or_default(),
          ));
        }
        _ => {}
      }
    }
    Error::Database(e)
  }
}

// ─── Contextualising constraint failures ─────────────────────────────────────

impl Error {
  /// Translate marriage constraint failures for the pair `(a, b)`.
  pub(crate) fn for_marriage(self, a: Uuid, b: Uuid) -> Self {
    use giapha_core::Error as Core;
    match self {
      Error::Constraint(Constraint::OpenMarriageA) => Core::OpenMarriage {
        person_id: a,
        spouse_id: None,
      }
      .into(),
      Error::Constraint(Constraint::OpenMarriageB) => Core::OpenMarriage {
        person_id: b,
        spouse_id: None,
      }
      .into(),
      Error::Constraint(Constraint::MarriagePair) => Core::DuplicateRelation {
        family:    RelationFamily::Marriage,
        person_id: a,
        other_id:  Some(b),
      }
      .into(),
      other => other,
    }
  }

  /// Translate parent-record constraint failures for `child_id`.
  pub(crate) fn for_parent_record(self, child_id: Uuid) -> Self {
    match self {
      Error::Constraint(
        Constraint::ParentRecord | Constraint::ParentRecordChanged,
      ) => giapha_core::Error::DuplicateRelation {
        family:    RelationFamily::ParentChild,
        person_id: child_id,
        other_id:  None,
      }
      .into(),
      other => other,
    }
  }

  pub(crate) fn for_account(self, login: &str) -> Self {
    match self {
      Error::Constraint(Constraint::Login) => {
        giapha_core::Error::DuplicateAccount(format!("login {login:?}")).into()
      }
      Error::Constraint(Constraint::AccountPerson) => {
        giapha_core::Error::DuplicateAccount(format!(
          "person already has an account (login {login:?})"
        ))
        .into()
      }
      other => other,
    }
  }
}

impl From<Error> for giapha_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::Busy(message) => giapha_core::Error::TransientStore(message),
      other => giapha_core::Error::Store(Box::new(other)),
    }
  }
}
