//! GenealogyTree — an independently administered family registry ("Gia Phả").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The unit of access-control scoping.
///
/// The head of family, when set, always belongs to this tree; the store
/// clears it when that person is detached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenealogyTree {
  pub tree_id:    Uuid,
  pub name:       String,
  pub founder_id: Option<Uuid>,
  /// Current head of family ("Trưởng tộc").
  pub head_id:    Option<Uuid>,
  pub created_at: DateTime<Utc>,
}
