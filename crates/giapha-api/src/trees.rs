//! Handlers for `/trees` and `/lookups` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/trees` | Trees in the caller's scope |
//! | `GET` | `/trees/{id}` | |
//! | `PUT` | `/trees/{id}/head` | Body: `{"person_id":"..."}` |
//! | `GET` | `/lookups/{kind}` | Reference list, e.g. `birthplace` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use giapha_core::{
  lookup::{LookupItem, LookupKind},
  registry,
  store::RegistryStore,
  tree::GenealogyTree,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

/// `GET /trees`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
) -> Result<Json<Vec<GenealogyTree>>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  Ok(Json(registry::list_trees(store.as_ref(), &caller).await?))
}

/// `GET /trees/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<GenealogyTree>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  Ok(Json(registry::get_tree(store.as_ref(), &caller, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct HeadBody {
  pub person_id: Uuid,
}

/// `PUT /trees/{id}/head`
pub async fn set_head<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
  body: Result<Json<HeadBody>, JsonRejection>,
) -> Result<Json<GenealogyTree>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(HeadBody { person_id }) = body?;
  let tree = registry::set_tree_head(store.as_ref(), &caller, id, person_id).await?;
  tracing::info!(tree_id = %id, head_id = %person_id, "head of family changed");
  Ok(Json(tree))
}

/// `GET /lookups/{kind}`
pub async fn lookups<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(_caller): CurrentCaller,
  Path(kind): Path<String>,
) -> Result<Json<Vec<LookupItem>>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let kind: LookupKind = kind
    .parse()
    .map_err(|_| ApiError::BadRequest(format!("unknown lookup kind {kind:?}")))?;
  Ok(Json(registry::list_lookups(store.as_ref(), kind).await?))
}
