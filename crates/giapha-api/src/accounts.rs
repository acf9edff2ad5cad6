//! Handlers for registration and `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/register` | No caller; new tree, founder and Owner account, 201 |
//! | `POST` | `/accounts` | Body: [`NewAccount`]; links a `user` account, 201 |
//! | `POST` | `/accounts/{id}/promote` | Admin only; user → owner |
//! | `POST` | `/accounts/{id}/demote` | Admin only; owner → user |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use giapha_core::{
  account::{Account, RoleTransition},
  registry::{self, NewAccount, RegistrationRequest},
  store::RegistryStore,
};
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

/// `POST /register`
pub async fn register<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(request) = body?;
  let registration = registry::register(store.as_ref(), request).await?;
  tracing::info!(
    account_id = %registration.account.account_id,
    tree_id = %registration.tree.tree_id,
    "registered new tree"
  );
  Ok((StatusCode::CREATED, Json(registration)))
}

/// `POST /accounts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<NewAccount>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(input) = body?;
  let account = registry::create_account(store.as_ref(), &caller, input).await?;
  tracing::info!(account_id = %account.account_id, login = %account.login, "account created");
  Ok((StatusCode::CREATED, Json(account)))
}

/// `POST /accounts/{id}/promote`
pub async fn promote<S>(
  state: State<Arc<S>>,
  caller: CurrentCaller,
  path: Path<Uuid>,
) -> Result<Json<Account>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  transition(state, caller, path, RoleTransition::Promote).await
}

/// `POST /accounts/{id}/demote`
pub async fn demote<S>(
  state: State<Arc<S>>,
  caller: CurrentCaller,
  path: Path<Uuid>,
) -> Result<Json<Account>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  transition(state, caller, path, RoleTransition::Demote).await
}

async fn transition<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
  transition: RoleTransition,
) -> Result<Json<Account>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let account = registry::change_role(store.as_ref(), &caller, id, transition).await?;
  tracing::info!(account_id = %id, role = %account.role, "role changed");
  Ok(Json(account))
}
