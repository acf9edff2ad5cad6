//! Caller identity extraction.
//!
//! Authentication happens upstream. The authenticator forwards the account
//! id in the trusted [`ACCOUNT_HEADER`]; this extractor turns it into a
//! [`Caller`] by loading the account and its linked person.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use giapha_core::{account::Caller, store::RegistryStore};
use uuid::Uuid;

use crate::error::ApiError;

pub const ACCOUNT_HEADER: &str = "x-account-id";

/// The authenticated caller of the current request.
pub struct CurrentCaller(pub Caller);

impl<S> FromRequestParts<Arc<S>> for CurrentCaller
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    store: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    let account_id = parts
      .headers
      .get(ACCOUNT_HEADER)
      .and_then(|v| v.to_str().ok())
      .and_then(|s| Uuid::parse_str(s.trim()).ok())
      .ok_or(ApiError::Unauthenticated)?;

    let caller = store
      .load_caller(account_id)
      .await
      .map_err(|e| ApiError::Core(e.into()))?
      .ok_or(ApiError::Unauthenticated)?;
    Ok(CurrentCaller(caller))
  }
}
