//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use giapha_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("missing or unknown account")]
  Unauthenticated,

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => core_status(e),
    }
  }

  fn code(&self) -> &'static str {
    match self {
      ApiError::Unauthenticated => "unauthenticated",
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Core(e) => e.code(),
    }
  }
}

fn core_status(e: &CoreError) -> StatusCode {
  match e {
    e if e.is_not_found() => StatusCode::NOT_FOUND,
    CoreError::AccessDenied { .. } => StatusCode::FORBIDDEN,
    CoreError::DuplicateRelation { .. }
    | CoreError::DuplicatePerson { .. }
    | CoreError::OpenMarriage { .. }
    | CoreError::DuplicateAccount(_)
    | CoreError::InvalidRoleTransition { .. } => StatusCode::CONFLICT,
    CoreError::TransientStore(_) => StatusCode::SERVICE_UNAVAILABLE,
    CoreError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    _ => StatusCode::UNPROCESSABLE_ENTITY,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    } else if status == StatusCode::FORBIDDEN {
      tracing::warn!(error = %self, "access denied");
    }
    let body = json!({ "error": self.to_string(), "code": self.code() });
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[test]
  fn status_mapping() {
    let id = Uuid::new_v4();
    let cases = [
      (CoreError::PersonNotFound(id), StatusCode::NOT_FOUND),
      (
        CoreError::AccessDenied {
          account_id: id,
          action:     giapha_core::access::Action::Delete,
          target:     None,
        },
        StatusCode::FORBIDDEN,
      ),
      (
        CoreError::OpenMarriage { person_id: id, spouse_id: None },
        StatusCode::CONFLICT,
      ),
      (CoreError::MissingParent(id), StatusCode::UNPROCESSABLE_ENTITY),
      (CoreError::BlankField("login"), StatusCode::UNPROCESSABLE_ENTITY),
      (CoreError::TransientStore("busy".into()), StatusCode::SERVICE_UNAVAILABLE),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).status(), status);
    }
    assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
  }
}
