//! Handlers for enrollment and relationship endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/enrollments` | Body: [`EnrollRequest`]; new person plus one relation, 201 |
//! | `POST`   | `/marriages` | Body: [`MarriageRelation`]; 201 |
//! | `POST`   | `/marriages/end` | Body: [`EndMarriageBody`] |
//! | `DELETE` | `/marriages/{a}/{b}` | Either order; 204 |
//! | `POST`   | `/parent-child` | Body: [`ParentLinkRequest`]; fills empty slots |
//! | `DELETE` | `/parent-child/{child}` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use giapha_core::{
  enroll::{self, EnrollRequest},
  relation::{MarriageRelation, RelationRef},
  relations::{self, ParentLinkRequest},
  store::RegistryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

// ─── Enrollment ───────────────────────────────────────────────────────────────

/// `POST /enrollments`
pub async fn enroll<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<EnrollRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(request) = body?;
  let enrollment = enroll::enroll(store.as_ref(), &caller, request).await?;
  tracing::info!(
    person_id = %enrollment.person.person_id,
    account_id = %caller.account_id,
    "{}",
    enrollment.description
  );
  Ok((StatusCode::CREATED, Json(enrollment)))
}

// ─── Marriages ────────────────────────────────────────────────────────────────

/// `POST /marriages`
pub async fn create_marriage<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<MarriageRelation>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(marriage) = body?;
  let marriage = relations::establish_marriage(store.as_ref(), &caller, marriage).await?;
  tracing::info!(
    person_a = %marriage.person_a,
    person_b = %marriage.person_b,
    open = marriage.is_open(),
    "marriage recorded"
  );
  Ok((StatusCode::CREATED, Json(marriage)))
}

#[derive(Debug, Deserialize)]
pub struct EndMarriageBody {
  pub person_a: Uuid,
  pub person_b: Uuid,
  pub end_date: NaiveDate,
}

/// `POST /marriages/end`
pub async fn end_marriage<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<EndMarriageBody>, JsonRejection>,
) -> Result<Json<MarriageRelation>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(b) = body?;
  let marriage =
    relations::end_marriage(store.as_ref(), &caller, b.person_a, b.person_b, b.end_date)
      .await?;
  tracing::info!(person_a = %b.person_a, person_b = %b.person_b, "marriage ended");
  Ok(Json(marriage))
}

/// `DELETE /marriages/{a}/{b}`
pub async fn delete_marriage<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path((person_a, person_b)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  relations::delete_relation(
    store.as_ref(),
    &caller,
    RelationRef::Marriage { person_a, person_b },
  )
  .await?;
  tracing::info!(%person_a, %person_b, account_id = %caller.account_id, "marriage deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Parent / child ───────────────────────────────────────────────────────────

/// `POST /parent-child`
pub async fn link_parents<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<ParentLinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(request) = body?;
  let record = relations::establish_parent_child(store.as_ref(), &caller, request).await?;
  tracing::info!(child_id = %record.child_id, "parent record saved");
  Ok(Json(record))
}

/// `DELETE /parent-child/{child}`
pub async fn delete_parent_record<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(child_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  relations::delete_relation(store.as_ref(), &caller, RelationRef::ParentChild { child_id })
    .await?;
  tracing::info!(%child_id, account_id = %caller.account_id, "parent record deleted");
  Ok(StatusCode::NO_CONTENT)
}
