//! Handlers for `/people` and `/achievements` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/people[?living=true]` | Everyone in the caller's scope |
//! | `GET`    | `/people/{id}` | |
//! | `PATCH`  | `/people/{id}` | Body: [`PersonUpdate`]; descriptive fields only |
//! | `POST`   | `/people/{id}/death` | Body: [`DeathRecord`] |
//! | `POST`   | `/people/{id}/detach` | Owner/Admin; removes the person from their tree |
//! | `GET`    | `/people/{id}/relations` | Marriages and parent records |
//! | `GET`    | `/people/{id}/achievements` | |
//! | `POST`   | `/people/{id}/achievements` | Body: [`NewAchievement`]; returns 201 |
//! | `DELETE` | `/achievements/{id}` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use giapha_core::{
  achievement::{Achievement, NewAchievement},
  person::{DeathRecord, Person, PersonUpdate},
  registry,
  relation::RelationSet,
  relations,
  store::RegistryStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

// ─── People ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// If set, keep only the living (`true`) or the deceased (`false`).
  pub living: Option<bool>,
}

/// `GET /people[?living=true|false]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let mut people = registry::list_people(store.as_ref(), &caller).await?;
  if let Some(living) = params.living {
    people.retain(|p| p.is_living() == living);
  }
  Ok(Json(people))
}

/// `GET /people/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  Ok(Json(registry::get_person(store.as_ref(), &caller, id).await?))
}

/// `PATCH /people/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
  body: Result<Json<PersonUpdate>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(update) = body?;
  let person = registry::update_person(store.as_ref(), &caller, id, update).await?;
  tracing::info!(person_id = %id, account_id = %caller.account_id, "person updated");
  Ok(Json(person))
}

/// `POST /people/{id}/death`
pub async fn record_death<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
  body: Result<Json<DeathRecord>, JsonRejection>,
) -> Result<Json<Person>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(death) = body?;
  let person = registry::record_death(store.as_ref(), &caller, id, death).await?;
  tracing::info!(person_id = %id, account_id = %caller.account_id, "death recorded");
  Ok(Json(person))
}

/// `POST /people/{id}/detach`
pub async fn detach<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let person = registry::detach_from_tree(store.as_ref(), &caller, id).await?;
  tracing::info!(person_id = %id, account_id = %caller.account_id, "person detached from tree");
  Ok(Json(person))
}

/// `GET /people/{id}/relations`
pub async fn relations_of<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<RelationSet>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  Ok(Json(relations::list_relations_for(store.as_ref(), &caller, id).await?))
}

// ─── Achievements ─────────────────────────────────────────────────────────────

/// `GET /people/{id}/achievements`
pub async fn list_achievements<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Achievement>>, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  Ok(Json(registry::list_achievements(store.as_ref(), &caller, id).await?))
}

/// `POST /people/{id}/achievements`
pub async fn add_achievement<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
  body: Result<Json<NewAchievement>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  let Json(input) = body?;
  let achievement = registry::add_achievement(store.as_ref(), &caller, id, input).await?;
  tracing::info!(
    person_id = %id,
    achievement_id = %achievement.achievement_id,
    "achievement recorded"
  );
  Ok((StatusCode::CREATED, Json(achievement)))
}

/// `DELETE /achievements/{id}`
pub async fn delete_achievement<S>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  registry::delete_achievement(store.as_ref(), &caller, id).await?;
  tracing::info!(achievement_id = %id, account_id = %caller.account_id, "achievement deleted");
  Ok(StatusCode::NO_CONTENT)
}
