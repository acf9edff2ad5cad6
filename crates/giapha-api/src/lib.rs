//! JSON REST API for the Gia Phả registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`giapha_core::store::RegistryStore`]. Authentication happens upstream:
//! the caller's account id arrives in the [`caller::ACCOUNT_HEADER`] header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", giapha_api::api_router(store.clone()))
//! ```

pub mod accounts;
pub mod caller;
pub mod error;
pub mod people;
pub mod relations;
pub mod trees;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use giapha_core::store::RegistryStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  Router::new()
    // Registration & accounts
    .route("/register", post(accounts::register::<S>))
    .route("/accounts", post(accounts::create::<S>))
    .route("/accounts/{id}/promote", post(accounts::promote::<S>))
    .route("/accounts/{id}/demote", post(accounts::demote::<S>))
    // People
    .route("/people", get(people::list::<S>))
    .route("/people/{id}", get(people::get_one::<S>).patch(people::update::<S>))
    .route("/people/{id}/death", post(people::record_death::<S>))
    .route("/people/{id}/detach", post(people::detach::<S>))
    .route("/people/{id}/relations", get(people::relations_of::<S>))
    .route(
      "/people/{id}/achievements",
      get(people::list_achievements::<S>).post(people::add_achievement::<S>),
    )
    .route("/achievements/{id}", delete(people::delete_achievement::<S>))
    // Enrollment & relations
    .route("/enrollments", post(relations::enroll::<S>))
    .route("/marriages", post(relations::create_marriage::<S>))
    .route("/marriages/end", post(relations::end_marriage::<S>))
    .route("/marriages/{a}/{b}", delete(relations::delete_marriage::<S>))
    .route("/parent-child", post(relations::link_parents::<S>))
    .route("/parent-child/{child}", delete(relations::delete_parent_record::<S>))
    // Trees & lookups
    .route("/trees", get(trees::list::<S>))
    .route("/trees/{id}", get(trees::get_one::<S>))
    .route("/trees/{id}/head", put(trees::set_head::<S>))
    .route("/lookups/{kind}", get(trees::lookups::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
