//! HTTP server assembly for the Gia Phả registry.
//!
//! Mounts the JSON API under `/api` with request tracing, and provides the
//! configuration type read by the `giapha-server` binary.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::Router;
use chrono::Utc;
use giapha_core::{
  account::{Account, Role},
  rules,
  store::RegistryStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GIAPHA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  pub store_path:      PathBuf,
  /// How long a request waits for the database before failing with a
  /// transient error.
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_busy_timeout_ms() -> u64 { 5_000 }

impl ServerConfig {
  pub fn busy_timeout(&self) -> Duration { Duration::from_millis(self.busy_timeout_ms) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router for `store`.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: RegistryStore + 'static,
  giapha_core::Error: From<S::Error>,
{
  Router::new()
    .nest("/api", giapha_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

// ─── Admin seeding ────────────────────────────────────────────────────────────

/// Provision an Admin account with no linked person.
///
/// Admins are never created through the API; this is the out-of-band path.
pub async fn seed_admin<S>(store: &S, login: &str) -> Result<Account, giapha_core::Error>
where
  S: RegistryStore,
  giapha_core::Error: From<S::Error>,
{
  let account = Account {
    account_id: Uuid::new_v4(),
    login:      rules::require_text("login", login)?,
    person_id:  None,
    role:       Role::Admin,
    created_at: Utc::now(),
  };
  store.insert_account(account.clone()).await?;
  Ok(account)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use giapha_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.expect("in-memory store"))
  }

  async fn get(app: Router, uri: &str, account: Uuid) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
      .uri(uri)
      .header(giapha_api::caller::ACCOUNT_HEADER, account.to_string())
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn seeded_admin_reaches_the_api() {
    let store = store().await;
    let admin = seed_admin(store.as_ref(), " root ").await.unwrap();
    assert_eq!(admin.login, "root");
    assert_eq!(admin.role, Role::Admin);

    let (status, body) = get(app(store.clone()), "/api/trees", admin.account_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
  }

  #[tokio::test]
  async fn seeding_the_same_login_twice_fails() {
    let store = store().await;
    seed_admin(store.as_ref(), "root").await.unwrap();
    let err = seed_admin(store.as_ref(), "root").await.unwrap_err();
    assert!(matches!(err, giapha_core::Error::DuplicateAccount(_)));

    let err = seed_admin(store.as_ref(), "  ").await.unwrap_err();
    assert!(matches!(err, giapha_core::Error::BlankField("login")));
  }

  #[tokio::test]
  async fn routes_live_under_api_prefix() {
    let store = store().await;
    let admin = seed_admin(store.as_ref(), "root").await.unwrap();

    let req = Request::builder()
      .uri("/trees")
      .header(giapha_api::caller::ACCOUNT_HEADER, admin.account_id.to_string())
      .body(Body::empty())
      .unwrap();
    let resp = app(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn config_defaults() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("store_path", "/tmp/giapha.db")
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.busy_timeout(), Duration::from_secs(5));
  }
}
