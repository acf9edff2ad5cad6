//! HTTP-level tests driving [`api_router`] over an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode},
};
use giapha_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{api_router, caller::ACCOUNT_HEADER};

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  api_router(Arc::new(store))
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  account: Option<Uuid>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(id) = account {
    builder = builder.header(ACCOUNT_HEADER, id.to_string());
  }
  let req = match body {
    Some(v) => builder
      .header("content-type", "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn id_of(v: &Value, pointer: &str) -> Uuid {
  v.pointer(pointer)
    .and_then(Value::as_str)
    .and_then(|s| Uuid::parse_str(s).ok())
    .unwrap_or_else(|| panic!("no uuid at {pointer} in {v}"))
}

/// Register the founder's tree; returns `(owner_account_id, founder_id)`.
async fn register(app: &Router) -> (Uuid, Uuid) {
  let (status, body) = send(
    app,
    Method::POST,
    "/register",
    None,
    Some(json!({
      "login": "an.nguyen",
      "tree_name": "Họ Nguyễn",
      "person": {
        "full_name": "Nguyễn Văn An",
        "gender": "male",
        "born_at": "1950-03-02T08:00:00Z"
      }
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  (id_of(&body, "/account/account_id"), id_of(&body, "/person/person_id"))
}

fn enrollment(
  existing: Uuid,
  kind: &str,
  name: &str,
  gender: &str,
  born_at: &str,
  date: &str,
) -> Value {
  json!({
    "existing_id": existing,
    "kind": kind,
    "event_date": date,
    "person": { "full_name": name, "gender": gender, "born_at": born_at }
  })
}

#[tokio::test]
async fn requests_without_a_known_account_are_unauthenticated() {
  let app = app().await;

  let (status, body) = send(&app, Method::GET, "/people", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert_eq!(body["code"], "unauthenticated");

  let (status, _) = send(&app, Method::GET, "/people", Some(Uuid::new_v4()), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registered_owner_sees_their_tree() {
  let app = app().await;
  let (owner, founder) = register(&app).await;

  let (status, people) = send(&app, Method::GET, "/people", Some(owner), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(people.as_array().map(Vec::len), Some(1));
  assert_eq!(people[0]["generation"], 0);

  let (status, trees) = send(&app, Method::GET, "/trees", Some(owner), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(id_of(&trees, "/0/head_id"), founder);

  let (status, body) = send(
    &app,
    Method::GET,
    &format!("/people/{}", Uuid::new_v4()),
    Some(owner),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["code"], "person_not_found");
}

#[tokio::test]
async fn people_can_be_filtered_by_living_status() {
  let app = app().await;
  let (owner, founder) = register(&app).await;

  let (status, body) = send(
    &app,
    Method::POST,
    &format!("/people/{founder}/death"),
    Some(owner),
    Some(json!({ "died_at": "2020-01-01T08:00:00Z" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");

  let (_, deceased) = send(&app, Method::GET, "/people?living=false", Some(owner), None).await;
  assert_eq!(deceased.as_array().map(Vec::len), Some(1));
  let (_, living) = send(&app, Method::GET, "/people?living=true", Some(owner), None).await;
  assert_eq!(living, json!([]));
}

#[tokio::test]
async fn enrollment_creates_person_and_relation() {
  let app = app().await;
  let (owner, founder) = register(&app).await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/enrollments",
    Some(owner),
    Some(enrollment(
      founder,
      "child",
      "Nguyễn Văn Bình",
      "male",
      "1972-01-01T08:00:00Z",
      "1972-01-01",
    )),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["person"]["generation"], 1);
  assert_eq!(body["link"]["kind"], "parent_child");
  assert_eq!(id_of(&body, "/link/relation/father_id"), founder);

  let child = id_of(&body, "/person/person_id");
  let (status, relations) = send(
    &app,
    Method::GET,
    &format!("/people/{child}/relations"),
    Some(owner),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(relations["parent_child"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn second_open_marriage_is_a_conflict() {
  let app = app().await;
  let (owner, founder) = register(&app).await;

  let wife = enrollment(
    founder,
    "spouse",
    "Lê Thị Hoa",
    "female",
    "1952-08-08T08:00:00Z",
    "1971-02-14",
  );
  let (status, _) = send(&app, Method::POST, "/enrollments", Some(owner), Some(wife)).await;
  assert_eq!(status, StatusCode::CREATED);

  let other = enrollment(
    founder,
    "spouse",
    "Phạm Thị Mai",
    "female",
    "1955-01-01T08:00:00Z",
    "1990-01-01",
  );
  let (status, body) = send(&app, Method::POST, "/enrollments", Some(owner), Some(other)).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["code"], "open_marriage");
}

#[tokio::test]
async fn rule_violations_are_unprocessable() {
  let app = app().await;
  let (owner, founder) = register(&app).await;

  let early = enrollment(
    founder,
    "child",
    "Nguyễn Văn Xưa",
    "male",
    "1940-01-01T08:00:00Z",
    "1940-01-01",
  );
  let (status, body) = send(&app, Method::POST, "/enrollments", Some(owner), Some(early)).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["code"], "birth_order_violation");
}

#[tokio::test]
async fn user_cannot_delete_a_relation() {
  let app = app().await;
  let (owner, founder) = register(&app).await;

  let (_, body) = send(
    &app,
    Method::POST,
    "/enrollments",
    Some(owner),
    Some(enrollment(
      founder,
      "child",
      "Nguyễn Văn Bình",
      "male",
      "1972-01-01T08:00:00Z",
      "1972-01-01",
    )),
  )
  .await;
  let child = id_of(&body, "/person/person_id");

  let (status, account) = send(
    &app,
    Method::POST,
    "/accounts",
    Some(owner),
    Some(json!({ "login": "binh.nguyen", "person_id": child })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{account}");
  assert_eq!(account["role"], "user");
  let user = id_of(&account, "/account_id");

  let uri = format!("/parent-child/{child}");
  let (status, body) = send(&app, Method::DELETE, &uri, Some(user), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["code"], "access_denied");

  let (status, _) = send(&app, Method::DELETE, &uri, Some(owner), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, Method::DELETE, &uri, Some(owner), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_delete_is_forbidden_even_for_unknown_relations() {
  let app = app().await;
  let (owner, founder) = register(&app).await;

  let (_, body) = send(
    &app,
    Method::POST,
    "/enrollments",
    Some(owner),
    Some(enrollment(
      founder,
      "child",
      "Nguyễn Văn Bình",
      "male",
      "1972-01-01T08:00:00Z",
      "1972-01-01",
    )),
  )
  .await;
  let child = id_of(&body, "/person/person_id");
  let (_, account) = send(
    &app,
    Method::POST,
    "/accounts",
    Some(owner),
    Some(json!({ "login": "binh.nguyen", "person_id": child })),
  )
  .await;
  let user = id_of(&account, "/account_id");

  let uri = format!("/marriages/{}/{}", Uuid::new_v4(), Uuid::new_v4());
  let (status, body) = send(&app, Method::DELETE, &uri, Some(user), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["code"], "access_denied");

  let uri = format!("/parent-child/{}", Uuid::new_v4());
  let (status, _) = send(&app, Method::DELETE, &uri, Some(user), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let uri = format!("/achievements/{}", Uuid::new_v4());
  let (status, _) = send(&app, Method::DELETE, &uri, Some(user), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn blank_login_is_rejected() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::POST,
    "/register",
    None,
    Some(json!({
      "login": "   ",
      "tree_name": "Họ Trần",
      "person": {
        "full_name": "Trần Văn Minh",
        "gender": "male",
        "born_at": "1960-01-01T08:00:00Z"
      }
    })),
  )
  .await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["code"], "blank_field");
}

#[tokio::test]
async fn malformed_input_is_a_bad_request() {
  let app = app().await;
  let (owner, _) = register(&app).await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/enrollments",
    Some(owner),
    Some(json!({ "kind": "cousin" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["code"], "bad_request");

  let (status, _) = send(&app, Method::GET, "/lookups/planet", Some(owner), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, items) = send(&app, Method::GET, "/lookups/birthplace", Some(owner), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(items, json!([]));
}
