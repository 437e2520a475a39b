//! JSON REST API for the student roster.
//!
//! Exposes an axum [`Router`] backed by any [`StudentStore`]. Authentication
//! is a bearer token issued by `/api/auth/login` or `/api/auth/register`;
//! roster management additionally requires the `admin` role.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod extract;
pub mod students;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{
  Router,
  routing::{get, post, put},
};
use roster_auth::{AccessGuard, AuthConfig, Authenticator, config::DEFAULT_TOKEN_TTL_SECS};
use roster_core::store::StudentStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  pub jwt_secret:     String,
  #[serde(default = "default_token_ttl_secs")]
  pub token_ttl_secs: i64,
  /// Admin bootstrap; honored only when both are set.
  #[serde(default)]
  pub admin_email:    Option<String>,
  #[serde(default)]
  pub admin_password: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("roster.db") }

fn default_token_ttl_secs() -> i64 { DEFAULT_TOKEN_TTL_SECS }

impl ServerConfig {
  /// Validate the auth settings and build the immutable [`AuthConfig`].
  pub fn auth_config(&self) -> anyhow::Result<AuthConfig> {
    if self.jwt_secret.trim().is_empty() {
      anyhow::bail!("jwt_secret must be set");
    }
    let ttl = chrono::Duration::try_seconds(self.token_ttl_secs)
      .filter(|ttl| *ttl > chrono::Duration::zero())
      .with_context(|| {
        format!("token_ttl_secs must be a positive number of seconds, got {}", self.token_ttl_secs)
      })?;

    Ok(
      AuthConfig::new(self.jwt_secret.clone())
        .with_token_ttl(ttl)
        .with_admin(self.admin_email.as_deref(), self.admin_password.as_deref()),
    )
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Authenticator<S>,
  pub guard: AccessGuard,
}

impl<S: StudentStore> AppState<S> {
  pub fn new(store: Arc<S>, config: AuthConfig) -> Self {
    let auth  = Authenticator::new(Arc::clone(&store), Arc::new(config));
    let guard = AccessGuard::new(auth.codec().clone());
    Self { store, auth, guard }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: StudentStore + Clone + 'static,
{
  Router::new()
    // Accounts
    .route("/api/auth/register", post(accounts::register::<S>))
    .route("/api/auth/login",    post(accounts::login::<S>))
    // Own profile
    .route("/api/students/me",   get(students::get_me::<S>).put(students::update_me::<S>))
    // Roster
    .route("/api/students",      get(students::list::<S>).post(students::create::<S>))
    .route("/api/students/{id}", put(students::update::<S>).delete(students::delete::<S>))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use roster_auth::{Claim, password, token};
  use roster_core::{
    identity::{Identity, NewIdentity, Role},
    store::CredentialStore,
    student::{NewStudent, Student, StudentPatch},
  };
  use roster_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const SECRET: &str = "api-test-secret";
  const ADMIN_EMAIL: &str = "admin@school.test";
  const ADMIN_PASSWORD: &str = "admin123";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = AuthConfig::new(SECRET).with_admin(Some(ADMIN_EMAIL), Some(ADMIN_PASSWORD));
    AppState::new(Arc::new(store), config)
  }

  async fn send<S: StudentStore + Clone + 'static>(
    state:  &AppState<S>,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
    body:   Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn register<S: StudentStore + Clone + 'static>(
    state: &AppState<S>,
    name:  &str,
    email: &str,
  ) -> String {
    let resp = send(
      state,
      "POST",
      "/api/auth/register",
      None,
      Some(json!({ "name": name, "email": email, "password": "pw" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["token"].as_str().unwrap().to_owned()
  }

  async fn admin_token(state: &AppState<SqliteStore>) -> String {
    let resp = send(
      state,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await["token"].as_str().unwrap().to_owned()
  }

  /// SQLite, except that every student update is rejected as an email clash.
  #[derive(Clone)]
  struct ConflictingUpdates(SqliteStore);

  impl CredentialStore for ConflictingUpdates {
    type Error = roster_store_sqlite::Error;

    async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>, Self::Error> {
      self.0.find_identity_by_email(email).await
    }

    async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>, Self::Error> {
      self.0.get_identity(id).await
    }

    async fn create_identity(&self, input: NewIdentity) -> Result<Identity, Self::Error> {
      self.0.create_identity(input).await
    }

    async fn save_identity(&self, identity: &Identity) -> Result<Identity, Self::Error> {
      self.0.save_identity(identity).await
    }
  }

  impl StudentStore for ConflictingUpdates {
    async fn list_students(&self) -> Result<Vec<Student>, Self::Error> {
      self.0.list_students().await
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<Student>, Self::Error> {
      self.0.get_student(id).await
    }

    async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>, Self::Error> {
      self.0.find_student_by_email(email).await
    }

    async fn create_student(&self, input: NewStudent) -> Result<Student, Self::Error> {
      self.0.create_student(input).await
    }

    async fn get_or_create_student(&self, input: NewStudent) -> Result<Student, Self::Error> {
      self.0.get_or_create_student(input).await
    }

    async fn update_student(
      &self,
      _id: Uuid,
      patch: StudentPatch,
    ) -> Result<Option<Student>, Self::Error> {
      Err(roster_store_sqlite::Error::EmailTaken(patch.email.unwrap_or_default()))
    }

    async fn delete_student(&self, id: Uuid) -> Result<bool, Self::Error> {
      self.0.delete_student(id).await
    }
  }

  // ── Configuration ───────────────────────────────────────────────────────────

  fn server_config(jwt_secret: &str, token_ttl_secs: i64) -> ServerConfig {
    ServerConfig {
      host:           default_host(),
      port:           default_port(),
      store_path:     default_store_path(),
      jwt_secret:     jwt_secret.to_owned(),
      token_ttl_secs,
      admin_email:    Some(ADMIN_EMAIL.to_owned()),
      admin_password: Some(ADMIN_PASSWORD.to_owned()),
    }
  }

  #[test]
  fn auth_config_carries_ttl_and_admin() {
    let cfg = server_config(SECRET, 3600).auth_config().unwrap();
    assert_eq!(cfg.token_ttl, chrono::Duration::hours(1));
    assert_eq!(cfg.admin.map(|a| a.email).as_deref(), Some(ADMIN_EMAIL));
  }

  #[test]
  fn unusable_token_ttl_is_a_config_error() {
    for ttl in [i64::MAX, i64::MIN, 0, -60] {
      assert!(server_config(SECRET, ttl).auth_config().is_err(), "accepted ttl {ttl}");
    }
  }

  #[test]
  fn blank_jwt_secret_is_a_config_error() {
    assert!(server_config("  ", 3600).auth_config().is_err());
  }

  // ── Accounts ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_returns_201_with_identity_and_token() {
    let state = make_state().await;
    let resp = send(
      &state,
      "POST",
      "/api/auth/register",
      None,
      Some(json!({ "name": "Ann", "email": " Ann@Example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = json_body(resp).await;
    assert_eq!(body["email"], "ann@example.com");
    assert_eq!(body["role"], "student");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn duplicate_register_returns_400_duplicate_email() {
    let state = make_state().await;
    register(&state, "Ann", "ann@example.com").await;

    let resp = send(
      &state,
      "POST",
      "/api/auth/register",
      None,
      Some(json!({ "name": "Ann", "email": "ANN@example.com ", "password": "x" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "duplicate_email");
  }

  #[tokio::test]
  async fn register_without_password_is_bad_request() {
    let state = make_state().await;
    let resp = send(
      &state,
      "POST",
      "/api/auth/register",
      None,
      Some(json!({ "name": "Ann", "email": "ann@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "bad_request");
  }

  #[tokio::test]
  async fn login_returns_token_with_stored_role() {
    let state = make_state().await;
    register(&state, "Ann", "ann@example.com").await;

    let resp = send(
      &state,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "ann@example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["name"], "Ann");
    let verified = token::decode(body["token"].as_str().unwrap(), SECRET.as_bytes()).unwrap();
    assert_eq!(verified.claim.role, Role::Student);
  }

  #[tokio::test]
  async fn wrong_password_returns_400_invalid_credentials() {
    let state = make_state().await;
    register(&state, "Ann", "ann@example.com").await;

    let resp = send(
      &state,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "ann@example.com", "password": "nope" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "invalid_credentials");
    assert!(body.get("token").is_none());
  }

  #[tokio::test]
  async fn admin_bootstrap_login_returns_admin_role() {
    let state = make_state().await;
    let resp = send(
      &state,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": " Admin@School.test", "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["name"], "Admin");
  }

  // ── Access guard ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_token_returns_401() {
    let state = make_state().await;
    let resp = send(&state, "GET", "/api/students/me", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
    assert_eq!(json_body(resp).await["error"], "unauthenticated");
  }

  #[tokio::test]
  async fn expired_and_forged_tokens_return_401() {
    let state = make_state().await;
    let claim = Claim {
      identity_id: uuid::Uuid::new_v4(),
      email:       "ann@example.com".into(),
      role:        Role::Admin,
    };
    let expired = token::encode(&claim, SECRET.as_bytes(), chrono::Duration::seconds(-1)).unwrap();
    let forged = token::encode(&claim, b"not-the-secret", chrono::Duration::hours(1)).unwrap();

    for t in [expired, forged] {
      let resp = send(&state, "GET", "/api/students", Some(&t), None).await;
      assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
  }

  #[tokio::test]
  async fn student_on_admin_endpoint_returns_403() {
    let state = make_state().await;
    let t = register(&state, "Ann", "ann@example.com").await;

    let resp = send(&state, "GET", "/api/students", Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["error"], "forbidden");
  }

  #[tokio::test]
  async fn role_change_applies_only_after_reauthentication() {
    let state = make_state().await;
    let hash = password::hash_password("pw").unwrap();
    let mut admin = state
      .store
      .create_identity(
        NewIdentity::student("Staff", "staff@example.com", hash).with_role(Role::Admin),
      )
      .await
      .unwrap();

    let login = json!({ "email": "staff@example.com", "password": "pw" });
    let resp = send(&state, "POST", "/api/auth/login", None, Some(login.clone())).await;
    let old_token = json_body(resp).await["token"].as_str().unwrap().to_owned();

    admin.role = Role::Student;
    state.store.save_identity(&admin).await.unwrap();

    // The old token still carries `admin` until it expires.
    let resp = send(&state, "GET", "/api/students", Some(&old_token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&state, "POST", "/api/auth/login", None, Some(login)).await;
    let new_token = json_body(resp).await["token"].as_str().unwrap().to_owned();
    let resp = send(&state, "GET", "/api/students", Some(&new_token), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  // ── Own profile ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn profile_is_created_on_first_access() {
    let state = make_state().await;
    let t = register(&state, "Ann", "ann@example.com").await;

    let first = json_body(send(&state, "GET", "/api/students/me", Some(&t), None).await).await;
    assert_eq!(first["name"], "Ann");
    assert_eq!(first["email"], "ann@example.com");
    assert_eq!(first["subjects"], json!([]));

    let second = json_body(send(&state, "GET", "/api/students/me", Some(&t), None).await).await;
    assert_eq!(first["id"], second["id"]);
  }

  #[tokio::test]
  async fn update_profile_filters_subjects_and_keeps_blank_course_out() {
    let state = make_state().await;
    let t = register(&state, "Ann", "ann@example.com").await;

    let resp = send(
      &state,
      "PUT",
      "/api/students/me",
      Some(&t),
      Some(json!({ "course": "  ", "subjects": ["Math", "Not Set", "", "null"] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["subjects"], json!(["Math"]));
    assert_eq!(body["course"], Value::Null);

    let again = json_body(send(&state, "GET", "/api/students/me", Some(&t), None).await).await;
    assert_eq!(again["subjects"], json!(["Math"]));
  }

  #[tokio::test]
  async fn update_profile_email_moves_login_email() {
    let state = make_state().await;
    let t = register(&state, "Ann", "ann@example.com").await;

    let resp = send(
      &state,
      "PUT",
      "/api/students/me",
      Some(&t),
      Some(json!({ "name": "Ann Lee", "email": "Ann.Lee@Example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["email"], "ann.lee@example.com");

    // The old token still resolves the same profile.
    let me = json_body(send(&state, "GET", "/api/students/me", Some(&t), None).await).await;
    assert_eq!(me["email"], "ann.lee@example.com");
    assert_eq!(me["name"], "Ann Lee");

    let resp = send(
      &state,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "ann.lee@example.com", "password": "pw" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["name"], "Ann Lee");
  }

  #[tokio::test]
  async fn update_profile_to_taken_email_is_rejected() {
    let state = make_state().await;
    let t = register(&state, "Ann", "ann@example.com").await;
    register(&state, "Bob", "bob@example.com").await;

    let resp = send(
      &state,
      "PUT",
      "/api/students/me",
      Some(&t),
      Some(json!({ "email": "BOB@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "email_taken");
  }

  #[tokio::test]
  async fn empty_profile_update_returns_profile_unchanged() {
    let state = make_state().await;
    let t = register(&state, "Ann", "ann@example.com").await;
    let before = json_body(send(&state, "GET", "/api/students/me", Some(&t), None).await).await;

    let resp = send(&state, "PUT", "/api/students/me", Some(&t), Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, before);
  }

  #[tokio::test]
  async fn failed_profile_update_keeps_login_email() {
    let store = ConflictingUpdates(SqliteStore::open_in_memory().await.unwrap());
    let state = AppState::new(Arc::new(store), AuthConfig::new(SECRET));
    let t = register(&state, "Ann", "ann@example.com").await;

    let resp = send(
      &state,
      "PUT",
      "/api/students/me",
      Some(&t),
      Some(json!({ "name": "Ann Lee", "email": "ann.lee@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "email_taken");

    let identity = state.store.find_identity_by_email("ann@example.com").await.unwrap().unwrap();
    assert_eq!(identity.name, "Ann");
    assert!(state.store.find_identity_by_email("ann.lee@example.com").await.unwrap().is_none());
  }

  // ── Roster ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_manages_roster() {
    let state = make_state().await;
    let t = admin_token(&state).await;

    let resp = send(
      &state,
      "POST",
      "/api/students",
      Some(&t),
      Some(json!({
        "name": "Cleo",
        "email": "Cleo@Example.com",
        "course": "Physics",
        "subjects": "Optics"
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["email"], "cleo@example.com");
    assert_eq!(created["subjects"], json!(["Optics"]));
    let id = created["id"].as_str().unwrap().to_owned();

    let list = json_body(send(&state, "GET", "/api/students", Some(&t), None).await).await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let resp = send(
      &state,
      "PUT",
      &format!("/api/students/{id}"),
      Some(&t),
      Some(json!({ "course": "Chemistry" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await;
    assert_eq!(updated["course"], "Chemistry");
    assert_eq!(updated["name"], "Cleo");

    let uri = format!("/api/students/{id}");
    let resp = send(&state, "DELETE", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Student deleted successfully");

    let resp = send(&state, "DELETE", &uri, Some(&t), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn create_student_validates_and_rejects_duplicates() {
    let state = make_state().await;
    let t = admin_token(&state).await;

    let resp = send(&state, "POST", "/api/students", Some(&t), Some(json!({ "name": "X" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "bad_request");

    let body = json!({ "name": "Dan", "email": "dan@example.com" });
    let resp = send(&state, "POST", "/api/students", Some(&t), Some(body.clone())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = send(&state, "POST", "/api/students", Some(&t), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "email_taken");
  }

  #[tokio::test]
  async fn update_unknown_student_returns_404() {
    let state = make_state().await;
    let t = admin_token(&state).await;
    let uri = format!("/api/students/{}", uuid::Uuid::new_v4());
    let resp = send(&state, "PUT", &uri, Some(&t), Some(json!({ "name": "Y" }))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn empty_roster_update_does_not_touch_student() {
    let state = make_state().await;
    let t = admin_token(&state).await;

    let resp = send(
      &state,
      "POST",
      "/api/students",
      Some(&t),
      Some(json!({ "name": "Eve", "email": "eve@example.com" })),
    )
    .await;
    let created = json_body(resp).await;
    let id = created["id"].as_str().unwrap().to_owned();

    let blank = json!({ "name": " ", "subjects": null });
    let resp = send(&state, "PUT", &format!("/api/students/{id}"), Some(&t), Some(blank)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["name"], "Eve");
    assert_eq!(body["updated_at"], created["updated_at"]);

    let missing = format!("/api/students/{}", Uuid::new_v4());
    let resp = send(&state, "PUT", &missing, Some(&t), Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn malformed_body_or_id_is_bad_request() {
    let state = make_state().await;

    let req = Request::builder()
      .method("POST")
      .uri("/api/auth/login")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "bad_request");

    let resp = send(&state, "POST", "/api/auth/login", None, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "bad_request");

    let t = admin_token(&state).await;
    let resp = send(&state, "PUT", "/api/students/not-a-uuid", Some(&t), Some(json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["error"], "bad_request");
  }
}
