//! Handlers for `/api/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/auth/register` | Body: `{"name","email","password"}`; returns 201 |
//! | `POST` | `/api/auth/login` | Body: `{"email","password"}` |
//!
//! Both return [`SessionResponse`]. The password hash is never serialized.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use roster_auth::Session;
use roster_core::{
  identity::{Identity, Role},
  store::StudentStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::JsonBody};

/// Body returned by register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
  pub role:  Role,
  pub token: String,
}

impl SessionResponse {
  fn new(identity: Identity, token: String) -> Self {
    Self {
      id:    identity.id,
      name:  identity.name,
      email: identity.email,
      role:  identity.role,
      token,
    }
  }
}

impl From<Session> for SessionResponse {
  fn from(s: Session) -> Self { Self::new(s.identity, s.token) }
}

fn require<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
  if value.trim().is_empty() {
    Err(ApiError::BadRequest(format!("{field} is required")))
  } else {
    Ok(value)
  }
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  #[serde(default)]
  pub name:     String,
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

/// `POST /api/auth/register`, returns 201 + [`SessionResponse`].
pub async fn register<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  let name     = require(&body.name, "name")?;
  let email    = require(&body.email, "email")?;
  let password = require(&body.password, "password")?;

  let identity = state.auth.register(name, email, password).await?;
  let token    = state.auth.issue_token(&identity)?;
  Ok((StatusCode::CREATED, Json(SessionResponse::new(identity, token))))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

/// `POST /api/auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<SessionResponse>, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  let session = state.auth.login(&body.email, &body.password).await?;
  Ok(Json(session.into()))
}
