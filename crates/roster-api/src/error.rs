//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{"error": <kind>, "message": <text>}`. Kinds are
//! stable and meant for programmatic checks; messages are for humans.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use roster_auth::{AuthError, GuardError};
use roster_core::store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("User already exists")]
  DuplicateEmail,

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("Email already exists")]
  EmailTaken,

  #[error("{0}")]
  BadRequest(String),

  #[error("Authentication required")]
  Unauthenticated,

  #[error("Access denied")]
  Forbidden,

  #[error("{0}")]
  NotFound(&'static str),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn kind(&self) -> &'static str {
    match self {
      ApiError::DuplicateEmail => "duplicate_email",
      ApiError::InvalidCredentials => "invalid_credentials",
      ApiError::EmailTaken => "email_taken",
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Unauthenticated => "unauthenticated",
      ApiError::Forbidden => "forbidden",
      ApiError::NotFound(_) => "not_found",
      ApiError::Internal(_) => "internal",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::DuplicateEmail
      | ApiError::InvalidCredentials
      | ApiError::EmailTaken
      | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// Map a store error, surfacing uniqueness conflicts as [`ApiError::EmailTaken`].
  pub fn store(e: impl StoreError) -> Self {
    if e.is_conflict() { ApiError::EmailTaken } else { ApiError::Internal(Box::new(e)) }
  }
}

impl From<AuthError> for ApiError {
  fn from(e: AuthError) -> Self {
    match e {
      AuthError::DuplicateEmail => ApiError::DuplicateEmail,
      AuthError::InvalidCredentials => ApiError::InvalidCredentials,
      other => ApiError::Internal(Box::new(other)),
    }
  }
}

impl From<GuardError> for ApiError {
  fn from(e: GuardError) -> Self {
    match e {
      GuardError::Unauthenticated(reason) => {
        debug!(reason, "unauthenticated request");
        ApiError::Unauthenticated
      }
      GuardError::Forbidden => ApiError::Forbidden,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<roster_core::Error> for ApiError {
  fn from(e: roster_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::Internal(e) => {
        error!(error = %e, "request failed");
        "Internal server error".to_owned()
      }
      other => other.to_string(),
    };

    let mut res = (status, Json(json!({ "error": self.kind(), "message": message })))
      .into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
