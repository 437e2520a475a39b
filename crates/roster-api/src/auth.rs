//! Bearer-token extractors backed by the [`AccessGuard`](roster_auth::AccessGuard).
//!
//! Handlers opt in by taking [`Authenticated`] (any signed-in user) or
//! [`AdminOnly`] (role `admin`). Both run before the handler body, so a
//! rejected request never reaches the store.

use axum::{
  extract::FromRequestParts,
  http::{header::AUTHORIZATION, request::Parts},
};
use roster_auth::{AccessGuard, Principal};
use roster_core::{identity::Role, store::StudentStore};

use crate::{AppState, error::ApiError};

/// Present in the handler means the request carried a valid token.
pub struct Authenticated(pub Principal);

/// Present in the handler means the token's role is `admin`.
pub struct AdminOnly(pub Principal);

fn authenticate<S>(parts: &Parts, state: &AppState<S>) -> Result<Principal, ApiError> {
  let header = parts
    .headers
    .get(AUTHORIZATION)
    .map(|v| v.to_str().map_err(|_| ApiError::Unauthenticated))
    .transpose()?;
  Ok(state.guard.authenticate(header)?)
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: StudentStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(parts, state).map(Authenticated)
  }
}

impl<S> FromRequestParts<AppState<S>> for AdminOnly
where
  S: StudentStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let principal = authenticate(parts, state)?;
    AccessGuard::authorize(&principal, Role::Admin)?;
    Ok(AdminOnly(principal))
  }
}
