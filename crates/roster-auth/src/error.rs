//! Error types for `roster-auth`.

use thiserror::Error;

/// Outcomes of [`Authenticator`](crate::Authenticator) calls.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("an account with this email already exists")]
  DuplicateEmail,

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("password hashing failed: {0}")]
  Hash(String),

  #[error("token error: {0}")]
  Token(#[from] TokenError),

  #[error("storage failure: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
  pub(crate) fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    AuthError::Storage(Box::new(e))
  }
}

/// Outcomes of [`TokenCodec`](crate::TokenCodec) calls.
#[derive(Debug, Error)]
pub enum TokenError {
  /// Bad signature, wrong secret, or malformed structure.
  #[error("invalid token")]
  InvalidToken,

  /// Signature verified, but the token is at or past its expiry.
  #[error("token expired")]
  Expired,

  #[error("failed to sign token: {0}")]
  Encode(#[source] jsonwebtoken::errors::Error),
}

/// Outcomes of [`AccessGuard`](crate::AccessGuard) checks.
#[derive(Debug, Error)]
pub enum GuardError {
  /// Missing or malformed header, bad or expired token. The reason is kept
  /// for diagnostics only.
  #[error("authentication required ({0})")]
  Unauthenticated(&'static str),

  #[error("insufficient role")]
  Forbidden,
}
