//! Error type for `roster-store-sqlite`.

use roster_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A UNIQUE constraint rejected the write.
  #[error("email already in use: {0}")]
  EmailTaken(String),

  #[error("identity not found: {0}")]
  IdentityNotFound(uuid::Uuid),
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Error::EmailTaken(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
