//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("{0} is required")]
  MissingField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
