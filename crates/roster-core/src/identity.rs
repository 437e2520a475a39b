//! Identity: the stored credential record behind every login.
//!
//! An identity is keyed by its normalized email. The password hash never
//! leaves the storage and authentication layers, so [`Identity`] is
//! not `Serialize`.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Access level attached to an identity and embedded in its tokens.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  Student,
  Admin,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Student => "student",
      Role::Admin => "admin",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "student" => Ok(Role::Student),
      "admin" => Ok(Role::Admin),
      other => Err(Error::UnknownRole(other.to_owned())),
    }
  }
}

/// A persisted credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub id:            Uuid,
  pub name:          String,
  /// Always stored normalized; see [`normalize_email`].
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
}

/// Input for [`CredentialStore::create_identity`](crate::store::CredentialStore::create_identity).
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}

impl NewIdentity {
  /// A `student` identity; the email is normalized here.
  pub fn student(name: &str, email: &str, password_hash: String) -> Self {
    Self {
      name: name.trim().to_owned(),
      email: normalize_email(email),
      password_hash,
      role: Role::Student,
    }
  }

  pub fn with_role(mut self, role: Role) -> Self {
    self.role = role;
    self
  }
}

/// Canonical lookup form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
  email.trim().to_lowercase()
}
