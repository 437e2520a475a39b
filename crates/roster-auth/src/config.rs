//! Immutable authentication settings, built once at startup.

use chrono::Duration;
use roster_core::identity::normalize_email;

/// Default token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// The configured administrator login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
  /// Normalized.
  pub email:    String,
  /// Compared verbatim against the submitted password.
  pub password: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
  pub jwt_secret: String,
  pub token_ttl:  Duration,
  pub admin:      Option<AdminCredentials>,
}

impl AuthConfig {
  pub fn new(jwt_secret: impl Into<String>) -> Self {
    Self {
      jwt_secret: jwt_secret.into(),
      token_ttl:  Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
      admin:      None,
    }
  }

  pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
    self.token_ttl = ttl;
    self
  }

  /// Enable the admin bootstrap. Both values must be present; a blank email
  /// or password leaves the bootstrap disabled.
  pub fn with_admin(mut self, email: Option<&str>, password: Option<&str>) -> Self {
    self.admin = match (email.map(normalize_email), password) {
      (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
        Some(AdminCredentials { email, password: password.to_owned() })
      }
      _ => None,
    };
    self
  }
}
