//! Access guard: bearer-token authentication and role authorization.
//!
//! The principal's role is taken verbatim from the token and never re-read
//! from storage. A role change therefore only takes effect once the user's
//! current token expires and they log in again; until then the old role is
//! honored.

use roster_core::identity::Role;
use tracing::debug;
use uuid::Uuid;

use crate::{GuardError, TokenCodec, TokenError, token::Claim};

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
  pub identity_id: Uuid,
  pub email:       String,
  pub role:        Role,
}

impl From<Claim> for Principal {
  fn from(c: Claim) -> Self {
    Self { identity_id: c.identity_id, email: c.email, role: c.role }
  }
}

#[derive(Clone)]
pub struct AccessGuard {
  codec: TokenCodec,
}

impl AccessGuard {
  pub fn new(codec: TokenCodec) -> Self { Self { codec } }

  /// Validate the raw `Authorization` header value.
  ///
  /// Every failure collapses to [`GuardError::Unauthenticated`]; the reason
  /// string only feeds the logs.
  pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, GuardError> {
    let header = authorization.ok_or(GuardError::Unauthenticated("missing authorization header"))?;
    let token = bearer_token(header)?;

    match self.codec.verify(token) {
      Ok(verified) => Ok(verified.claim.into()),
      Err(TokenError::Expired) => {
        debug!("rejected expired token");
        Err(GuardError::Unauthenticated("token expired"))
      }
      Err(e) => {
        debug!(error = %e, "rejected invalid token");
        Err(GuardError::Unauthenticated("invalid token"))
      }
    }
  }

  /// Require an exact role match. There is no hierarchy between roles.
  pub fn authorize(principal: &Principal, required: Role) -> Result<(), GuardError> {
    if principal.role == required {
      Ok(())
    } else {
      debug!(
        identity = %principal.identity_id,
        role = %principal.role,
        required = %required,
        "role check failed"
      );
      Err(GuardError::Forbidden)
    }
  }
}

/// Extract the token from a `Bearer <token>` header value.
fn bearer_token(header: &str) -> Result<&str, GuardError> {
  let malformed = GuardError::Unauthenticated("malformed authorization header");
  let mut parts = header.split_whitespace();

  let scheme = parts.next().ok_or(GuardError::Unauthenticated("empty authorization header"))?;
  if !scheme.eq_ignore_ascii_case("bearer") {
    return Err(malformed);
  }
  let token = parts.next().ok_or(GuardError::Unauthenticated("missing bearer token"))?;
  if parts.next().is_some() {
    return Err(malformed);
  }
  Ok(token)
}
