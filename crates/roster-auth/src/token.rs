//! Signed, time-limited identity tokens (HS256 JWTs).
//!
//! A token binds a [`Claim`] plus issue and expiry timestamps under an HMAC
//! keyed by the process-wide secret. Verification checks the signature first
//! and the expiry second, so a forged token always reports
//! [`TokenError::InvalidToken`] and only a genuine one can report
//! [`TokenError::Expired`]. Nothing is stored server-side.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use roster_core::identity::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{AuthConfig, TokenError};

/// Identity data carried by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
  pub identity_id: Uuid,
  pub email:       String,
  pub role:        Role,
}

/// A claim whose signature has been verified and which has not expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaim {
  pub claim:      Claim,
  pub issued_at:  DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

/// JWT payload as it appears on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
  sub:   Uuid,
  email: String,
  role:  Role,
  iat:   i64,
  exp:   i64,
}

/// Sign `claim`, expiring `ttl` after now. A non-positive `ttl` yields a token
/// that is already expired.
pub fn encode(claim: &Claim, secret: &[u8], ttl: Duration) -> Result<String, TokenError> {
  encode_with_key(claim, &EncodingKey::from_secret(secret), ttl)
}

/// Verify `token` against `secret`.
pub fn decode(token: &str, secret: &[u8]) -> Result<VerifiedClaim, TokenError> {
  decode_with_key(token, &DecodingKey::from_secret(secret))
}

fn encode_with_key(
  claim: &Claim,
  key: &EncodingKey,
  ttl: Duration,
) -> Result<String, TokenError> {
  let now = Utc::now();
  let wire = WireClaims {
    sub:   claim.identity_id,
    email: claim.email.clone(),
    role:  claim.role,
    iat:   now.timestamp(),
    exp:   expiry(now, ttl),
  };
  jsonwebtoken::encode(&Header::new(Algorithm::HS256), &wire, key)
    .map_err(TokenError::Encode)
}

/// Expiry in whole seconds. A positive `ttl` is rounded up so the token lives
/// at least that long; the result never exceeds the largest representable
/// timestamp.
fn expiry(now: DateTime<Utc>, ttl: Duration) -> i64 {
  let exp = if ttl > Duration::zero() {
    now
      .timestamp_millis()
      .saturating_add(ttl.num_milliseconds())
      .saturating_add(999)
      .div_euclid(1000)
  } else {
    now.timestamp().saturating_add(ttl.num_seconds())
  };
  exp.min(DateTime::<Utc>::MAX_UTC.timestamp())
}

/// Seconds since the epoch, clamped into chrono's range.
fn timestamp(secs: i64) -> DateTime<Utc> {
  DateTime::from_timestamp(secs, 0).unwrap_or(if secs < 0 {
    DateTime::<Utc>::MIN_UTC
  } else {
    DateTime::<Utc>::MAX_UTC
  })
}

fn decode_with_key(token: &str, key: &DecodingKey) -> Result<VerifiedClaim, TokenError> {
  // Expiry is checked below so that it is exact and reported separately.
  let mut validation = Validation::new(Algorithm::HS256);
  validation.validate_exp = false;
  validation.leeway = 0;

  let wire = jsonwebtoken::decode::<WireClaims>(token, key, &validation)
    .map_err(|e| {
      debug!(error = %e, "token rejected");
      TokenError::InvalidToken
    })?
    .claims;

  if Utc::now().timestamp() >= wire.exp {
    return Err(TokenError::Expired);
  }

  Ok(VerifiedClaim {
    claim:      Claim { identity_id: wire.sub, email: wire.email, role: wire.role },
    issued_at:  timestamp(wire.iat),
    expires_at: timestamp(wire.exp),
  })
}

/// Keys and lifetime bound once from [`AuthConfig`].
#[derive(Clone)]
pub struct TokenCodec {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      Duration,
}

impl TokenCodec {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      ttl,
    }
  }

  pub fn from_config(config: &AuthConfig) -> Self {
    Self::new(config.jwt_secret.as_bytes(), config.token_ttl)
  }

  pub fn issue(&self, claim: &Claim) -> Result<String, TokenError> {
    encode_with_key(claim, &self.encoding, self.ttl)
  }

  pub fn verify(&self, token: &str) -> Result<VerifiedClaim, TokenError> {
    decode_with_key(token, &self.decoding)
  }
}
