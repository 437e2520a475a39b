//! Authentication and authorization for the roster service.
//!
//! - [`token`]: stateless signing and verification of identity claims.
//! - [`authenticator`]: registration, login, and the configured admin
//!   bootstrap.
//! - [`guard`]: bearer-token authentication and role checks for incoming
//!   requests.
//!
//! Everything here is transport-agnostic; `roster-api` adapts it to axum.

pub mod authenticator;
pub mod config;
pub mod error;
pub mod guard;
pub mod password;
pub mod token;

pub use authenticator::{Authenticator, Session};
pub use config::{AdminCredentials, AuthConfig};
pub use error::{AuthError, GuardError, TokenError};
pub use guard::{AccessGuard, Principal};
pub use token::{Claim, TokenCodec};
