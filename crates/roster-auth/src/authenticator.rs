//! Registration, login, and the configured admin bootstrap.
//!
//! # Admin bootstrap
//!
//! When [`AuthConfig::admin`] is set, a login whose normalized email and raw
//! password equal the configured pair is an administrative login. The
//! matching identity is created (as `admin`) or promoted in place, and the
//! issued token always carries `role = admin`. The stored hash is not
//! consulted on this path: while the configuration is present it is the
//! source of truth for the admin password.

use std::sync::Arc;

use roster_core::{
  identity::{Identity, NewIdentity, Role, normalize_email},
  store::{CredentialStore, StoreError},
};
use tracing::{info, warn};

use crate::{
  AdminCredentials, AuthConfig, AuthError, TokenCodec,
  password::{hash_password, verify_password},
  token::Claim,
};

/// Display name given to a bootstrapped admin identity.
pub const ADMIN_NAME: &str = "Admin";

/// A successful login: the identity and a freshly issued token.
#[derive(Debug, Clone)]
pub struct Session {
  pub identity: Identity,
  pub token:    String,
}

pub struct Authenticator<S> {
  store:  Arc<S>,
  config: Arc<AuthConfig>,
  codec:  TokenCodec,
}

impl<S> Clone for Authenticator<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
      codec:  self.codec.clone(),
    }
  }
}

impl<S: CredentialStore> Authenticator<S> {
  pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
    let codec = TokenCodec::from_config(&config);
    Self { store, config, codec }
  }

  pub fn codec(&self) -> &TokenCodec { &self.codec }

  /// Create a `student` identity. Fails with [`AuthError::DuplicateEmail`] if
  /// the normalized email is already registered, including when a concurrent
  /// registration wins the race at the store.
  pub async fn register(
    &self,
    name: &str,
    email: &str,
    password: &str,
  ) -> Result<Identity, AuthError> {
    let email = normalize_email(email);
    if self
      .store
      .find_identity_by_email(&email)
      .await
      .map_err(AuthError::storage)?
      .is_some()
    {
      return Err(AuthError::DuplicateEmail);
    }

    let hash = hash_password(password)?;
    let identity = self
      .store
      .create_identity(NewIdentity::student(name, &email, hash))
      .await
      .map_err(|e| {
        if e.is_conflict() { AuthError::DuplicateEmail } else { AuthError::storage(e) }
      })?;

    info!(identity = %identity.id, email = %identity.email, "registered identity");
    Ok(identity)
  }

  /// Verify credentials and issue a token.
  pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
    let email = normalize_email(email);

    if let Some(admin) = &self.config.admin
      && email == admin.email
      && password == admin.password
    {
      return self.admin_login(admin).await;
    }

    let Some(identity) = self
      .store
      .find_identity_by_email(&email)
      .await
      .map_err(AuthError::storage)?
    else {
      warn!(%email, "login for unknown email");
      return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &identity.password_hash) {
      warn!(%email, "login with wrong password");
      return Err(AuthError::InvalidCredentials);
    }

    let token = self.issue(&identity, identity.role)?;
    Ok(Session { identity, token })
  }

  /// Sign a token for `identity` with its stored role.
  pub fn issue_token(&self, identity: &Identity) -> Result<String, AuthError> {
    self.issue(identity, identity.role)
  }

  fn issue(&self, identity: &Identity, role: Role) -> Result<String, AuthError> {
    let claim = Claim {
      identity_id: identity.id,
      email:       identity.email.clone(),
      role,
    };
    Ok(self.codec.issue(&claim)?)
  }

  async fn admin_login(&self, admin: &AdminCredentials) -> Result<Session, AuthError> {
    let identity = self.ensure_admin(admin).await?;
    let token = self.issue(&identity, Role::Admin)?;
    Ok(Session { identity, token })
  }

  /// Find, create, or promote the configured admin identity.
  async fn ensure_admin(&self, admin: &AdminCredentials) -> Result<Identity, AuthError> {
    let existing = self
      .store
      .find_identity_by_email(&admin.email)
      .await
      .map_err(AuthError::storage)?;

    if let Some(identity) = existing {
      return self.promote(identity).await;
    }

    let hash = hash_password(&admin.password)?;
    let new = NewIdentity {
      name:          ADMIN_NAME.to_owned(),
      email:         admin.email.clone(),
      password_hash: hash,
      role:          Role::Admin,
    };

    match self.store.create_identity(new).await {
      Ok(identity) => {
        info!(identity = %identity.id, email = %identity.email, "bootstrapped admin identity");
        Ok(identity)
      }
      // A concurrent bootstrap created it first; fall back to promotion.
      Err(e) if e.is_conflict() => {
        let identity = self
          .store
          .find_identity_by_email(&admin.email)
          .await
          .map_err(AuthError::storage)?
          .ok_or_else(|| AuthError::storage(e))?;
        self.promote(identity).await
      }
      Err(e) => Err(AuthError::storage(e)),
    }
  }

  /// Create an admin identity with its own password, or promote the identity
  /// already registered under `email`. Used for out-of-band provisioning;
  /// an existing identity keeps its password.
  pub async fn provision_admin(
    &self,
    name: &str,
    email: &str,
    password: &str,
  ) -> Result<Identity, AuthError> {
    let email = normalize_email(email);
    if let Some(existing) = self
      .store
      .find_identity_by_email(&email)
      .await
      .map_err(AuthError::storage)?
    {
      return self.promote(existing).await;
    }

    let hash = hash_password(password)?;
    let new = NewIdentity::student(name, &email, hash).with_role(Role::Admin);
    let identity = self.store.create_identity(new).await.map_err(|e| {
      if e.is_conflict() { AuthError::DuplicateEmail } else { AuthError::storage(e) }
    })?;
    info!(identity = %identity.id, email = %identity.email, "provisioned admin identity");
    Ok(identity)
  }

  /// Promote an identity to admin in place. Promoting an admin is a no-op.
  pub async fn promote(&self, mut identity: Identity) -> Result<Identity, AuthError> {
    if identity.role == Role::Admin {
      return Ok(identity);
    }
    identity.role = Role::Admin;
    let saved = self
      .store
      .save_identity(&identity)
      .await
      .map_err(AuthError::storage)?;
    info!(identity = %saved.id, email = %saved.email, "promoted identity to admin");
    Ok(saved)
  }
}
