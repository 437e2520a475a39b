//! Storage traits for identities and student profiles.
//!
//! The traits are implemented by storage backends (e.g. `roster-store-sqlite`).
//! Higher layers (`roster-auth`, `roster-api`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Every method is a single atomic unit in the backend. Email uniqueness is
//! enforced by the backend and reported through [`StoreError::is_conflict`];
//! callers rely on it to arbitrate concurrent registrations.

use std::future::Future;

use uuid::Uuid;

use crate::{
  identity::{Identity, NewIdentity},
  student::{NewStudent, Student, StudentPatch},
};

/// Error bound for store backends.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` when the write collided with an existing unique key (an email).
  fn is_conflict(&self) -> bool;
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Persistence for [`Identity`] records.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CredentialStore: Send + Sync {
  type Error: StoreError;

  /// Look up an identity by its normalized email.
  fn find_identity_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Retrieve an identity by id. Returns `None` if not found.
  fn get_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Persist a new identity. The id and `created_at` are assigned by the store.
  /// Fails with a conflict if the email is already registered.
  fn create_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of an existing identity, matched by id.
  fn save_identity<'a>(
    &'a self,
    identity: &'a Identity,
  ) -> impl Future<Output = Result<Identity, Self::Error>> + Send + 'a;
}

// ─── Students ────────────────────────────────────────────────────────────────

/// Persistence for the student roster.
///
/// Backends normalize subjects on every write and every read, so callers never
/// observe placeholder values.
pub trait StudentStore: CredentialStore {
  /// All students, newest first.
  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  fn find_student_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + 'a;

  /// Insert a student. Fails with a conflict if the email is taken.
  fn create_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Return the student registered under `input.email`, inserting `input`
  /// first if there is none.
  fn get_or_create_student(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Apply a (normalized) patch. Returns `None` if the student does not exist.
  fn update_student(
    &self,
    id: Uuid,
    patch: StudentPatch,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Delete a student. Returns `false` if nothing was deleted.
  fn delete_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
