//! [`SqliteStore`], the SQLite implementation of [`CredentialStore`] and
//! [`StudentStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use roster_core::{
  identity::{Identity, NewIdentity},
  store::{CredentialStore, StudentStore},
  student::{NewStudent, Student, StudentPatch, clean_subjects},
};

use crate::{
  Error, Result,
  encode::{
    IDENTITY_COLUMNS, RawIdentity, RawStudent, STUDENT_COLUMNS, encode_dt,
    encode_role, encode_subjects, encode_uuid,
  },
  schema::SCHEMA,
};

/// Result of a write that may trip a UNIQUE constraint.
enum Write<T> {
  Done(T),
  Conflict,
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn student_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<Student>> {
    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE {column} = ?1"),
            rusqlite::params![value],
            RawStudent::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn identity_where(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE {column} = ?1"),
            rusqlite::params![value],
            RawIdentity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  type Error = Error;

  async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>> {
    self.identity_where("email", email.to_owned()).await
  }

  async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>> {
    self.identity_where("identity_id", encode_uuid(id)).await
  }

  async fn create_identity(&self, input: NewIdentity) -> Result<Identity> {
    let identity = Identity {
      id:            Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(identity.id);
    let name     = identity.name.clone();
    let email    = identity.email.clone();
    let hash     = identity.password_hash.clone();
    let role_str = encode_role(identity.role);
    let at_str   = encode_dt(identity.created_at);

    let outcome = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO identities (identity_id, name, email, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, hash, role_str, at_str],
        ) {
          Ok(_) => Ok(Write::Done(())),
          Err(e) if is_unique_violation(&e) => Ok(Write::Conflict),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Write::Done(()) => Ok(identity),
      Write::Conflict => Err(Error::EmailTaken(identity.email)),
    }
  }

  async fn save_identity(&self, identity: &Identity) -> Result<Identity> {
    let id_str   = encode_uuid(identity.id);
    let name     = identity.name.clone();
    let email    = identity.email.clone();
    let hash     = identity.password_hash.clone();
    let role_str = encode_role(identity.role);

    let outcome = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "UPDATE identities
           SET name = ?2, email = ?3, password_hash = ?4, role = ?5
           WHERE identity_id = ?1",
          rusqlite::params![id_str, name, email, hash, role_str],
        ) {
          Ok(changed) => Ok(Write::Done(changed)),
          Err(e) if is_unique_violation(&e) => Ok(Write::Conflict),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Write::Done(0) => Err(Error::IdentityNotFound(identity.id)),
      Write::Done(_) => Ok(identity.clone()),
      Write::Conflict => Err(Error::EmailTaken(identity.email.clone())),
    }
  }
}

// ─── StudentStore impl ───────────────────────────────────────────────────────

impl StudentStore for SqliteStore {
  async fn list_students(&self) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {STUDENT_COLUMNS} FROM students
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawStudent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
    self.student_where("student_id", encode_uuid(id)).await
  }

  async fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
    self.student_where("email", email.to_owned()).await
  }

  async fn create_student(&self, input: NewStudent) -> Result<Student> {
    let now = Utc::now();
    let student = Student {
      id:              Uuid::new_v4(),
      name:            input.name,
      email:           input.email,
      course:          input.course,
      subjects:        clean_subjects(&input.subjects),
      enrollment_date: now,
      created_at:      now,
      updated_at:      now,
    };

    let id_str       = encode_uuid(student.id);
    let name         = student.name.clone();
    let email        = student.email.clone();
    let course       = student.course.clone();
    let subjects_str = encode_subjects(&student.subjects)?;
    let at_str       = encode_dt(now);

    let outcome = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO students (
             student_id, name, email, course, subjects,
             enrollment_date, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?6)",
          rusqlite::params![id_str, name, email, course, subjects_str, at_str],
        ) {
          Ok(_) => Ok(Write::Done(())),
          Err(e) if is_unique_violation(&e) => Ok(Write::Conflict),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match outcome {
      Write::Done(()) => Ok(student),
      Write::Conflict => Err(Error::EmailTaken(student.email)),
    }
  }

  async fn get_or_create_student(&self, input: NewStudent) -> Result<Student> {
    let id_str       = encode_uuid(Uuid::new_v4());
    let at_str       = encode_dt(Utc::now());
    let subjects_str = encode_subjects(&input.subjects)?;
    let NewStudent { name, email, course, .. } = input;

    let raw: RawStudent = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO students (
             student_id, name, email, course, subjects,
             enrollment_date, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6, ?6)
           ON CONFLICT(email) DO NOTHING",
          rusqlite::params![id_str, name, email, course, subjects_str, at_str],
        )?;
        let raw = tx.query_row(
          &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE email = ?1"),
          rusqlite::params![email],
          RawStudent::from_row,
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_student()
  }

  async fn update_student(
    &self,
    id: Uuid,
    patch: StudentPatch,
  ) -> Result<Option<Student>> {
    let patch        = patch.normalized();
    let id_str       = encode_uuid(id);
    let subjects_str = patch.subjects.as_deref().map(encode_subjects).transpose()?;
    let at_str       = encode_dt(Utc::now());
    let StudentPatch { name, email, course, .. } = patch;
    let conflict_email = email.clone().unwrap_or_default();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = match tx.execute(
          "UPDATE students SET
             name       = COALESCE(?2, name),
             email      = COALESCE(?3, email),
             course     = COALESCE(?4, course),
             subjects   = COALESCE(?5, subjects),
             updated_at = ?6
           WHERE student_id = ?1",
          rusqlite::params![id_str, name, email, course, subjects_str, at_str],
        ) {
          Ok(changed) => changed,
          Err(e) if is_unique_violation(&e) => return Ok(Write::Conflict),
          Err(e) => return Err(e.into()),
        };
        if changed == 0 {
          return Ok(Write::Done(None));
        }
        let raw = tx.query_row(
          &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"),
          rusqlite::params![id_str],
          RawStudent::from_row,
        )?;
        tx.commit()?;
        Ok(Write::Done(Some(raw)))
      })
      .await?;

    match outcome {
      Write::Done(raw) => raw.map(RawStudent::into_student).transpose(),
      Write::Conflict => Err(Error::EmailTaken(conflict_email)),
    }
  }

  async fn delete_student(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM students WHERE student_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
