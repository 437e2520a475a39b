//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (nanosecond
//! precision, `Z` suffix) so they sort lexically. Subjects are stored as a
//! compact JSON array. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use roster_core::{
  identity::{Identity, Role},
  student::{Student, clean_subjects},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> &'static str { role.as_str() }

pub fn decode_role(s: &str) -> Result<Role> { Ok(s.parse()?) }

// ─── Subjects ─────────────────────────────────────────────────────────────────

/// Placeholders are dropped before anything reaches the column.
pub fn encode_subjects(subjects: &[String]) -> Result<String> {
  Ok(serde_json::to_string(&clean_subjects(subjects))?)
}

/// Rows written before filtering existed may still carry placeholders.
pub fn decode_subjects(s: &str) -> Result<Vec<String>> {
  let raw: Vec<String> = serde_json::from_str(s)?;
  Ok(clean_subjects(raw))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const IDENTITY_COLUMNS: &str =
  "identity_id, name, email, password_hash, role, created_at";

/// Raw strings read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id:   String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawIdentity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      identity_id:   row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      role:          row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    Ok(Identity {
      id:            decode_uuid(&self.identity_id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const STUDENT_COLUMNS: &str =
  "student_id, name, email, course, subjects, enrollment_date, created_at, updated_at";

/// Raw strings read directly from a `students` row.
pub struct RawStudent {
  pub student_id:      String,
  pub name:            String,
  pub email:           String,
  pub course:          Option<String>,
  pub subjects:        String,
  pub enrollment_date: String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawStudent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id:      row.get(0)?,
      name:            row.get(1)?,
      email:           row.get(2)?,
      course:          row.get(3)?,
      subjects:        row.get(4)?,
      enrollment_date: row.get(5)?,
      created_at:      row.get(6)?,
      updated_at:      row.get(7)?,
    })
  }

  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      id:              decode_uuid(&self.student_id)?,
      name:            self.name,
      email:           self.email,
      course:          self.course,
      subjects:        decode_subjects(&self.subjects)?,
      enrollment_date: decode_dt(&self.enrollment_date)?,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}
