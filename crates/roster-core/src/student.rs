//! Student profiles: the roster records managed by administrators and edited
//! by students themselves.
//!
//! Subjects carry a handful of placeholder strings that older clients sent in
//! place of "no value". They are never real subjects, so [`clean_subjects`]
//! strips them and every write and read goes through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, identity::normalize_email};

/// Subject values that mean "nothing selected".
pub const SUBJECT_SENTINELS: &[&str] = &["Not Set", "undefined", "null"];

/// A persisted student profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id:              Uuid,
  pub name:            String,
  pub email:           String,
  pub course:          Option<String>,
  pub subjects:        Vec<String>,
  pub enrollment_date: DateTime<Utc>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

/// Input for creating a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
  pub name:     String,
  pub email:    String,
  pub course:   Option<String>,
  pub subjects: Vec<String>,
}

impl NewStudent {
  /// Validate and normalize. `name` and `email` must be non-blank.
  pub fn new(
    name: &str,
    email: &str,
    course: Option<&str>,
    subjects: impl IntoIterator<Item = impl AsRef<str>>,
  ) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::MissingField("name"));
    }
    let email = normalize_email(email);
    if email.is_empty() {
      return Err(Error::MissingField("email"));
    }
    Ok(Self {
      name: name.to_owned(),
      email,
      course: non_blank(course),
      subjects: clean_subjects(subjects),
    })
  }
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
  pub name:     Option<String>,
  pub email:    Option<String>,
  pub course:   Option<String>,
  pub subjects: Option<Vec<String>>,
}

impl StudentPatch {
  /// Apply the update rules: blank names, emails and courses are ignored,
  /// emails are normalized and subjects are filtered.
  pub fn normalized(self) -> Self {
    Self {
      name:     non_blank(self.name.as_deref()),
      email:    self
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty()),
      course:   non_blank(self.course.as_deref()),
      subjects: self.subjects.map(clean_subjects),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.email.is_none()
      && self.course.is_none()
      && self.subjects.is_none()
  }
}

/// Subjects as accepted over the wire: either a list or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SubjectsInput {
  Many(Vec<String>),
  One(String),
}

impl SubjectsInput {
  pub fn into_vec(self) -> Vec<String> {
    match self {
      SubjectsInput::Many(v) => v,
      SubjectsInput::One(s) => vec![s],
    }
  }
}

/// `true` if `subject` is blank or one of [`SUBJECT_SENTINELS`].
pub fn is_placeholder(subject: &str) -> bool {
  let trimmed = subject.trim();
  trimmed.is_empty() || SUBJECT_SENTINELS.contains(&trimmed)
}

/// Trim every subject and drop placeholders, preserving order.
pub fn clean_subjects(
  subjects: impl IntoIterator<Item = impl AsRef<str>>,
) -> Vec<String> {
  subjects
    .into_iter()
    .filter(|s| !is_placeholder(s.as_ref()))
    .map(|s| s.as_ref().trim().to_owned())
    .collect()
}

fn non_blank(value: Option<&str>) -> Option<String> {
  value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}
