//! Handlers for `/api/students` endpoints.
//!
//! | Method   | Path | Guard | Notes |
//! |----------|------|-------|-------|
//! | `GET`    | `/api/students/me` | signed in | Own profile, created on first access |
//! | `PUT`    | `/api/students/me` | signed in | Body: [`ProfileBody`] |
//! | `GET`    | `/api/students` | admin | Newest first |
//! | `POST`   | `/api/students` | admin | Body: [`ProfileBody`]; name and email required; returns 201 |
//! | `PUT`    | `/api/students/{id}` | admin | Body: [`ProfileBody`]; 404 if not found |
//! | `DELETE` | `/api/students/{id}` | admin | 404 if not found |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  identity::Identity,
  store::StudentStore,
  student::{NewStudent, Student, StudentPatch, SubjectsInput},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
  AppState,
  auth::{AdminOnly, Authenticated},
  error::ApiError,
  extract::{JsonBody, PathParam},
};

/// JSON body accepted by the create and update endpoints. Every field is
/// optional on update.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileBody {
  pub name:     Option<String>,
  pub email:    Option<String>,
  pub course:   Option<String>,
  pub subjects: Option<SubjectsInput>,
}

impl ProfileBody {
  fn into_patch(self) -> StudentPatch {
    StudentPatch {
      name:     self.name,
      email:    self.email,
      course:   self.course,
      subjects: self.subjects.map(SubjectsInput::into_vec),
    }
    .normalized()
  }
}

const NO_SUBJECTS: [&str; 0] = [];

/// The identity with `id`, as currently stored. Tokens outlive deletions.
async fn current_identity<S>(state: &AppState<S>, id: Uuid) -> Result<Identity, ApiError>
where
  S: StudentStore,
{
  state
    .store
    .get_identity(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::NotFound("User not found"))
}

/// The caller's profile, created from their identity if absent.
async fn own_profile<S>(state: &AppState<S>, identity: &Identity) -> Result<Student, ApiError>
where
  S: StudentStore,
{
  let seed = NewStudent::new(&identity.name, &identity.email, None, NO_SUBJECTS)?;
  state.store.get_or_create_student(seed).await.map_err(ApiError::store)
}

// ─── Own profile ──────────────────────────────────────────────────────────────

/// `GET /api/students/me`
pub async fn get_me<S>(
  State(state): State<AppState<S>>,
  Authenticated(principal): Authenticated,
) -> Result<Json<Student>, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  let identity = current_identity(&state, principal.identity_id).await?;
  Ok(Json(own_profile(&state, &identity).await?))
}

/// `PUT /api/students/me`
///
/// Name and email changes are mirrored onto the caller's identity, so a new
/// email becomes the login email. An empty body returns the profile as is.
pub async fn update_me<S>(
  State(state): State<AppState<S>>,
  Authenticated(principal): Authenticated,
  JsonBody(body): JsonBody<ProfileBody>,
) -> Result<Json<Student>, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  let mut identity = current_identity(&state, principal.identity_id).await?;
  let patch = body.into_patch();

  let new_email = patch.email.clone().filter(|e| *e != identity.email);
  if let Some(email) = &new_email {
    let student_clash = state
      .store
      .find_student_by_email(email)
      .await
      .map_err(ApiError::store)?
      .is_some();
    let identity_clash = state
      .store
      .find_identity_by_email(email)
      .await
      .map_err(ApiError::store)?
      .is_some();
    if student_clash || identity_clash {
      return Err(ApiError::EmailTaken);
    }
  }

  let profile = own_profile(&state, &identity).await?;
  if patch.is_empty() {
    return Ok(Json(profile));
  }

  // The identity is written first; a failed profile update restores it.
  let original = identity.clone();
  if let Some(email) = new_email {
    identity.email = email;
  }
  if let Some(name) = patch.name.clone() {
    identity.name = name;
  }
  let identity_changed = identity != original;
  if identity_changed {
    state.store.save_identity(&identity).await.map_err(ApiError::store)?;
  }

  match state.store.update_student(profile.id, patch).await {
    Ok(Some(updated)) => Ok(Json(updated)),
    outcome => {
      if identity_changed
        && let Err(e) = state.store.save_identity(&original).await
      {
        warn!(identity = %original.id, error = %e, "failed to restore identity");
      }
      Err(match outcome {
        Err(e) => ApiError::store(e),
        Ok(_) => ApiError::NotFound("Student profile not found"),
      })
    }
  }
}

// ─── Roster (admin) ───────────────────────────────────────────────────────────

/// `GET /api/students`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AdminOnly(_): AdminOnly,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  let students = state.store.list_students().await.map_err(ApiError::store)?;
  Ok(Json(students))
}

/// `POST /api/students`, returns 201 + the stored [`Student`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AdminOnly(admin): AdminOnly,
  JsonBody(body): JsonBody<ProfileBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  let subjects = body.subjects.map(SubjectsInput::into_vec).unwrap_or_default();
  let input = NewStudent::new(
    body.name.as_deref().unwrap_or_default(),
    body.email.as_deref().unwrap_or_default(),
    body.course.as_deref(),
    subjects,
  )?;

  let student = state.store.create_student(input).await.map_err(ApiError::store)?;
  info!(student = %student.id, by = %admin.email, "created student");
  Ok((StatusCode::CREATED, Json(student)))
}

/// `PUT /api/students/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  AdminOnly(_): AdminOnly,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<ProfileBody>,
) -> Result<Json<Student>, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  let patch = body.into_patch();
  let student = if patch.is_empty() {
    state.store.get_student(id).await
  } else {
    state.store.update_student(id, patch).await
  }
  .map_err(ApiError::store)?
  .ok_or(ApiError::NotFound("Student not found"))?;
  Ok(Json(student))
}

/// `DELETE /api/students/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  AdminOnly(admin): AdminOnly,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: StudentStore + Clone + 'static,
{
  if !state.store.delete_student(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound("Student not found"));
  }
  info!(student = %id, by = %admin.email, "deleted student");
  Ok(Json(json!({ "message": "Student deleted successfully" })))
}
