//! Handlers for the `/students` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/students` | 201 |
//! | `GET`  | `/students/search` | `?name&subject&mobileNo&page&limit` |
//! | `GET`  | `/students/preload` | All names, for the marksheet form |
//! | `GET`  | `/students/{id}` | 404 if not found |
//! | `POST` | `/students/{id}` | Partial update |
//! | `POST` | `/students/{id}/delete` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use tabula_core::{
  account::Gender,
  query::{Page, StudentFilter},
  store::RecordStore,
  student::{NewStudent, StudentPatch, StudentProfile},
};

use crate::{AppState, SearchResponse, error::ApiError};

// ─── Add ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentBody {
  pub name:      String,
  pub subject:   String,
  pub school:    String,
  pub dob:       NaiveDate,
  pub mobile_no: String,
  pub gender:    Gender,
}

/// `POST /students`
pub async fn add<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<StudentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let new = NewStudent {
    name:      body.name,
    subject:   body.subject,
    school:    body.school,
    dob:       body.dob,
    mobile_no: body.mobile_no,
    gender:    body.gender,
  };

  let record = state.store.add_student(new).await.map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "record": record, "message": "data added successfully" })),
  ))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub name:      Option<String>,
  pub subject:   Option<String>,
  pub mobile_no: Option<String>,
  pub page:      Option<u32>,
  pub limit:     Option<u32>,
}

/// `GET /students/search[?name=...][&subject=...][&mobileNo=...]`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse<StudentProfile>>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = Page::new(params.page, params.limit)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let filter = StudentFilter {
    name:      params.name,
    subject:   params.subject,
    mobile_no: params.mobile_no,
  };

  let items = state
    .store
    .search_students(&filter, page)
    .await
    .map_err(ApiError::store)?;
  let total = state
    .store
    .count_students(&filter)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(SearchResponse {
    items,
    total_count: total,
    page: page.page(),
    total_pages: page.total_pages(total),
  }))
}

// ─── Preload ──────────────────────────────────────────────────────────────────

/// `GET /students/preload` — every student name, for the marksheet form's
/// dropdown.
pub async fn preload<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let names = state.store.student_names().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "students": names })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /students/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<StudentProfile>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let student = state
    .store
    .get_student(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  Ok(Json(student))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub name:      Option<String>,
  pub subject:   Option<String>,
  pub school:    Option<String>,
  pub dob:       Option<NaiveDate>,
  pub mobile_no: Option<String>,
  pub gender:    Option<Gender>,
}

/// `POST /students/{id}` — partial update; absent fields stay untouched.
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<StudentProfile>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let patch = StudentPatch {
    name:      body.name,
    subject:   body.subject,
    school:    body.school,
    dob:       body.dob,
    mobile_no: body.mobile_no,
    gender:    body.gender,
  };

  let updated = state
    .store
    .update_student(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /students/{id}/delete`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_student(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("student {id} not found")));
  }
  Ok(Json(json!({ "message": "student deleted successfully" })))
}
