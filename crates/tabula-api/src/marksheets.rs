//! Handlers for the `/marksheets` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/marksheets` | 201 |
//! | `GET`  | `/marksheets/search` | `?name&rollNo&page&limit` |
//! | `GET`  | `/marksheets/merit-list` | Ranked read-only projection |
//! | `GET`  | `/marksheets/{id}` | 404 if not found |
//! | `POST` | `/marksheets/{id}` | Partial update |
//! | `POST` | `/marksheets/{id}/delete` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use tabula_core::{
  marksheet::{Marksheet, MarksheetPatch, NewMarksheet},
  query::{MarksheetFilter, Page},
  store::RecordStore,
};

use crate::{AppState, SearchResponse, error::ApiError};

// ─── Add ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksheetBody {
  pub name:      String,
  pub roll_no:   String,
  pub physics:   f64,
  pub chemistry: f64,
  pub maths:     f64,
}

/// `POST /marksheets`
pub async fn add<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<MarksheetBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let new = NewMarksheet {
    name:      body.name,
    roll_no:   body.roll_no,
    physics:   body.physics,
    chemistry: body.chemistry,
    maths:     body.maths,
  };

  let record =
    state.store.add_marksheet(new).await.map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "record": record, "message": "data added successfully" })),
  ))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub name:    Option<String>,
  pub roll_no: Option<String>,
  pub page:    Option<u32>,
  pub limit:   Option<u32>,
}

/// `GET /marksheets/search[?name=...][&rollNo=...]`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse<Marksheet>>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = Page::new(params.page, params.limit)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let filter = MarksheetFilter {
    name:    params.name,
    roll_no: params.roll_no,
  };

  let items = state
    .store
    .search_marksheets(&filter, page)
    .await
    .map_err(ApiError::store)?;
  let total = state
    .store
    .count_marksheets(&filter)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(SearchResponse {
    items,
    total_count: total,
    page: page.page(),
    total_pages: page.total_pages(total),
  }))
}

// ─── Merit list ───────────────────────────────────────────────────────────────

/// `GET /marksheets/merit-list` — all marksheets ranked by descending
/// total score.
pub async fn merit_list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Marksheet>>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let ranked = state.store.merit_list().await.map_err(ApiError::store)?;
  Ok(Json(ranked))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /marksheets/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Marksheet>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let marksheet = state
    .store
    .get_marksheet(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("marksheet {id} not found")))?;
  Ok(Json(marksheet))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub name:      Option<String>,
  pub roll_no:   Option<String>,
  pub physics:   Option<f64>,
  pub chemistry: Option<f64>,
  pub maths:     Option<f64>,
}

/// `POST /marksheets/{id}` — partial update; absent fields stay untouched.
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Marksheet>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let patch = MarksheetPatch {
    name:      body.name,
    roll_no:   body.roll_no,
    physics:   body.physics,
    chemistry: body.chemistry,
    maths:     body.maths,
  };

  let updated = state
    .store
    .update_marksheet(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("marksheet {id} not found")))?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /marksheets/{id}/delete`
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
    .delete_marksheet(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("marksheet {id} not found")));
  }
  Ok(Json(json!({ "message": "marksheet deleted successfully" })))
}
