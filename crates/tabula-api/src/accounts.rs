//! Handlers for the `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts` | Operator-created account; 201 |
//! | `GET`  | `/accounts/search` | `?firstName&lastName&loginId&page&limit` |
//! | `GET`  | `/accounts/{id}` | 404 if not found |
//! | `POST` | `/accounts/{id}` | Partial update |
//! | `POST` | `/accounts/{id}/delete` | Also revokes the account's sessions |

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use tabula_core::{
  account::{Account, AccountPatch, Gender, Role},
  query::{AccountFilter, Page},
  store::RecordStore,
};

use crate::{
  AppState, SearchResponse,
  auth::{self, AccountBody},
  error::ApiError,
  session::Principal,
};

// ─── Add ──────────────────────────────────────────────────────────────────────

/// `POST /accounts` — same create path as signup, behind the session gate.
pub async fn add<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<AccountBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = auth::create_account(&state, body).await?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "record": record, "message": "data added successfully" })),
  ))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub login_id:   Option<String>,
  pub page:       Option<u32>,
  pub limit:      Option<u32>,
}

/// `GET /accounts/search[?firstName=...][&lastName=...][&loginId=...]`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse<Account>>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let page = Page::new(params.page, params.limit)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let filter = AccountFilter {
    first_name: params.first_name,
    last_name:  params.last_name,
    login_id:   params.login_id,
  };

  // Both store calls take the identical filter so the reported total stays
  // consistent with the fetched page.
  let items = state
    .store
    .search_accounts(&filter, page)
    .await
    .map_err(ApiError::store)?;
  let total = state
    .store
    .count_accounts(&filter)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(SearchResponse {
    items,
    total_count: total,
    page: page.page(),
    total_pages: page.total_pages(total),
  }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /accounts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account = state
    .store
    .get_account(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;
  Ok(Json(account))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub login_id:   Option<String>,
  pub password:   Option<String>,
  pub dob:        Option<NaiveDate>,
  pub gender:     Option<Gender>,
  pub role:       Option<Role>,
}

/// `POST /accounts/{id}` — partial update; absent fields stay untouched.
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Account>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Moving to a login id another account holds is a conflict, same as at
  // creation.
  if let Some(login_id) = &body.login_id
    && let Some(existing) = state
      .store
      .find_account_by_login(login_id)
      .await
      .map_err(ApiError::store)?
    && existing.id != id
  {
    return Err(ApiError::Conflict(format!(
      "an account with login id {login_id:?} already exists"
    )));
  }

  let password_hash = body
    .password
    .as_deref()
    .filter(|p| !p.is_empty())
    .map(auth::hash_password)
    .transpose()?;

  let patch = AccountPatch {
    first_name: body.first_name,
    last_name:  body.last_name,
    login_id:   body.login_id,
    password_hash,
    dob:        body.dob,
    gender:     body.gender,
    role:       body.role,
  };

  let updated = state
    .store
    .update_account(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `POST /accounts/{id}/delete`
///
/// Deleting an account also revokes its live sessions, so a deleted
/// operator cannot keep acting on a stale token.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Extension(Principal(actor)): Extension<Principal>,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_account(id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    return Err(ApiError::NotFound(format!("account {id} not found")));
  }

  tracing::info!(actor = %actor.login_id, %id, "account deleted");
  let revoked = state.sessions.revoke_principal(id);
  if revoked > 0 {
    tracing::info!(%id, revoked, "revoked sessions of deleted account");
  }

  Ok(Json(json!({ "message": "account deleted successfully" })))
}
