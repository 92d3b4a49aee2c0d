//! Credential authentication and the session gate.
//!
//! Login verifies the supplied secret against the account's argon2 PHC
//! string, then seeds the session store with the account as principal.
//! `require_session` is the gate layered over the protected sub-router:
//! only login and signup are mounted outside it, so any endpoint added
//! later is protected by default.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Extension, Json,
  extract::{Request, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use tabula_core::{
  account::{Account, Gender, NewAccount, Role},
  store::RecordStore,
};

use crate::{
  AppState,
  error::ApiError,
  session::{Principal, SESSION_COOKIE, SessionToken},
};

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::BadRequest(format!("cannot hash password: {e}")))
}

/// Check `password` against a stored PHC string.
fn verify_password(password: &str, stored_hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(stored_hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Session gate ────────────────────────────────────────────────────────────

/// Pull the session token from `Authorization: Bearer` or the session
/// cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
  if let Some(auth) = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    && let Some(token) = auth.strip_prefix("Bearer ")
  {
    return Some(token.trim().to_owned());
  }

  let cookies = headers.get(header::COOKIE).and_then(|v| v.to_str().ok())?;
  cookies.split(';').find_map(|pair| {
    let (name, value) = pair.trim().split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_owned())
  })
}

/// Middleware for the protected sub-router.
///
/// Resolves the request's token to a live principal, or rejects with 401
/// before any repository work happens. On success the [`Principal`] and
/// [`SessionToken`] are attached to the request extensions.
pub async fn require_session<S>(
  State(state): State<AppState<S>>,
  mut request: Request,
  next: Next,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  let token =
    extract_token(request.headers()).ok_or(ApiError::Unauthorized)?;
  let account =
    state.sessions.resolve(&token).ok_or(ApiError::Unauthorized)?;

  request.extensions_mut().insert(Principal(account));
  request.extensions_mut().insert(SessionToken(token));
  Ok(next.run(request).await)
}

fn session_cookie(token: &str) -> Result<HeaderValue, ApiError> {
  HeaderValue::from_str(&format!(
    "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax"
  ))
  .map_err(ApiError::store)
}

fn clear_session_cookie() -> Result<HeaderValue, ApiError> {
  HeaderValue::from_str(&format!(
    "{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0"
  ))
  .map_err(ApiError::store)
}

// ─── Login / logout ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
  pub login_id: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token:   String,
  pub account: Account,
  pub message: &'static str,
}

/// `POST /api/auth/login` — public.
///
/// Succeeds iff an account exists with exactly this `(loginId, password)`
/// pair; any other input yields the same `InvalidCredentials` reply, so a
/// caller cannot probe which login identifiers exist.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let account = state
    .store
    .find_account_by_login(&body.login_id)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::InvalidCredentials)?;

  if !verify_password(&body.password, &account.password_hash) {
    return Err(ApiError::InvalidCredentials);
  }

  let token = state.sessions.issue(account.clone());
  tracing::info!(login_id = %account.login_id, "session opened");

  let mut response = Json(LoginResponse {
    token: token.clone(),
    account,
    message: "authentication successful",
  })
  .into_response();
  response
    .headers_mut()
    .insert(header::SET_COOKIE, session_cookie(&token)?);
  Ok(response)
}

/// `POST /api/auth/logout` — protected; destroys the current session.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<Response, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
{
  state.sessions.remove(&token);
  tracing::info!("session closed");

  let mut response =
    Json(json!({ "message": "logout successful" })).into_response();
  response
    .headers_mut()
    .insert(header::SET_COOKIE, clear_session_cookie()?);
  Ok(response)
}

// ─── Signup ──────────────────────────────────────────────────────────────────

/// Account fields as supplied by signup and the operator add endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBody {
  pub first_name: String,
  pub last_name:  String,
  pub login_id:   String,
  pub password:   String,
  pub dob:        NaiveDate,
  pub gender:     Gender,
  pub role:       Role,
}

/// Create an account from the wire fields — shared by self-registration
/// and the operator add endpoint.
///
/// The lookup-then-insert pair is not atomic; the store's unique
/// constraint on `login_id` backstops the race.
pub(crate) async fn create_account<S>(
  state: &AppState<S>,
  body: AccountBody,
) -> Result<Account, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".into()));
  }

  if state
    .store
    .find_account_by_login(&body.login_id)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "an account with login id {:?} already exists",
      body.login_id
    )));
  }

  let new = NewAccount {
    first_name:    body.first_name,
    last_name:     body.last_name,
    login_id:      body.login_id,
    password_hash: hash_password(&body.password)?,
    dob:           body.dob,
    gender:        body.gender,
    role:          body.role,
  };

  state.store.add_account(new).await.map_err(ApiError::store)
}

/// `POST /api/auth/signup` — public self-registration.
pub async fn signup<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<AccountBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = create_account(&state, body).await?;
  tracing::info!(login_id = %record.login_id, "account registered");

  Ok((
    StatusCode::CREATED,
    Json(json!({ "record": record, "message": "data added successfully" })),
  ))
}
