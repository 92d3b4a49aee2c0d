//! JSON API layer for the Tabula records service.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`]. Everything is
//! mounted under `/api`; the login and signup routes are the only ones
//! reachable without a session — every other route sits behind the
//! session-gate middleware.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod marksheets;
pub mod session;
pub mod students;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tabula_core::store::RecordStore;

use session::SessionStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: RecordStore> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionStore>,
}

// ─── Wire types ───────────────────────────────────────────────────────────────

/// The uniform reply of every paginated search endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
  pub items:       Vec<T>,
  pub total_count: u64,
  pub page:        u32,
  pub total_pages: u64,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the records service.
///
/// The public routes are an explicit allow-list; a route added to the
/// protected sub-router later is gated without further wiring.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let public = Router::new()
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/signup", post(auth::signup::<S>));

  let protected = Router::new()
    .route("/auth/logout", post(auth::logout::<S>))
    // Accounts
    .route("/accounts", post(accounts::add::<S>))
    .route("/accounts/search", get(accounts::search::<S>))
    .route(
      "/accounts/{id}",
      get(accounts::get_one::<S>).post(accounts::update_one::<S>),
    )
    .route("/accounts/{id}/delete", post(accounts::delete_one::<S>))
    // Students
    .route("/students", post(students::add::<S>))
    .route("/students/search", get(students::search::<S>))
    .route("/students/preload", get(students::preload::<S>))
    .route(
      "/students/{id}",
      get(students::get_one::<S>).post(students::update_one::<S>),
    )
    .route("/students/{id}/delete", post(students::delete_one::<S>))
    // Marksheets
    .route("/marksheets", post(marksheets::add::<S>))
    .route("/marksheets/search", get(marksheets::search::<S>))
    .route("/marksheets/merit-list", get(marksheets::merit_list::<S>))
    .route(
      "/marksheets/{id}",
      get(marksheets::get_one::<S>).post(marksheets::update_one::<S>),
    )
    .route("/marksheets/{id}/delete", post(marksheets::delete_one::<S>))
    .route_layer(middleware::from_fn_with_state(
      state.clone(),
      auth::require_session::<S>,
    ));

  Router::new()
    .nest("/api", public.merge(protected))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
