//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every kind maps to its own status code; the body is always the
/// `{"error": <message>}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
  /// No valid session principal on a protected call.
  #[error("unauthorized")]
  Unauthorized,

  /// Login identifier and secret did not match any account.
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Login identifier already taken.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend failure. The underlying message is passed through to
  /// the envelope verbatim.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized | ApiError::InvalidCredentials => {
        (StatusCode::UNAUTHORIZED, self.to_string())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    tracing::warn!(status = %status.as_u16(), %message, "request failed");
    (status, Json(json!({ "error": message }))).into_response()
  }
}
