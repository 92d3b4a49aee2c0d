//! Error types for `tabula-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Login identifiers are the authentication key and must stay unique
  /// within the account collection.
  #[error("an account with login id {0:?} already exists")]
  DuplicateLogin(String),

  #[error("page and limit must both be at least 1")]
  InvalidPage,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
