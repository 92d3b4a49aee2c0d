//! The session store backing the session gate.
//!
//! Sessions live in an in-memory token map handed to the router as part of
//! the application state — deliberately a value, not a process-wide
//! global, so a distributed backing could replace it behind the same
//! surface.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use parking_lot::RwLock;
use rand_core::{OsRng, RngCore as _};
use tabula_core::account::Account;
use uuid::Uuid;

/// Name of the cookie that carries the session token.
pub const SESSION_COOKIE: &str = "tabula_sid";

/// The authenticated account attached to the current request by the
/// session gate.
#[derive(Debug, Clone)]
pub struct Principal(pub Account);

/// The opaque token naming the current request's session entry.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// In-memory session store keyed by opaque token.
#[derive(Default)]
pub struct SessionStore {
  sessions: RwLock<HashMap<String, Account>>,
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Mint a fresh token bound to `account` and remember the session.
  pub fn issue(&self, account: Account) -> String {
    let token = generate_token();
    self.sessions.write().insert(token.clone(), account);
    token
  }

  /// The principal behind `token`, if the session is live.
  pub fn resolve(&self, token: &str) -> Option<Account> {
    self.sessions.read().get(token).cloned()
  }

  /// Drop one session. Returns `false` if the token was not live.
  pub fn remove(&self, token: &str) -> bool {
    self.sessions.write().remove(token).is_some()
  }

  /// Drop every session whose principal is `account_id`; used when the
  /// account itself is deleted. Returns the number of sessions revoked.
  pub fn revoke_principal(&self, account_id: Uuid) -> usize {
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, account| account.id != account_id);
    before - sessions.len()
  }
}

/// 256-bit random token, URL-safe base64 without padding.
fn generate_token() -> String {
  let mut buf = [0u8; 32];
  OsRng.fill_bytes(&mut buf);
  B64.encode(buf)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use tabula_core::account::{Account, Gender, Role};
  use uuid::Uuid;

  use super::*;

  fn account() -> Account {
    Account {
      id:            Uuid::new_v4(),
      first_name:    "Asha".into(),
      last_name:     "Verma".into(),
      login_id:      "asha@gmail.com".into(),
      password_hash: "hash".into(),
      dob:           NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
      gender:        Gender::Female,
      role:          Role::Admin,
    }
  }

  #[test]
  fn issue_then_resolve_returns_principal() {
    let store = SessionStore::new();
    let acct = account();
    let token = store.issue(acct.clone());
    assert_eq!(store.resolve(&token).unwrap().id, acct.id);
  }

  #[test]
  fn unknown_token_resolves_to_none() {
    let store = SessionStore::new();
    assert!(store.resolve("no-such-token").is_none());
  }

  #[test]
  fn remove_drops_the_session_once() {
    let store = SessionStore::new();
    let token = store.issue(account());
    assert!(store.remove(&token));
    assert!(!store.remove(&token));
    assert!(store.resolve(&token).is_none());
  }

  #[test]
  fn revoke_principal_drops_every_session_of_that_account() {
    let store = SessionStore::new();
    let acct = account();
    let other = account();

    let t1 = store.issue(acct.clone());
    let t2 = store.issue(acct.clone());
    let t3 = store.issue(other.clone());

    assert_eq!(store.revoke_principal(acct.id), 2);
    assert!(store.resolve(&t1).is_none());
    assert!(store.resolve(&t2).is_none());
    assert!(store.resolve(&t3).is_some());
  }

  #[test]
  fn tokens_are_unique_per_issue() {
    let store = SessionStore::new();
    let t1 = store.issue(account());
    let t2 = store.issue(account());
    assert_ne!(t1, t2);
  }
}
