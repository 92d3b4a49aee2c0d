//! Account — an operator or student who can log in to the portal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What an account may do. Operators manage records; students only view
/// their own results through the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Female,
  Male,
  Other,
}

/// A stored account.
///
/// `password_hash` is an argon2 PHC string and is skipped on
/// serialisation — the secret never appears in an API response in any
/// form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  pub id:         Uuid,
  pub first_name: String,
  pub last_name:  String,
  /// Unique login identifier; the authentication key.
  pub login_id:   String,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub dob:        NaiveDate,
  pub gender:     Gender,
  pub role:       Role,
}

/// Field set for creating an account. The store assigns the id.
///
/// Carries the already-hashed secret; turning a plaintext password into a
/// PHC string is the API layer's job.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub first_name:    String,
  pub last_name:     String,
  pub login_id:      String,
  pub password_hash: String,
  pub dob:           NaiveDate,
  pub gender:        Gender,
  pub role:          Role,
}

/// Partial update for an account. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub login_id:      Option<String>,
  pub password_hash: Option<String>,
  pub dob:           Option<NaiveDate>,
  pub gender:        Option<Gender>,
  pub role:          Option<Role>,
}
