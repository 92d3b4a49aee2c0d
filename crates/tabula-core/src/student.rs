//! Student profile records.
//!
//! Profiles are independent of accounts — there is no foreign key between
//! the two collections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::Gender;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
  pub id:        Uuid,
  pub name:      String,
  pub subject:   String,
  pub school:    String,
  pub dob:       NaiveDate,
  pub mobile_no: String,
  pub gender:    Gender,
}

/// Field set for creating a profile. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewStudent {
  pub name:      String,
  pub subject:   String,
  pub school:    String,
  pub dob:       NaiveDate,
  pub mobile_no: String,
  pub gender:    Gender,
}

/// Partial update for a profile. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
  pub name:      Option<String>,
  pub subject:   Option<String>,
  pub school:    Option<String>,
  pub dob:       Option<NaiveDate>,
  pub mobile_no: Option<String>,
  pub gender:    Option<Gender>,
}
