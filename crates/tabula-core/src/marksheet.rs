//! Marksheet — per-student subject scores.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marksheet {
  pub id:        Uuid,
  /// Student name as free text; not a key into the profile collection.
  pub name:      String,
  pub roll_no:   String,
  pub physics:   f64,
  pub chemistry: f64,
  pub maths:     f64,
}

impl Marksheet {
  /// Aggregate score used to rank the merit list.
  pub fn total(&self) -> f64 {
    self.physics + self.chemistry + self.maths
  }
}

/// Field set for creating a marksheet. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewMarksheet {
  pub name:      String,
  pub roll_no:   String,
  pub physics:   f64,
  pub chemistry: f64,
  pub maths:     f64,
}

/// Partial update for a marksheet. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MarksheetPatch {
  pub name:      Option<String>,
  pub roll_no:   Option<String>,
  pub physics:   Option<f64>,
  pub chemistry: Option<f64>,
  pub maths:     Option<f64>,
}
