//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 date strings. Enumerations are stored as
//! their lowercase wire names. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::NaiveDate;
use tabula_core::{
  account::{Account, Gender, Role},
  marksheet::Marksheet,
  student::StudentProfile,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str {
  match g {
    Gender::Female => "female",
    Gender::Male => "male",
    Gender::Other => "other",
  }
}

pub fn decode_gender(s: &str) -> Result<Gender> {
  match s {
    "female" => Ok(Gender::Female),
    "male" => Ok(Gender::Male),
    "other" => Ok(Gender::Other),
    other => Err(Error::Decode(format!("unknown gender: {other:?}"))),
  }
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::Student => "student",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "student" => Ok(Role::Student),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:    String,
  pub first_name:    String,
  pub last_name:     String,
  pub login_id:      String,
  pub password_hash: String,
  pub dob:           String,
  pub gender:        String,
  pub role:          String,
}

impl RawAccount {
  /// Column order matches `ACCOUNT_COLUMNS` in the store module.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:    row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      login_id:      row.get(3)?,
      password_hash: row.get(4)?,
      dob:           row.get(5)?,
      gender:        row.get(6)?,
      role:          row.get(7)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:            decode_uuid(&self.account_id)?,
      first_name:    self.first_name,
      last_name:     self.last_name,
      login_id:      self.login_id,
      password_hash: self.password_hash,
      dob:           decode_date(&self.dob)?,
      gender:        decode_gender(&self.gender)?,
      role:          decode_role(&self.role)?,
    })
  }
}

/// Raw strings read directly from a `students` row.
pub struct RawStudent {
  pub student_id: String,
  pub name:       String,
  pub subject:    String,
  pub school:     String,
  pub dob:        String,
  pub mobile_no:  String,
  pub gender:     String,
}

impl RawStudent {
  /// Column order matches `STUDENT_COLUMNS` in the store module.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      student_id: row.get(0)?,
      name:       row.get(1)?,
      subject:    row.get(2)?,
      school:     row.get(3)?,
      dob:        row.get(4)?,
      mobile_no:  row.get(5)?,
      gender:     row.get(6)?,
    })
  }

  pub fn into_student(self) -> Result<StudentProfile> {
    Ok(StudentProfile {
      id:        decode_uuid(&self.student_id)?,
      name:      self.name,
      subject:   self.subject,
      school:    self.school,
      dob:       decode_date(&self.dob)?,
      mobile_no: self.mobile_no,
      gender:    decode_gender(&self.gender)?,
    })
  }
}

/// Raw values read directly from a `marksheets` row.
pub struct RawMarksheet {
  pub marksheet_id: String,
  pub name:         String,
  pub roll_no:      String,
  pub physics:      f64,
  pub chemistry:    f64,
  pub maths:        f64,
}

impl RawMarksheet {
  /// Column order matches `MARKSHEET_COLUMNS` in the store module.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      marksheet_id: row.get(0)?,
      name:         row.get(1)?,
      roll_no:      row.get(2)?,
      physics:      row.get(3)?,
      chemistry:    row.get(4)?,
      maths:        row.get(5)?,
    })
  }

  pub fn into_marksheet(self) -> Result<Marksheet> {
    Ok(Marksheet {
      id:        decode_uuid(&self.marksheet_id)?,
      name:      self.name,
      roll_no:   self.roll_no,
      physics:   self.physics,
      chemistry: self.chemistry,
      maths:     self.maths,
    })
  }
}
