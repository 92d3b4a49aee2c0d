//! Shared filter and pagination types for the search endpoints.
//!
//! All three resource repositories search with the same contract: optional
//! per-field text, each matched as a case-insensitive substring, combined
//! with AND; a 1-based page/limit pair translated into a skip/limit
//! directive. The count query and the fetch query are always built from the
//! identical filter value so the reported `totalPages` agrees with the
//! contents of the returned page.

use crate::{Error, Result};

// ─── Text filter ─────────────────────────────────────────────────────────────

/// A conjunction of case-insensitive substring conditions, one per field.
///
/// Built from optional query text: empty or absent text contributes no
/// clause, and a filter with no clauses matches every record. Needles are
/// lowercased here; backends compare against lowercased field values and
/// must treat the needle as literal text (no pattern metacharacters leak
/// through).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
  clauses: Vec<(&'static str, String)>,
}

impl TextFilter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Require `field` to contain `text`, skipping empty or absent input.
  pub fn contains(mut self, field: &'static str, text: Option<&str>) -> Self {
    if let Some(t) = text {
      let t = t.trim();
      if !t.is_empty() {
        self.clauses.push((field, t.to_lowercase()));
      }
    }
    self
  }

  pub fn is_empty(&self) -> bool {
    self.clauses.is_empty()
  }

  /// The `(field, lowercased needle)` pairs, in insertion order.
  pub fn clauses(&self) -> &[(&'static str, String)] {
    &self.clauses
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// 1-based page selection with a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  page:  u32,
  limit: u32,
}

impl Page {
  pub const DEFAULT_LIMIT: u32 = 5;

  /// Build from optional query parameters, defaulting to page 1 and a page
  /// size of 5. Zero for either value is rejected rather than defaulted so
  /// `total_pages` can never divide by zero.
  pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
    if page == 0 || limit == 0 {
      return Err(Error::InvalidPage);
    }
    Ok(Self { page, limit })
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn limit(&self) -> u32 {
    self.limit
  }

  /// Records to skip before the first returned one: `(page - 1) * limit`.
  pub fn offset(&self) -> u64 {
    (u64::from(self.page) - 1) * u64::from(self.limit)
  }

  /// `ceil(total / limit)`. A page beyond this yields an empty result set,
  /// not an error.
  pub fn total_pages(&self, total: u64) -> u64 {
    total.div_ceil(u64::from(self.limit))
  }
}

// ─── Per-resource filters ────────────────────────────────────────────────────

/// Search filter for the account collection.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub login_id:   Option<String>,
}

impl AccountFilter {
  pub fn to_text_filter(&self) -> TextFilter {
    TextFilter::new()
      .contains("first_name", self.first_name.as_deref())
      .contains("last_name", self.last_name.as_deref())
      .contains("login_id", self.login_id.as_deref())
  }
}

/// Search filter for the student profile collection.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
  pub name:      Option<String>,
  pub subject:   Option<String>,
  pub mobile_no: Option<String>,
}

impl StudentFilter {
  pub fn to_text_filter(&self) -> TextFilter {
    TextFilter::new()
      .contains("name", self.name.as_deref())
      .contains("subject", self.subject.as_deref())
      .contains("mobile_no", self.mobile_no.as_deref())
  }
}

/// Search filter for the marksheet collection.
#[derive(Debug, Clone, Default)]
pub struct MarksheetFilter {
  pub name:    Option<String>,
  pub roll_no: Option<String>,
}

impl MarksheetFilter {
  pub fn to_text_filter(&self) -> TextFilter {
    TextFilter::new()
      .contains("name", self.name.as_deref())
      .contains("roll_no", self.roll_no.as_deref())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
