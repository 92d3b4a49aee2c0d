//! The `RecordStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `tabula-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  account::{Account, AccountPatch, NewAccount},
  marksheet::{Marksheet, MarksheetPatch, NewMarksheet},
  query::{AccountFilter, MarksheetFilter, Page, StudentFilter},
  student::{NewStudent, StudentPatch, StudentProfile},
};

/// Abstraction over the document store holding the three record
/// collections.
///
/// The three resource sections are deliberately uniform: `add_*` assigns
/// the identity, `get_*`/`update_*`/`delete_*` address one record, and
/// `search_*`/`count_*` take the identical filter value so page math stays
/// consistent. Search results come back in insertion order. The
/// search/count pair is two independent store calls with no snapshot
/// isolation; under concurrent mutation the page and the total can
/// disagree, which callers accept.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Insert a new account. Fails if the login identifier is taken.
  fn add_account(
    &self,
    new: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Apply a partial patch and return the post-update record, or `None` if
  /// no account has that id.
  fn update_account(
    &self,
    id: Uuid,
    patch: AccountPatch,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  /// Remove an account. Returns `false` if no account had that id.
  fn delete_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Look an account up by its login identifier — the credential lookup.
  fn find_account_by_login<'a>(
    &'a self,
    login_id: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  fn search_accounts<'a>(
    &'a self,
    filter: &'a AccountFilter,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Account>, Self::Error>> + Send + 'a;

  fn count_accounts<'a>(
    &'a self,
    filter: &'a AccountFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Students ──────────────────────────────────────────────────────────

  fn add_student(
    &self,
    new: NewStudent,
  ) -> impl Future<Output = Result<StudentProfile, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StudentProfile>, Self::Error>> + Send + '_;

  fn update_student(
    &self,
    id: Uuid,
    patch: StudentPatch,
  ) -> impl Future<Output = Result<Option<StudentProfile>, Self::Error>> + Send + '_;

  fn delete_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn search_students<'a>(
    &'a self,
    filter: &'a StudentFilter,
    page: Page,
  ) -> impl Future<Output = Result<Vec<StudentProfile>, Self::Error>> + Send + 'a;

  fn count_students<'a>(
    &'a self,
    filter: &'a StudentFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Every student name, in insertion order — the marksheet form preload.
  fn student_names(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Marksheets ────────────────────────────────────────────────────────

  fn add_marksheet(
    &self,
    new: NewMarksheet,
  ) -> impl Future<Output = Result<Marksheet, Self::Error>> + Send + '_;

  fn get_marksheet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Marksheet>, Self::Error>> + Send + '_;

  fn update_marksheet(
    &self,
    id: Uuid,
    patch: MarksheetPatch,
  ) -> impl Future<Output = Result<Option<Marksheet>, Self::Error>> + Send + '_;

  fn delete_marksheet(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn search_marksheets<'a>(
    &'a self,
    filter: &'a MarksheetFilter,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Marksheet>, Self::Error>> + Send + 'a;

  fn count_marksheets<'a>(
    &'a self,
    filter: &'a MarksheetFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// All marksheets ranked for the merit list: descending total score,
  /// ties in insertion order.
  fn merit_list(
    &self,
  ) -> impl Future<Output = Result<Vec<Marksheet>, Self::Error>> + Send + '_;
}
