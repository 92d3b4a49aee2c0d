//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use tabula_core::{
  Error as CoreError,
  account::{AccountPatch, Gender, NewAccount, Role},
  marksheet::NewMarksheet,
  query::{AccountFilter, MarksheetFilter, Page, StudentFilter},
  store::RecordStore,
  student::{NewStudent, StudentPatch},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn dob(year: i32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, 6, 15).unwrap()
}

fn new_account(login_id: &str) -> NewAccount {
  NewAccount {
    first_name:    "Asha".into(),
    last_name:     "Verma".into(),
    login_id:      login_id.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".into(),
    dob:           dob(1990),
    gender:        Gender::Female,
    role:          Role::Admin,
  }
}

fn new_student(name: &str, subject: &str, mobile_no: &str) -> NewStudent {
  NewStudent {
    name:      name.into(),
    subject:   subject.into(),
    school:    "Model High School".into(),
    dob:       dob(2006),
    mobile_no: mobile_no.into(),
    gender:    Gender::Other,
  }
}

fn new_marksheet(name: &str, physics: f64, chemistry: f64, maths: f64) -> NewMarksheet {
  NewMarksheet {
    name:      name.into(),
    roll_no:   "R-01".into(),
    physics,
    chemistry,
    maths,
  }
}

fn page(page: u32, limit: u32) -> Page {
  Page::new(Some(page), Some(limit)).unwrap()
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_account_round_trips_all_fields() {
  let s = store().await;

  let added = s.add_account(new_account("asha@gmail.com")).await.unwrap();
  let fetched = s.get_account(added.id).await.unwrap().unwrap();

  assert_eq!(fetched.id, added.id);
  assert_eq!(fetched.first_name, "Asha");
  assert_eq!(fetched.last_name, "Verma");
  assert_eq!(fetched.login_id, "asha@gmail.com");
  assert_eq!(fetched.password_hash, added.password_hash);
  assert_eq!(fetched.dob, dob(1990));
  assert_eq!(fetched.gender, Gender::Female);
  assert_eq!(fetched.role, Role::Admin);
}

#[tokio::test]
async fn get_account_missing_returns_none() {
  let s = store().await;
  assert!(s.get_account(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn find_account_by_login_is_exact() {
  let s = store().await;
  s.add_account(new_account("asha@gmail.com")).await.unwrap();

  let found = s.find_account_by_login("asha@gmail.com").await.unwrap();
  assert!(found.is_some());

  // Exact key lookup, not a substring match.
  assert!(s.find_account_by_login("asha").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_login_id_is_rejected() {
  let s = store().await;
  s.add_account(new_account("asha@gmail.com")).await.unwrap();

  let err = s.add_account(new_account("asha@gmail.com")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::DuplicateLogin(ref l)) if l == "asha@gmail.com"
  ));
}

#[tokio::test]
async fn update_account_patches_only_supplied_fields() {
  let s = store().await;
  let added = s.add_account(new_account("asha@gmail.com")).await.unwrap();

  let patch = AccountPatch {
    last_name: Some("Sharma".into()),
    role: Some(Role::Student),
    ..Default::default()
  };
  let updated = s.update_account(added.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.last_name, "Sharma");
  assert_eq!(updated.role, Role::Student);
  // Untouched fields survive.
  assert_eq!(updated.first_name, "Asha");
  assert_eq!(updated.login_id, "asha@gmail.com");
}

#[tokio::test]
async fn update_account_missing_returns_none() {
  let s = store().await;
  let patch = AccountPatch {
    first_name: Some("Nobody".into()),
    ..Default::default()
  };
  assert!(s.update_account(Uuid::new_v4(), patch).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_account_twice_reports_missing_second_time() {
  let s = store().await;
  let added = s.add_account(new_account("asha@gmail.com")).await.unwrap();

  assert!(s.delete_account(added.id).await.unwrap());
  assert!(!s.delete_account(added.id).await.unwrap());
}

#[tokio::test]
async fn search_accounts_filters_are_case_insensitive_substrings() {
  let s = store().await;
  s.add_account(new_account("asha@gmail.com")).await.unwrap();
  let mut other = new_account("vikram@gmail.com");
  other.first_name = "Vikram".into();
  s.add_account(other).await.unwrap();

  let filter = AccountFilter {
    first_name: Some("SHA".into()),
    ..Default::default()
  };
  let hits = s.search_accounts(&filter, page(1, 5)).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].first_name, "Asha");
  assert_eq!(s.count_accounts(&filter).await.unwrap(), 1);
}

// ─── Students ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_student_round_trips_all_fields() {
  let s = store().await;

  let added = s
    .add_student(new_student("Ravi", "Physics", "9876543210"))
    .await
    .unwrap();
  let fetched = s.get_student(added.id).await.unwrap().unwrap();

  assert_eq!(fetched.name, "Ravi");
  assert_eq!(fetched.subject, "Physics");
  assert_eq!(fetched.school, "Model High School");
  assert_eq!(fetched.dob, dob(2006));
  assert_eq!(fetched.mobile_no, "9876543210");
  assert_eq!(fetched.gender, Gender::Other);
}

#[tokio::test]
async fn twelve_matching_students_paginate_into_three_pages() {
  let s = store().await;

  for i in 0..12 {
    s.add_student(new_student(&format!("Student {i:02}"), "Physics", "555"))
      .await
      .unwrap();
  }
  // A non-matching record the filter must exclude.
  s.add_student(new_student("Outsider", "History", "555"))
    .await
    .unwrap();

  let filter = StudentFilter {
    subject: Some("phy".into()),
    ..Default::default()
  };
  let p = page(2, 5);

  let count = s.count_students(&filter).await.unwrap();
  assert_eq!(count, 12);
  assert_eq!(p.total_pages(count), 3);

  // Page 2 of 5 holds records 6..=10 in insertion order.
  let hits = s.search_students(&filter, p).await.unwrap();
  let names: Vec<_> = hits.iter().map(|st| st.name.as_str()).collect();
  assert_eq!(
    names,
    ["Student 05", "Student 06", "Student 07", "Student 08", "Student 09"]
  );

  // The final page is short; a page past the end is empty, not an error.
  assert_eq!(s.search_students(&filter, page(3, 5)).await.unwrap().len(), 2);
  assert!(s.search_students(&filter, page(4, 5)).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_result_size_tracks_count_minus_offset() {
  let s = store().await;
  for i in 0..7 {
    s.add_student(new_student(&format!("S{i}"), "Maths", "555"))
      .await
      .unwrap();
  }

  let filter = StudentFilter::default();
  let count = s.count_students(&filter).await.unwrap();

  for pg in 1..=4 {
    let p = page(pg, 3);
    let hits = s.search_students(&filter, p).await.unwrap();
    let expected = count
      .saturating_sub(p.offset())
      .min(u64::from(p.limit()));
    assert_eq!(hits.len() as u64, expected, "page {pg}");
  }
}

#[tokio::test]
async fn empty_filter_matches_every_student() {
  let s = store().await;
  s.add_student(new_student("Ravi", "Physics", "111")).await.unwrap();
  s.add_student(new_student("Meena", "History", "222")).await.unwrap();

  let filter = StudentFilter {
    name:      None,
    subject:   Some("  ".into()),
    mobile_no: Some(String::new()),
  };
  assert_eq!(s.count_students(&filter).await.unwrap(), 2);
  assert_eq!(s.search_students(&filter, page(1, 5)).await.unwrap().len(), 2);
}

#[tokio::test]
async fn like_wildcards_in_filter_text_match_literally() {
  let s = store().await;
  s.add_student(new_student("100% Attendance", "Physics", "111"))
    .await
    .unwrap();
  s.add_student(new_student("Full Attendance", "Physics", "222"))
    .await
    .unwrap();

  // '%' must not act as a wildcard.
  let filter = StudentFilter {
    name: Some("100%".into()),
    ..Default::default()
  };
  let hits = s.search_students(&filter, page(1, 5)).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].name, "100% Attendance");

  // '_' must not match an arbitrary character either.
  let filter = StudentFilter {
    name: Some("F_ll".into()),
    ..Default::default()
  };
  assert!(s.search_students(&filter, page(1, 5)).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_student_patch_and_missing() {
  let s = store().await;
  let added = s.add_student(new_student("Ravi", "Physics", "111")).await.unwrap();

  let patch = StudentPatch {
    school: Some("City School".into()),
    ..Default::default()
  };
  let updated = s.update_student(added.id, patch.clone()).await.unwrap().unwrap();
  assert_eq!(updated.school, "City School");
  assert_eq!(updated.name, "Ravi");

  assert!(s.update_student(Uuid::new_v4(), patch).await.unwrap().is_none());
}

#[tokio::test]
async fn student_names_preload_in_insertion_order() {
  let s = store().await;
  s.add_student(new_student("Ravi", "Physics", "111")).await.unwrap();
  s.add_student(new_student("Meena", "History", "222")).await.unwrap();
  s.add_student(new_student("Arjun", "Maths", "333")).await.unwrap();

  assert_eq!(s.student_names().await.unwrap(), ["Ravi", "Meena", "Arjun"]);
}

// ─── Marksheets ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_get_delete_marksheet() {
  let s = store().await;
  let added = s
    .add_marksheet(new_marksheet("Ravi", 88.0, 91.5, 79.0))
    .await
    .unwrap();

  let fetched = s.get_marksheet(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Ravi");
  assert_eq!(fetched.physics, 88.0);
  assert_eq!(fetched.chemistry, 91.5);
  assert_eq!(fetched.maths, 79.0);

  assert!(s.delete_marksheet(added.id).await.unwrap());
  assert!(!s.delete_marksheet(added.id).await.unwrap());
  assert!(s.get_marksheet(added.id).await.unwrap().is_none());
}

#[tokio::test]
async fn search_marksheets_by_roll_no() {
  let s = store().await;
  let mut one = new_marksheet("Ravi", 80.0, 80.0, 80.0);
  one.roll_no = "A-17".into();
  s.add_marksheet(one).await.unwrap();
  s.add_marksheet(new_marksheet("Meena", 70.0, 70.0, 70.0)).await.unwrap();

  let filter = MarksheetFilter {
    roll_no: Some("a-1".into()),
    ..Default::default()
  };
  let hits = s.search_marksheets(&filter, page(1, 5)).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].roll_no, "A-17");
  assert_eq!(s.count_marksheets(&filter).await.unwrap(), 1);
}

#[tokio::test]
async fn merit_list_ranks_by_descending_total() {
  let s = store().await;
  s.add_marksheet(new_marksheet("Bronze", 60.0, 60.0, 60.0)).await.unwrap();
  s.add_marksheet(new_marksheet("Gold", 95.0, 92.0, 99.0)).await.unwrap();
  s.add_marksheet(new_marksheet("Silver", 85.0, 80.0, 90.0)).await.unwrap();
  // Same total as Silver; insertion order breaks the tie.
  s.add_marksheet(new_marksheet("Silver II", 90.0, 85.0, 80.0)).await.unwrap();

  let ranked = s.merit_list().await.unwrap();
  let names: Vec<_> = ranked.iter().map(|m| m.name.as_str()).collect();
  assert_eq!(names, ["Gold", "Silver", "Silver II", "Bronze"]);
}
