//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use rusqlite::types::Value;
use uuid::Uuid;

use tabula_core::{
  Error as CoreError,
  account::{Account, AccountPatch, NewAccount},
  marksheet::{Marksheet, MarksheetPatch, NewMarksheet},
  query::{AccountFilter, MarksheetFilter, Page, StudentFilter, TextFilter},
  store::RecordStore,
  student::{NewStudent, StudentPatch, StudentProfile},
};

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawMarksheet, RawStudent, encode_date, encode_gender,
    encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

pub(crate) const ACCOUNT_COLUMNS: &str =
  "account_id, first_name, last_name, login_id, password_hash, dob, gender, role";
pub(crate) const STUDENT_COLUMNS: &str =
  "student_id, name, subject, school, dob, mobile_no, gender";
pub(crate) const MARKSHEET_COLUMNS: &str =
  "marksheet_id, name, roll_no, physics, chemistry, maths";

// ─── Filter compilation ──────────────────────────────────────────────────────

/// Escape `%`, `_` and the escape character itself so user text always
/// matches literally inside a LIKE pattern.
fn escape_like(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len());
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// Compile a [`TextFilter`] into a `WHERE` clause and its bound parameters.
///
/// Each clause becomes `LOWER(col) LIKE ? ESCAPE '\'` with a `%`-wrapped,
/// escaped needle — an unanchored, case-insensitive substring match. The
/// column names come from the filter types in `tabula-core`, never from
/// request text. An empty filter compiles to no `WHERE` at all.
///
/// Search and count must both be built from the same compiled filter so the
/// reported total stays consistent with the fetched page.
fn compile_filter(filter: &TextFilter) -> (String, Vec<Value>) {
  if filter.is_empty() {
    return (String::new(), Vec::new());
  }

  let mut conds = Vec::with_capacity(filter.clauses().len());
  let mut params = Vec::with_capacity(filter.clauses().len());
  for (col, needle) in filter.clauses() {
    conds.push(format!("LOWER({col}) LIKE ? ESCAPE '\\'"));
    params.push(Value::Text(format!("%{}%", escape_like(needle))));
  }

  (format!("WHERE {}", conds.join(" AND ")), params)
}

/// Map a unique-constraint failure on `accounts.login_id` to the domain
/// error; pass every other failure through.
fn duplicate_login(err: tokio_rusqlite::Error, login_id: &str) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)) =
    &err
    && e.code == rusqlite::ErrorCode::ConstraintViolation
  {
    return Error::Core(CoreError::DuplicateLogin(login_id.to_owned()));
  }
  Error::Database(err)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tabula record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a paginated search over `table`: compiled filter, rowid order,
  /// `LIMIT`/`OFFSET` from the page directive.
  async fn search_rows<R, F>(
    &self,
    table: &str,
    columns: &str,
    filter: &TextFilter,
    page: Page,
    from_row: F,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
    F: Fn(&rusqlite::Row<'_>) -> rusqlite::Result<R> + Send + 'static,
  {
    let (where_sql, mut params) = compile_filter(filter);
    params.push(Value::from(i64::from(page.limit())));
    params.push(Value::from(page.offset() as i64));

    let sql = format!(
      "SELECT {columns} FROM {table} {where_sql} \
       ORDER BY rowid LIMIT ? OFFSET ?"
    );

    let rows: Vec<R> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  /// Count the records of `table` matching the compiled filter.
  async fn count_rows(&self, table: &str, filter: &TextFilter) -> Result<u64> {
    let (where_sql, params) = compile_filter(filter);
    let sql = format!("SELECT COUNT(*) FROM {table} {where_sql}");

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &sql,
          rusqlite::params_from_iter(params),
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  /// Apply a dynamic `SET` list to one record; `false` if no row matched.
  async fn apply_patch(
    &self,
    table: &str,
    id_column: &str,
    id: Uuid,
    sets: Vec<&'static str>,
    mut params: Vec<Value>,
  ) -> Result<bool> {
    let sql = format!(
      "UPDATE {table} SET {} WHERE {id_column} = ?",
      sets.join(", ")
    );
    params.push(Value::Text(encode_uuid(id)));

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?)
      })
      .await?;

    Ok(affected > 0)
  }

  /// Delete one record by id; `false` if no row matched.
  async fn delete_row(&self, table: &str, id_column: &str, id: Uuid) -> Result<bool> {
    let sql = format!("DELETE FROM {table} WHERE {id_column} = ?1");
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id_str])?))
      .await?;

    Ok(affected > 0)
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn add_account(&self, new: NewAccount) -> Result<Account> {
    let account = Account {
      id:            Uuid::new_v4(),
      first_name:    new.first_name,
      last_name:     new.last_name,
      login_id:      new.login_id,
      password_hash: new.password_hash,
      dob:           new.dob,
      gender:        new.gender,
      role:          new.role,
    };

    let id_str     = encode_uuid(account.id);
    let first_name = account.first_name.clone();
    let last_name  = account.last_name.clone();
    let login_id   = account.login_id.clone();
    let hash       = account.password_hash.clone();
    let dob_str    = encode_date(account.dob);
    let gender_str = encode_gender(account.gender).to_owned();
    let role_str   = encode_role(account.role).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (account_id, first_name, last_name, login_id,
             password_hash, dob, gender, role)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str, first_name, last_name, login_id, hash, dob_str,
            gender_str, role_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(|e| duplicate_login(e, &account.login_id))?;

    Ok(account)
  }

  async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
    let id_str = encode_uuid(id);
    let sql = format!(
      "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"
    );

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawAccount::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn update_account(
    &self,
    id: Uuid,
    patch: AccountPatch,
  ) -> Result<Option<Account>> {
    let mut sets: Vec<&'static str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    // Remember the target login for constraint-violation reporting.
    let patched_login = patch.login_id.clone();

    if let Some(v) = patch.first_name {
      sets.push("first_name = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.last_name {
      sets.push("last_name = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.login_id {
      sets.push("login_id = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.password_hash {
      sets.push("password_hash = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.dob {
      sets.push("dob = ?");
      params.push(Value::Text(encode_date(v)));
    }
    if let Some(v) = patch.gender {
      sets.push("gender = ?");
      params.push(Value::Text(encode_gender(v).to_owned()));
    }
    if let Some(v) = patch.role {
      sets.push("role = ?");
      params.push(Value::Text(encode_role(v).to_owned()));
    }

    if sets.is_empty() {
      // An empty patch changes nothing; report the current record.
      return self.get_account(id).await;
    }

    let matched = self
      .apply_patch("accounts", "account_id", id, sets, params)
      .await
      .map_err(|e| match e {
        Error::Database(db) => {
          duplicate_login(db, patched_login.as_deref().unwrap_or_default())
        }
        other => other,
      })?;

    if !matched {
      return Ok(None);
    }
    self.get_account(id).await
  }

  async fn delete_account(&self, id: Uuid) -> Result<bool> {
    self.delete_row("accounts", "account_id", id).await
  }

  async fn find_account_by_login(&self, login_id: &str) -> Result<Option<Account>> {
    let login = login_id.to_owned();
    let sql = format!(
      "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE login_id = ?1 LIMIT 1"
    );

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![login], RawAccount::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn search_accounts(
    &self,
    filter: &AccountFilter,
    page: Page,
  ) -> Result<Vec<Account>> {
    let raws = self
      .search_rows(
        "accounts",
        ACCOUNT_COLUMNS,
        &filter.to_text_filter(),
        page,
        RawAccount::from_row,
      )
      .await?;
    raws.into_iter().map(RawAccount::into_account).collect()
  }

  async fn count_accounts(&self, filter: &AccountFilter) -> Result<u64> {
    self.count_rows("accounts", &filter.to_text_filter()).await
  }

  // ── Students ──────────────────────────────────────────────────────────────

  async fn add_student(&self, new: NewStudent) -> Result<StudentProfile> {
    let student = StudentProfile {
      id:        Uuid::new_v4(),
      name:      new.name,
      subject:   new.subject,
      school:    new.school,
      dob:       new.dob,
      mobile_no: new.mobile_no,
      gender:    new.gender,
    };

    let id_str     = encode_uuid(student.id);
    let name       = student.name.clone();
    let subject    = student.subject.clone();
    let school     = student.school.clone();
    let dob_str    = encode_date(student.dob);
    let mobile_no  = student.mobile_no.clone();
    let gender_str = encode_gender(student.gender).to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (student_id, name, subject, school, dob,
             mobile_no, gender)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str, name, subject, school, dob_str, mobile_no, gender_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(student)
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<StudentProfile>> {
    let id_str = encode_uuid(id);
    let sql = format!(
      "SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"
    );

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawStudent::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn update_student(
    &self,
    id: Uuid,
    patch: StudentPatch,
  ) -> Result<Option<StudentProfile>> {
    let mut sets: Vec<&'static str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(v) = patch.name {
      sets.push("name = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.subject {
      sets.push("subject = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.school {
      sets.push("school = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.dob {
      sets.push("dob = ?");
      params.push(Value::Text(encode_date(v)));
    }
    if let Some(v) = patch.mobile_no {
      sets.push("mobile_no = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.gender {
      sets.push("gender = ?");
      params.push(Value::Text(encode_gender(v).to_owned()));
    }

    if sets.is_empty() {
      return self.get_student(id).await;
    }

    let matched = self
      .apply_patch("students", "student_id", id, sets, params)
      .await?;
    if !matched {
      return Ok(None);
    }
    self.get_student(id).await
  }

  async fn delete_student(&self, id: Uuid) -> Result<bool> {
    self.delete_row("students", "student_id", id).await
  }

  async fn search_students(
    &self,
    filter: &StudentFilter,
    page: Page,
  ) -> Result<Vec<StudentProfile>> {
    let raws = self
      .search_rows(
        "students",
        STUDENT_COLUMNS,
        &filter.to_text_filter(),
        page,
        RawStudent::from_row,
      )
      .await?;
    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn count_students(&self, filter: &StudentFilter) -> Result<u64> {
    self.count_rows("students", &filter.to_text_filter()).await
  }

  async fn student_names(&self) -> Result<Vec<String>> {
    let names: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT name FROM students ORDER BY rowid")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(names)
  }

  // ── Marksheets ────────────────────────────────────────────────────────────

  async fn add_marksheet(&self, new: NewMarksheet) -> Result<Marksheet> {
    let marksheet = Marksheet {
      id:        Uuid::new_v4(),
      name:      new.name,
      roll_no:   new.roll_no,
      physics:   new.physics,
      chemistry: new.chemistry,
      maths:     new.maths,
    };

    let id_str    = encode_uuid(marksheet.id);
    let name      = marksheet.name.clone();
    let roll_no   = marksheet.roll_no.clone();
    let physics   = marksheet.physics;
    let chemistry = marksheet.chemistry;
    let maths     = marksheet.maths;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO marksheets (marksheet_id, name, roll_no, physics,
             chemistry, maths)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, roll_no, physics, chemistry, maths],
        )?;
        Ok(())
      })
      .await?;

    Ok(marksheet)
  }

  async fn get_marksheet(&self, id: Uuid) -> Result<Option<Marksheet>> {
    let id_str = encode_uuid(id);
    let sql = format!(
      "SELECT {MARKSHEET_COLUMNS} FROM marksheets WHERE marksheet_id = ?1"
    );

    let raw: Option<RawMarksheet> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawMarksheet::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMarksheet::into_marksheet).transpose()
  }

  async fn update_marksheet(
    &self,
    id: Uuid,
    patch: MarksheetPatch,
  ) -> Result<Option<Marksheet>> {
    let mut sets: Vec<&'static str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(v) = patch.name {
      sets.push("name = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.roll_no {
      sets.push("roll_no = ?");
      params.push(Value::Text(v));
    }
    if let Some(v) = patch.physics {
      sets.push("physics = ?");
      params.push(Value::Real(v));
    }
    if let Some(v) = patch.chemistry {
      sets.push("chemistry = ?");
      params.push(Value::Real(v));
    }
    if let Some(v) = patch.maths {
      sets.push("maths = ?");
      params.push(Value::Real(v));
    }

    if sets.is_empty() {
      return self.get_marksheet(id).await;
    }

    let matched = self
      .apply_patch("marksheets", "marksheet_id", id, sets, params)
      .await?;
    if !matched {
      return Ok(None);
    }
    self.get_marksheet(id).await
  }

  async fn delete_marksheet(&self, id: Uuid) -> Result<bool> {
    self.delete_row("marksheets", "marksheet_id", id).await
  }

  async fn search_marksheets(
    &self,
    filter: &MarksheetFilter,
    page: Page,
  ) -> Result<Vec<Marksheet>> {
    let raws = self
      .search_rows(
        "marksheets",
        MARKSHEET_COLUMNS,
        &filter.to_text_filter(),
        page,
        RawMarksheet::from_row,
      )
      .await?;
    raws.into_iter().map(RawMarksheet::into_marksheet).collect()
  }

  async fn count_marksheets(&self, filter: &MarksheetFilter) -> Result<u64> {
    self.count_rows("marksheets", &filter.to_text_filter()).await
  }

  async fn merit_list(&self) -> Result<Vec<Marksheet>> {
    let sql = format!(
      "SELECT {MARKSHEET_COLUMNS} FROM marksheets \
       ORDER BY (physics + chemistry + maths) DESC, rowid"
    );

    let raws: Vec<RawMarksheet> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawMarksheet::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMarksheet::into_marksheet).collect()
  }
}
