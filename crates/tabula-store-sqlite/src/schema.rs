//! SQL schema for the Tabula SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The three collections are independent: student profiles carry no foreign
/// key to accounts, and marksheets reference students by free-text name
/// only. `login_id` is the authentication key and must stay unique.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS accounts (
    account_id    TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    login_id      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    dob           TEXT NOT NULL,   -- ISO 8601 date
    gender        TEXT NOT NULL,   -- 'female' | 'male' | 'other'
    role          TEXT NOT NULL    -- 'admin' | 'student'
);

CREATE TABLE IF NOT EXISTS students (
    student_id TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    subject    TEXT NOT NULL,
    school     TEXT NOT NULL,
    dob        TEXT NOT NULL,      -- ISO 8601 date
    mobile_no  TEXT NOT NULL,
    gender     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS marksheets (
    marksheet_id TEXT PRIMARY KEY,
    name         TEXT NOT NULL,   -- student name, free text
    roll_no      TEXT NOT NULL,
    physics      REAL NOT NULL,
    chemistry    REAL NOT NULL,
    maths        REAL NOT NULL
);

PRAGMA user_version = 1;
";
