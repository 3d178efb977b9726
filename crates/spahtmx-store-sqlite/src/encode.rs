//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and user ids as hyphenated
//! lowercase UUIDs. Prize ids are SQLite integers, exposed as decimal strings.

use chrono::{DateTime, Utc};
use spahtmx_core::{prize::Laureate, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Ids ─────────────────────────────────────────────────────────────────────

pub fn new_user_id() -> String { Uuid::new_v4().hyphenated().to_string() }

pub fn decode_prize_id(s: &str) -> Result<i64> {
  s.trim()
    .parse::<i64>()
    .map_err(|_| Error::InvalidPrizeId(s.to_owned()))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawUser::from_row`].
pub const USER_COLUMNS: &str =
  "id, username, password_hash, email, status, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            String,
  pub username:      String,
  pub password_hash: Option<String>,
  pub email:         String,
  pub active:        bool,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  /// Read a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
      email:         row.get(3)?,
      active:        row.get(4)?,
      created_at:    row.get(5)?,
      updated_at:    row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      username:      self.username,
      password_hash: self.password_hash,
      email:         self.email,
      active:        self.active,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Read a `laureates` row selected as
/// `firstname, surname, motivation, share`.
pub fn laureate_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Laureate> {
  Ok(Laureate {
    firstname:  row.get(0)?,
    surname:    row.get(1)?,
    motivation: row.get(2)?,
    share:      row.get(3)?,
  })
}
