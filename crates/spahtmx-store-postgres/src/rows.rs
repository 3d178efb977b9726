//! Row shapes returned by `sqlx::query_as` and their conversion into domain
//! records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use spahtmx_core::{
  prize::{Laureate, Prize},
  user::User,
};

use crate::{Error, Result};

pub const USER_COLUMNS: &str =
  "id, username, password_hash, email, status, created_at, updated_at";

pub fn decode_id(s: &str) -> Result<i64> {
  s.trim()
    .parse::<i64>()
    .map_err(|_| Error::InvalidId(s.to_owned()))
}

#[derive(Debug, FromRow)]
pub struct UserRow {
  pub id:            i64,
  pub username:      String,
  pub password_hash: Option<String>,
  pub email:         String,
  pub status:        bool,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(r: UserRow) -> Self {
    Self {
      id:            r.id.to_string(),
      username:      r.username,
      password_hash: r.password_hash,
      email:         r.email,
      active:        r.status,
      created_at:    r.created_at,
      updated_at:    r.updated_at,
    }
  }
}

#[derive(Debug, FromRow)]
pub struct PrizeRow {
  pub id:                 i64,
  pub year:               String,
  pub category:           String,
  pub overall_motivation: String,
}

/// Laureate rows must arrive ordered by `(prize_id, position)`.
#[derive(Debug, FromRow)]
pub struct LaureateRow {
  pub prize_id:   i64,
  pub firstname:  String,
  pub surname:    String,
  pub motivation: String,
  pub share:      String,
}

/// Attach laureates to their prizes, keeping the order of `prizes`.
pub fn assemble(prizes: Vec<PrizeRow>, laureates: Vec<LaureateRow>) -> Vec<Prize> {
  let mut by_prize: HashMap<i64, Vec<Laureate>> = HashMap::new();
  for l in laureates {
    by_prize.entry(l.prize_id).or_default().push(Laureate {
      firstname:  l.firstname,
      surname:    l.surname,
      motivation: l.motivation,
      share:      l.share,
    });
  }

  prizes
    .into_iter()
    .map(|p| Prize {
      id:                 p.id.to_string(),
      year:               p.year,
      category:           p.category,
      overall_motivation: p.overall_motivation,
      laureates:          by_prize.remove(&p.id).unwrap_or_default(),
    })
    .collect()
}
