//! [`SqliteStore`], the SQLite implementation of [`Repository`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use spahtmx_core::{
  prize::{Laureate, NewPrize, Prize, PrizeQuery},
  store::Repository,
  user::{NewUser, User},
};

use crate::{
  encode::{
    decode_prize_id, encode_dt, laureate_from_row, new_user_id, RawUser, USER_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A spahtmx repository backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by tests and `DATABASE_URL=:memory:`.
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

  async fn user_where(&self, column: &'static str, value: &str) -> Result<Option<User>> {
    let value = value.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
            rusqlite::params![value],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn count(&self, table: &'static str) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }

  async fn distinct_prize_column(&self, sql: &'static str) -> Result<Vec<String>> {
    let values = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(values)
  }
}

/// Load the laureates of prize `id` in their stored order.
fn load_laureates(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Vec<Laureate>> {
  let mut stmt = conn.prepare_cached(
    "SELECT firstname, surname, motivation, share
     FROM laureates WHERE prize_id = ?1 ORDER BY position",
  )?;
  stmt
    .query_map(rusqlite::params![id], laureate_from_row)?
    .collect()
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl Repository for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn get_user(&self, id: &str) -> Result<User> {
    self
      .user_where("id", id)
      .await?
      .ok_or_else(|| Error::UserNotFound(id.to_owned()))
  }

  async fn get_by_username(&self, username: &str) -> Result<User> {
    self
      .user_where("username", username)
      .await?
      .ok_or_else(|| Error::UserNotFound(username.to_owned()))
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let now = Utc::now();
    let user = User {
      id:            new_user_id(),
      username:      input.username,
      password_hash: input.password_hash,
      email:         input.email,
      active:        input.active,
      created_at:    now,
      updated_at:    now,
    };

    let id       = user.id.clone();
    let username = user.username.clone();
    let hash     = user.password_hash.clone();
    let email    = user.email.clone();
    let active   = user.active;
    let at_str   = encode_dt(now);

    // The single connection serialises calls, so check-then-insert is atomic.
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }
        conn.execute(
          "INSERT INTO users (id, username, password_hash, email, status, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
          rusqlite::params![id, username, hash, email, active, at_str],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::UsernameTaken(user.username));
    }
    tracing::debug!(id = %user.id, username = %user.username, "inserted user");
    Ok(user)
  }

  async fn update_user(&self, user: User) -> Result<()> {
    let id     = user.id.clone();
    let at_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
           SET username = ?2, password_hash = ?3, email = ?4, status = ?5, updated_at = ?6
           WHERE id = ?1",
          rusqlite::params![
            id,
            user.username,
            user.password_hash,
            user.email,
            user.active,
            at_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::UserNotFound(user.id));
    }
    Ok(())
  }

  async fn toggle_user_status(&self, id: &str) -> Result<User> {
    let id_str = id.to_owned();
    let at_str = encode_dt(Utc::now());

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "UPDATE users SET status = NOT status, updated_at = ?2
               WHERE id = ?1 RETURNING {USER_COLUMNS}"
            ),
            rusqlite::params![id_str, at_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    let user = raw
      .ok_or_else(|| Error::UserNotFound(id.to_owned()))?
      .into_user()?;
    tracing::debug!(id = %user.id, active = user.active, "toggled user status");
    Ok(user)
  }

  async fn count_users(&self) -> Result<u64> { self.count("users").await }

  // ── Prizes ────────────────────────────────────────────────────────────────

  async fn find_prizes(&self, query: &PrizeQuery) -> Result<Vec<Prize>> {
    let year     = query.year.clone();
    let category = query.category.clone();
    // SQLite treats a negative LIMIT as "no limit".
    let limit    = query.limit.map(|l| l as i64).unwrap_or(-1);

    let prizes = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, year, category, overall_motivation FROM prizes
           WHERE (?1 IS NULL OR year = ?1)
             AND (?2 IS NULL OR category = ?2)
           ORDER BY year DESC, category, id
           LIMIT ?3",
        )?;
        let heads = stmt
          .query_map(rusqlite::params![year, category, limit], |row| {
            Ok((
              row.get::<_, i64>(0)?,
              row.get::<_, String>(1)?,
              row.get::<_, String>(2)?,
              row.get::<_, String>(3)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut prizes = Vec::with_capacity(heads.len());
        for (id, year, category, overall_motivation) in heads {
          prizes.push(Prize {
            id: id.to_string(),
            year,
            category,
            overall_motivation,
            laureates: load_laureates(conn, id)?,
          });
        }
        Ok(prizes)
      })
      .await?;

    Ok(prizes)
  }

  async fn get_prize(&self, id: &str) -> Result<Prize> {
    let key = decode_prize_id(id)?;

    let prize: Option<Prize> = self
      .conn
      .call(move |conn| {
        let head = conn
          .query_row(
            "SELECT year, category, overall_motivation FROM prizes WHERE id = ?1",
            rusqlite::params![key],
            |row| {
              Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
              ))
            },
          )
          .optional()?;

        let Some((year, category, overall_motivation)) = head else {
          return Ok(None);
        };
        Ok(Some(Prize {
          id: key.to_string(),
          year,
          category,
          overall_motivation,
          laureates: load_laureates(conn, key)?,
        }))
      })
      .await?;

    prize.ok_or_else(|| Error::PrizeNotFound(id.to_owned()))
  }

  async fn insert_prize(&self, input: NewPrize) -> Result<Prize> {
    let laureates: Vec<Laureate> =
      input.laureates.into_iter().map(Laureate::from).collect();

    let year               = input.year.clone();
    let category           = input.category.clone();
    let overall_motivation = input.overall_motivation.clone();
    let rows               = laureates.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO prizes (year, category, overall_motivation) VALUES (?1, ?2, ?3)",
          rusqlite::params![year, category, overall_motivation],
        )?;
        let id = tx.last_insert_rowid();
        {
          let mut stmt = tx.prepare(
            "INSERT INTO laureates
               (prize_id, position, firstname, surname, motivation, share)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          )?;
          for (position, l) in rows.iter().enumerate() {
            stmt.execute(rusqlite::params![
              id,
              position as i64,
              l.firstname,
              l.surname,
              l.motivation,
              l.share,
            ])?;
          }
        }
        tx.commit()?;
        Ok(id)
      })
      .await?;

    tracing::debug!(id, year = %input.year, category = %input.category, "inserted prize");
    Ok(Prize {
      id: id.to_string(),
      year: input.year,
      category: input.category,
      overall_motivation: input.overall_motivation,
      laureates,
    })
  }

  async fn delete_prize(&self, id: &str) -> Result<()> {
    let key = decode_prize_id(id)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM prizes WHERE id = ?1", rusqlite::params![key])?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PrizeNotFound(id.to_owned()));
    }
    Ok(())
  }

  async fn categories(&self) -> Result<Vec<String>> {
    self
      .distinct_prize_column("SELECT DISTINCT category FROM prizes ORDER BY category")
      .await
  }

  async fn years(&self) -> Result<Vec<String>> {
    self
      .distinct_prize_column("SELECT DISTINCT year FROM prizes ORDER BY year DESC")
      .await
  }

  async fn count_prizes(&self) -> Result<u64> { self.count("prizes").await }
}
