//! [`PgStore`], the PostgreSQL implementation of [`Repository`].

use sqlx::{PgPool, postgres::PgPoolOptions};

use spahtmx_core::{
  prize::{NewPrize, Prize, PrizeQuery},
  store::Repository,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  rows::{LaureateRow, PrizeRow, USER_COLUMNS, UserRow, assemble, decode_id},
  schema::SCHEMA,
};

const MAX_CONNECTIONS: u32 = 10;

/// A spahtmx repository backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  /// Connect to `url` and create any missing tables.
  pub async fn connect(url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(MAX_CONNECTIONS)
      .connect(url)
      .await?;
    Self::from_pool(pool).await
  }

  pub async fn from_pool(pool: PgPool) -> Result<Self> {
    for statement in SCHEMA {
      sqlx::query(statement).execute(&pool).await?;
    }
    Ok(Self { pool })
  }

  async fn load_laureates(&self, ids: Vec<i64>) -> Result<Vec<LaureateRow>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    Ok(
      sqlx::query_as::<_, LaureateRow>(
        "SELECT prize_id, firstname, surname, motivation, share
         FROM laureates WHERE prize_id = ANY($1)
         ORDER BY prize_id, position",
      )
      .bind(ids)
      .fetch_all(&self.pool)
      .await?,
    )
  }
}

impl Repository for PgStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn get_users(&self) -> Result<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");
    let rows = sqlx::query_as::<_, UserRow>(&sql)
      .fetch_all(&self.pool)
      .await?;
    Ok(rows.into_iter().map(User::from).collect())
  }

  async fn get_user(&self, id: &str) -> Result<User> {
    let key = decode_id(id)?;
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, UserRow>(&sql)
      .bind(key)
      .fetch_optional(&self.pool)
      .await?
      .map(User::from)
      .ok_or_else(|| Error::UserNotFound(id.to_owned()))
  }

  async fn get_by_username(&self, username: &str) -> Result<User> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    sqlx::query_as::<_, UserRow>(&sql)
      .bind(username)
      .fetch_optional(&self.pool)
      .await?
      .map(User::from)
      .ok_or_else(|| Error::UserNotFound(username.to_owned()))
  }

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let sql = format!(
      "INSERT INTO users (username, password_hash, email, status)
       VALUES ($1, $2, $3, $4)
       ON CONFLICT (username) DO NOTHING
       RETURNING {USER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
      .bind(&input.username)
      .bind(&input.password_hash)
      .bind(&input.email)
      .bind(input.active)
      .fetch_optional(&self.pool)
      .await?;

    let user = User::from(row.ok_or(Error::UsernameTaken(input.username))?);
    tracing::debug!(id = %user.id, username = %user.username, "inserted user");
    Ok(user)
  }

  async fn update_user(&self, user: User) -> Result<()> {
    let key = decode_id(&user.id)?;
    let done = sqlx::query(
      "UPDATE users
       SET username = $2, password_hash = $3, email = $4, status = $5, updated_at = now()
       WHERE id = $1",
    )
    .bind(key)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.email)
    .bind(user.active)
    .execute(&self.pool)
    .await?;

    if done.rows_affected() == 0 {
      return Err(Error::UserNotFound(user.id));
    }
    Ok(())
  }

  async fn toggle_user_status(&self, id: &str) -> Result<User> {
    let key = decode_id(id)?;
    let sql = format!(
      "UPDATE users SET status = NOT status, updated_at = now()
       WHERE id = $1 RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, UserRow>(&sql)
      .bind(key)
      .fetch_optional(&self.pool)
      .await?
      .map(User::from)
      .ok_or_else(|| Error::UserNotFound(id.to_owned()))?;

    tracing::debug!(id = %user.id, active = user.active, "toggled user status");
    Ok(user)
  }

  async fn count_users(&self) -> Result<u64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
      .fetch_one(&self.pool)
      .await?;
    Ok(n.max(0) as u64)
  }

  // ── Prizes ────────────────────────────────────────────────────────────────

  async fn find_prizes(&self, query: &PrizeQuery) -> Result<Vec<Prize>> {
    let prizes = sqlx::query_as::<_, PrizeRow>(
      "SELECT id, year, category, overall_motivation FROM prizes
       WHERE ($1::TEXT IS NULL OR year = $1)
         AND ($2::TEXT IS NULL OR category = $2)
       ORDER BY year DESC, category, id
       LIMIT $3",
    )
    .bind(&query.year)
    .bind(&query.category)
    .bind(query.limit.map(|l| l as i64))
    .fetch_all(&self.pool)
    .await?;

    let ids = prizes.iter().map(|p| p.id).collect();
    let laureates = self.load_laureates(ids).await?;
    Ok(assemble(prizes, laureates))
  }

  async fn get_prize(&self, id: &str) -> Result<Prize> {
    let key = decode_id(id)?;
    let row = sqlx::query_as::<_, PrizeRow>(
      "SELECT id, year, category, overall_motivation FROM prizes WHERE id = $1",
    )
    .bind(key)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| Error::PrizeNotFound(id.to_owned()))?;

    let laureates = self.load_laureates(vec![key]).await?;
    assemble(vec![row], laureates)
      .pop()
      .ok_or_else(|| Error::PrizeNotFound(id.to_owned()))
  }

  async fn insert_prize(&self, input: NewPrize) -> Result<Prize> {
    let mut tx = self.pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
      "INSERT INTO prizes (year, category, overall_motivation)
       VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&input.year)
    .bind(&input.category)
    .bind(&input.overall_motivation)
    .fetch_one(&mut *tx)
    .await?;

    for (position, l) in input.laureates.iter().enumerate() {
      sqlx::query(
        "INSERT INTO laureates
           (prize_id, position, firstname, surname, motivation, share)
         VALUES ($1, $2, $3, $4, $5, $6)",
      )
      .bind(id)
      .bind(position as i32)
      .bind(&l.firstname)
      .bind(&l.surname)
      .bind(&l.motivation)
      .bind(&l.share)
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;
    tracing::debug!(id, year = %input.year, category = %input.category, "inserted prize");

    Ok(Prize {
      id:                 id.to_string(),
      year:               input.year,
      category:           input.category,
      overall_motivation: input.overall_motivation,
      laureates:          input.laureates.into_iter().map(Into::into).collect(),
    })
  }

  async fn delete_prize(&self, id: &str) -> Result<()> {
    let key = decode_id(id)?;
    let done = sqlx::query("DELETE FROM prizes WHERE id = $1")
      .bind(key)
      .execute(&self.pool)
      .await?;

    if done.rows_affected() == 0 {
      return Err(Error::PrizeNotFound(id.to_owned()));
    }
    Ok(())
  }

  async fn categories(&self) -> Result<Vec<String>> {
    Ok(
      sqlx::query_scalar("SELECT DISTINCT category FROM prizes ORDER BY category")
        .fetch_all(&self.pool)
        .await?,
    )
  }

  async fn years(&self) -> Result<Vec<String>> {
    Ok(
      sqlx::query_scalar("SELECT DISTINCT year FROM prizes ORDER BY year DESC")
        .fetch_all(&self.pool)
        .await?,
    )
  }

  async fn count_prizes(&self) -> Result<u64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prizes")
      .fetch_one(&self.pool)
      .await?;
    Ok(n.max(0) as u64)
  }
}
