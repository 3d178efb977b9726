//! DDL run at startup, one statement at a time.

pub const SCHEMA: &[&str] = &[
  "CREATE TABLE IF NOT EXISTS users (
     id             BIGSERIAL PRIMARY KEY,
     username       TEXT NOT NULL UNIQUE,
     password_hash  TEXT,
     email          TEXT NOT NULL,
     status         BOOLEAN NOT NULL DEFAULT TRUE,
     created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
     updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
   )",
  "CREATE TABLE IF NOT EXISTS prizes (
     id                  BIGSERIAL PRIMARY KEY,
     year                TEXT NOT NULL,
     category            TEXT NOT NULL,
     overall_motivation  TEXT NOT NULL DEFAULT ''
   )",
  "CREATE TABLE IF NOT EXISTS laureates (
     id          BIGSERIAL PRIMARY KEY,
     prize_id    BIGINT NOT NULL REFERENCES prizes(id) ON DELETE CASCADE,
     position    INTEGER NOT NULL,
     firstname   TEXT NOT NULL DEFAULT '',
     surname     TEXT NOT NULL DEFAULT '',
     motivation  TEXT NOT NULL DEFAULT '',
     share       TEXT NOT NULL DEFAULT ''
   )",
  "CREATE INDEX IF NOT EXISTS prizes_year_idx ON prizes(year)",
  "CREATE INDEX IF NOT EXISTS prizes_category_idx ON prizes(category)",
  "CREATE INDEX IF NOT EXISTS laureates_prize_idx ON laureates(prize_id)",
];
