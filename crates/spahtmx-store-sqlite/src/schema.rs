//! SQL schema for the spahtmx SQLite store.
//!
//! Executed once at connection startup; every statement is idempotent.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id             TEXT PRIMARY KEY,     -- hyphenated UUID
    username       TEXT NOT NULL UNIQUE,
    password_hash  TEXT,                 -- argon2 PHC string or NULL
    email          TEXT NOT NULL,
    status         INTEGER NOT NULL DEFAULT 1,
    created_at     TEXT NOT NULL,        -- RFC 3339 UTC
    updated_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS prizes (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    year                TEXT NOT NULL,
    category            TEXT NOT NULL,
    overall_motivation  TEXT NOT NULL DEFAULT ''
);

-- Laureates belong to exactly one prize and vanish with it.
CREATE TABLE IF NOT EXISTS laureates (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    prize_id    INTEGER NOT NULL REFERENCES prizes(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,        -- order within the prize
    firstname   TEXT NOT NULL DEFAULT '',
    surname     TEXT NOT NULL DEFAULT '',
    motivation  TEXT NOT NULL DEFAULT '',
    share       TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS prizes_year_idx       ON prizes(year);
CREATE INDEX IF NOT EXISTS prizes_category_idx   ON prizes(category);
CREATE INDEX IF NOT EXISTS laureates_prize_idx   ON laureates(prize_id);

PRAGMA user_version = 1;
";
