//! SQL schema for the Marquee SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS movies (
    movie_id     INTEGER PRIMARY KEY,   -- remote-assigned id
    title        TEXT NOT NULL,
    poster_url   TEXT,
    synopsis     TEXT NOT NULL,
    user_rating  REAL NOT NULL,
    release_date TEXT                   -- YYYY-MM-DD or NULL
);

-- movie_id always names a row in movies. There is no FOREIGN KEY clause:
-- every write that touches both tables runs in one transaction instead.
CREATE TABLE IF NOT EXISTS reviews (
    review_row INTEGER PRIMARY KEY AUTOINCREMENT,
    remote_id  TEXT,                    -- id assigned by the review service
    author     TEXT NOT NULL,
    content    TEXT NOT NULL,
    movie_id   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS reviews_movie_idx  ON reviews(movie_id);
CREATE INDEX IF NOT EXISTS reviews_remote_idx ON reviews(remote_id);

PRAGMA user_version = 1;
";
