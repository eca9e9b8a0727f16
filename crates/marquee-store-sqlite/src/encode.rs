//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Release dates are stored as `YYYY-MM-DD` text; everything else maps onto
//! a native column type.

use chrono::NaiveDate;
use marquee_core::{Movie, MovieId, Review};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values read directly from a `movies` row.
pub struct RawMovie {
  pub movie_id:     i64,
  pub title:        String,
  pub poster_url:   Option<String>,
  pub synopsis:     String,
  pub user_rating:  f64,
  pub release_date: Option<String>,
}

impl RawMovie {
  pub const COLUMNS: &'static str =
    "movie_id, title, poster_url, synopsis, user_rating, release_date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      movie_id:     row.get(0)?,
      title:        row.get(1)?,
      poster_url:   row.get(2)?,
      synopsis:     row.get(3)?,
      user_rating:  row.get(4)?,
      release_date: row.get(5)?,
    })
  }

  pub fn into_movie(self) -> Result<Movie> {
    Ok(Movie {
      id:           MovieId(self.movie_id),
      title:        self.title,
      poster_url:   self.poster_url,
      synopsis:     self.synopsis,
      user_rating:  self.user_rating,
      release_date: self.release_date.as_deref().map(decode_date).transpose()?,
    })
  }
}

/// Owned column values for writing a `movies` row from a blocking closure.
pub struct MovieRow {
  pub movie_id:     i64,
  pub title:        String,
  pub poster_url:   Option<String>,
  pub synopsis:     String,
  pub user_rating:  f64,
  pub release_date: Option<String>,
}

impl From<&Movie> for MovieRow {
  fn from(m: &Movie) -> Self {
    Self {
      movie_id:     m.id.0,
      title:        m.title.clone(),
      poster_url:   m.poster_url.clone(),
      synopsis:     m.synopsis.clone(),
      user_rating:  m.user_rating,
      release_date: m.release_date.map(encode_date),
    }
  }
}

impl MovieRow {
  /// Insert or overwrite this row.
  pub fn upsert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT INTO movies (movie_id, title, poster_url, synopsis, user_rating, release_date)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)
       ON CONFLICT(movie_id) DO UPDATE SET
         title        = excluded.title,
         poster_url   = excluded.poster_url,
         synopsis     = excluded.synopsis,
         user_rating  = excluded.user_rating,
         release_date = excluded.release_date",
      rusqlite::params![
        self.movie_id,
        self.title,
        self.poster_url,
        self.synopsis,
        self.user_rating,
        self.release_date,
      ],
    )?;
    Ok(())
  }
}

/// Replace every stored review of `movie_id` with `reviews`.
///
/// Must be called inside a transaction; it issues a DELETE and one INSERT
/// per review.
pub fn replace_reviews(
  conn: &rusqlite::Connection,
  movie_id: i64,
  reviews: &[Review],
) -> rusqlite::Result<()> {
  conn.execute("DELETE FROM reviews WHERE movie_id = ?1", rusqlite::params![movie_id])?;

  let mut stmt = conn.prepare(
    "INSERT INTO reviews (remote_id, author, content, movie_id) VALUES (?1, ?2, ?3, ?4)",
  )?;
  for r in reviews {
    stmt.execute(rusqlite::params![r.remote_id, r.author, r.content, movie_id])?;
  }
  Ok(())
}

pub fn review_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Review> {
  Ok(Review {
    remote_id: row.get(0)?,
    author:    row.get(1)?,
    content:   row.get(2)?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_roundtrip() {
    let d = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    assert_eq!(encode_date(d), "2020-01-02");
    assert_eq!(decode_date("2020-01-02").unwrap(), d);
  }

  #[test]
  fn bad_stored_date_is_an_error() {
    assert!(matches!(decode_date("02/01/2020"), Err(Error::DateParse(_))));
  }
}
