//! [`SqliteStore`]: the SQLite implementation of [`FavoritesStore`].

use std::path::Path;

use marquee_core::{Movie, MovieId, Review, store::FavoritesStore};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{MovieRow, RawMovie, replace_reviews, review_from_row},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A favorites store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
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

  /// Open an in-memory store.
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

  /// Number of review rows stored for `id`, duplicates included.
  pub async fn review_row_count(&self, id: MovieId) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM reviews WHERE movie_id = ?1",
          rusqlite::params![id.0],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as usize)
  }

  /// Review rows whose `movie_id` has no matching movie row.
  pub async fn orphaned_review_count(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM reviews r
           WHERE NOT EXISTS (SELECT 1 FROM movies m WHERE m.movie_id = r.movie_id)",
          [],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as usize)
  }
}

// ─── FavoritesStore impl ─────────────────────────────────────────────────────

impl FavoritesStore for SqliteStore {
  type Error = crate::Error;

  // ── Movies ────────────────────────────────────────────────────────────────

  async fn insert_movie(&self, movie: &Movie) -> Result<()> {
    let row = MovieRow::from(movie);

    self
      .conn
      .call(move |conn| {
        row.upsert(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_all_movies(&self) -> Result<Vec<Movie>> {
    let raws: Vec<RawMovie> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM movies ORDER BY movie_id",
          RawMovie::COLUMNS
        ))?;
        let rows = stmt
          .query_map([], RawMovie::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMovie::into_movie).collect()
  }

  async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
    let raw: Option<RawMovie> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM movies WHERE movie_id = ?1", RawMovie::COLUMNS),
            rusqlite::params![id.0],
            RawMovie::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMovie::into_movie).transpose()
  }

  async fn movie_in_favorites(&self, movie: &Movie) -> Result<bool> {
    let id = movie.id.0;

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM movies WHERE movie_id = ?1",
            rusqlite::params![id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;
    Ok(found)
  }

  async fn delete_movie(&self, movie: &Movie) -> Result<()> {
    let id = movie.id.0;

    let (movies, reviews) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let movies = tx.execute("DELETE FROM movies WHERE movie_id = ?1", rusqlite::params![id])?;
        let reviews =
          tx.execute("DELETE FROM reviews WHERE movie_id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok((movies, reviews))
      })
      .await?;

    tracing::debug!(movie_id = id, movies, reviews, "deleted favorite");
    Ok(())
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn insert_reviews(&self, reviews: &[Review], movie: &Movie) -> Result<()> {
    let id = movie.id.0;
    let reviews = reviews.to_vec();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        replace_reviews(&tx, id, &reviews)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_reviews_for_movie(&self, movie: &Movie) -> Result<Vec<Review>> {
    let id = movie.id.0;

    let reviews = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT remote_id, author, content FROM reviews
           WHERE movie_id = ?1
           ORDER BY review_row",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id], review_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(reviews)
  }

  async fn delete_review(&self, review: &Review) -> Result<bool> {
    let review = review.clone();

    let removed = self
      .conn
      .call(move |conn| {
        let n = match &review.remote_id {
          Some(remote_id) => conn.execute(
            "DELETE FROM reviews WHERE remote_id = ?1",
            rusqlite::params![remote_id],
          )?,
          // Rows without a remote id are only distinguishable by content;
          // remove the oldest match.
          None => conn.execute(
            "DELETE FROM reviews WHERE review_row = (
               SELECT review_row FROM reviews
               WHERE author = ?1 AND content = ?2
               ORDER BY review_row
               LIMIT 1
             )",
            rusqlite::params![review.author, review.content],
          )?,
        };
        Ok(n)
      })
      .await?;
    Ok(removed > 0)
  }

  // ── Favorite transitions ──────────────────────────────────────────────────

  async fn save_favorite(&self, movie: &Movie, reviews: &[Review]) -> Result<()> {
    let row = MovieRow::from(movie);
    let reviews = reviews.to_vec();
    let count = reviews.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        row.upsert(&tx)?;
        replace_reviews(&tx, row.movie_id, &reviews)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(movie_id = movie.id.0, reviews = count, "saved favorite");
    Ok(())
  }
}
