//! The `FavoritesStore` trait.
//!
//! Implemented by storage backends (e.g. `marquee-store-sqlite`). The sync
//! coordinator depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  movie::{Movie, MovieId},
  review::Review,
};

/// Durable storage for favorited movies and their reviews.
///
/// Every review row belongs to a stored movie. Backends keep that true by
/// running each multi-row write (`save_favorite`, `insert_reviews`,
/// `delete_movie`) as one atomic transaction; there is a single writer, so no
/// further locking is required.
pub trait FavoritesStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Movies ────────────────────────────────────────────────────────────

  /// Insert the movie row, overwriting any row with the same id.
  fn insert_movie<'a>(
    &'a self,
    movie: &'a Movie,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every stored movie, ordered by id.
  fn get_all_movies(
    &self,
  ) -> impl Future<Output = Result<Vec<Movie>, Self::Error>> + Send + '_;

  /// A single stored movie, or `None` if it is not a favorite.
  fn get_movie(
    &self,
    id: MovieId,
  ) -> impl Future<Output = Result<Option<Movie>, Self::Error>> + Send + '_;

  /// True iff a stored movie has the same id as `movie`.
  fn movie_in_favorites<'a>(
    &'a self,
    movie: &'a Movie,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Remove the movie row and every review row for its id, atomically.
  fn delete_movie<'a>(
    &'a self,
    movie: &'a Movie,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Replace the stored reviews for `movie` with `reviews`, atomically.
  ///
  /// Calling this twice with the same list leaves one copy of each review.
  fn insert_reviews<'a>(
    &'a self,
    reviews: &'a [Review],
    movie: &'a Movie,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All stored reviews whose movie id equals `movie.id`, in insertion order.
  fn get_reviews_for_movie<'a>(
    &'a self,
    movie: &'a Movie,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + 'a;

  /// Remove a stored review.
  ///
  /// Reviews carrying a `remote_id` are matched on it. Reviews without one
  /// fall back to structural equality and exactly one matching row is removed
  /// (the oldest), even when several rows share author and content.
  /// Returns whether anything was removed.
  fn delete_review<'a>(
    &'a self,
    review: &'a Review,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Favorite transitions ──────────────────────────────────────────────

  /// Persist `movie` and replace its reviews with `reviews` in a single
  /// transaction. Used when a movie transitions into favorites.
  fn save_favorite<'a>(
    &'a self,
    movie: &'a Movie,
    reviews: &'a [Review],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
