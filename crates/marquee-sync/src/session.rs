//! Per-detail-view session state.

use marquee_core::{Movie, Review, review::render_reviews};
use tokio_util::sync::CancellationToken;

/// Favorite state of a detail view.
///
/// A session starts `Unknown` and leaves it once the coordinator has checked
/// the store; afterwards it only moves between `Favorited` and
/// `NotFavorited`, and only after a store write has committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailState {
  Unknown,
  Favorited,
  NotFavorited,
}

impl DetailState {
  pub fn is_favorite(self) -> bool { self == DetailState::Favorited }

  /// Label for the favorite toggle in this state.
  pub fn action_label(self) -> &'static str {
    match self {
      DetailState::Unknown => "Loading…",
      DetailState::Favorited => "Remove from favorites",
      DetailState::NotFavorited => "Add to favorites",
    }
  }
}

/// Where the reviews currently held by a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSource {
  None,
  Store,
  Network,
}

/// Everything one detail view knows about its movie.
///
/// Dropping the session cancels any fetch started on its behalf, so results
/// never arrive for a view that no longer exists.
#[derive(Debug)]
pub struct DetailSession {
  movie:   Movie,
  reviews: Vec<Review>,
  source:  ReviewSource,
  state:   DetailState,
  cancel:  CancellationToken,
}

impl DetailSession {
  pub fn new(movie: Movie) -> Self { Self::with_cancel(movie, CancellationToken::new()) }

  /// A session whose fetches also stop when `parent` is cancelled.
  pub fn with_parent(movie: Movie, parent: &CancellationToken) -> Self {
    Self::with_cancel(movie, parent.child_token())
  }

  fn with_cancel(movie: Movie, cancel: CancellationToken) -> Self {
    Self {
      movie,
      reviews: Vec::new(),
      source: ReviewSource::None,
      state: DetailState::Unknown,
      cancel,
    }
  }

  pub fn movie(&self) -> &Movie { &self.movie }

  pub fn reviews(&self) -> &[Review] { &self.reviews }

  pub fn review_source(&self) -> ReviewSource { self.source }

  pub fn state(&self) -> DetailState { self.state }

  /// The reviews as one display block.
  pub fn reviews_text(&self) -> String { render_reviews(&self.reviews) }

  /// A token cancelled when this session is dropped or its parent is
  /// cancelled.
  pub fn cancellation(&self) -> CancellationToken { self.cancel.child_token() }

  /// Overwrite the held reviews with a network result. Whatever was shown
  /// before (possibly the stored copy) is replaced.
  pub fn apply_network_reviews(&mut self, reviews: Vec<Review>) {
    self.reviews = reviews;
    self.source = ReviewSource::Network;
  }

  pub(crate) fn apply_stored_reviews(&mut self, reviews: Vec<Review>) {
    self.reviews = reviews;
    self.source = ReviewSource::Store;
  }

  pub(crate) fn set_state(&mut self, state: DetailState) { self.state = state; }
}

impl Drop for DetailSession {
  fn drop(&mut self) { self.cancel.cancel(); }
}
