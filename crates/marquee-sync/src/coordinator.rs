//! [`Coordinator`]: favorite toggling and detail loading.

use std::sync::Arc;

use marquee_core::{
  Movie, MovieId, Review,
  catalog::{CatalogPage, CatalogQuery},
  resolve::AddressResolver,
  store::FavoritesStore,
};
use marquee_decode::{decode_catalog_page, decode_reviews, decode_trailers};
use marquee_remote::{ConnectivityProbe, Endpoint, Error as RemoteError, RemoteFetcher, TmdbAddresses, Transport};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{DetailSession, DetailState, Result, SyncError};

/// Reconciles the favorites store with remote results.
///
/// Cheap to clone; all collaborators are shared.
pub struct Coordinator<S, T, P> {
  store:     Arc<S>,
  remote:    Arc<RemoteFetcher<T, P>>,
  addresses: Arc<TmdbAddresses>,
}

impl<S, T, P> Clone for Coordinator<S, T, P> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      remote:    Arc::clone(&self.remote),
      addresses: Arc::clone(&self.addresses),
    }
  }
}

impl<S, T, P> Coordinator<S, T, P>
where
  S: FavoritesStore,
  T: Transport,
  P: ConnectivityProbe,
{
  pub fn new(store: Arc<S>, remote: RemoteFetcher<T, P>, addresses: TmdbAddresses) -> Self {
    Self { store, remote: Arc::new(remote), addresses: Arc::new(addresses) }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn addresses(&self) -> &TmdbAddresses { &self.addresses }

  // ── Catalog ───────────────────────────────────────────────────────────────

  /// One catalog page, or `None` when the remote could not provide it.
  pub async fn load_catalog(
    &self,
    query: CatalogQuery,
    cancel: &CancellationToken,
  ) -> Option<CatalogPage> {
    let url = self.addresses.catalog_url(&query);
    let raw = self.fetch(url, Endpoint::Catalog, cancel).await?;

    match decode_catalog_page(&raw, self.addresses.as_ref()) {
      Ok(page) => Some(page),
      Err(e) => {
        tracing::warn!(sort = %query.sort, page = query.page, error = %e, "catalog payload rejected");
        None
      }
    }
  }

  /// Every favorited movie, available offline.
  pub async fn favorites(&self) -> Result<Vec<Movie>> {
    self.store.get_all_movies().await.map_err(SyncError::storage)
  }

  /// Find a movie by id: the stored favorite if there is one, otherwise the
  /// entry on the given catalog page.
  pub async fn locate(
    &self,
    id: MovieId,
    query: CatalogQuery,
    cancel: &CancellationToken,
  ) -> Result<Option<Movie>> {
    if let Some(movie) = self.store.get_movie(id).await.map_err(SyncError::storage)? {
      return Ok(Some(movie));
    }
    Ok(
      self
        .load_catalog(query, cancel)
        .await
        .and_then(|page| page.movies.into_iter().find(|m| m.id == id)),
    )
  }

  // ── Detail view ───────────────────────────────────────────────────────────

  /// Resolve the session's favorite state from the store.
  ///
  /// A favorited movie gets its stored reviews immediately, before any
  /// network fetch is issued, so the view has something to show offline.
  pub async fn open(&self, session: &mut DetailSession) -> Result<DetailState> {
    let movie = session.movie();
    let favorited = self
      .store
      .movie_in_favorites(movie)
      .await
      .map_err(SyncError::storage)?;

    if favorited {
      let stored = self
        .store
        .get_reviews_for_movie(movie)
        .await
        .map_err(SyncError::storage)?;
      session.apply_stored_reviews(stored);
      session.set_state(DetailState::Favorited);
    } else {
      session.set_state(DetailState::NotFavorited);
    }

    tracing::debug!(movie_id = %session.movie().id, state = ?session.state(), "detail opened");
    Ok(session.state())
  }

  /// Fetch reviews for `id` from the network. `None` means no result: the
  /// fetch failed, the payload was rejected or `cancel` fired.
  pub async fn fetch_reviews(&self, id: MovieId, cancel: &CancellationToken) -> Option<Vec<Review>> {
    let url = self.addresses.reviews_url(id);
    let raw = self.fetch(url, Endpoint::Reviews, cancel).await?;

    match decode_reviews(&raw) {
      Ok(reviews) => Some(reviews),
      Err(e) => {
        tracing::warn!(movie_id = %id, error = %e, "reviews payload rejected");
        None
      }
    }
  }

  /// Fetch reviews and overwrite the session's current list with them.
  ///
  /// Returns whether the session was updated; on failure the reviews
  /// already shown (e.g. the stored copy) stay in place. The session must
  /// have been [`open`](Self::open)ed first.
  pub async fn refresh_reviews(&self, session: &mut DetailSession) -> Result<bool> {
    ensure_loaded(session)?;

    let cancel = session.cancellation();
    match self.fetch_reviews(session.movie().id, &cancel).await {
      Some(reviews) => {
        session.apply_network_reviews(reviews);
        Ok(true)
      }
      None => Ok(false),
    }
  }

  /// Run the review fetch for `session` as a background task.
  ///
  /// The task is tied to the session: dropping the session cancels it and
  /// the handle resolves to `None`. Apply a `Some` result with
  /// [`DetailSession::apply_network_reviews`]. The session must have been
  /// [`open`](Self::open)ed first.
  pub fn spawn_review_fetch(
    &self,
    session: &DetailSession,
  ) -> Result<JoinHandle<Option<Vec<Review>>>>
  where
    S: 'static,
    T: 'static,
    P: 'static,
  {
    ensure_loaded(session)?;

    let this = self.clone();
    let id = session.movie().id;
    let cancel = session.cancellation();
    Ok(tokio::spawn(async move { this.fetch_reviews(id, &cancel).await }))
  }

  /// Flip the session's favorite state.
  ///
  /// Favoriting persists the movie together with the reviews the session
  /// currently holds; unfavoriting removes the movie and all of its stored
  /// reviews. The state changes only once the store has committed; on a
  /// storage error it is left as it was.
  pub async fn toggle_favorite(&self, session: &mut DetailSession) -> Result<DetailState> {
    let movie = session.movie();

    let next = match session.state() {
      DetailState::Unknown => return Err(SyncError::NotLoaded),
      DetailState::NotFavorited => {
        self
          .store
          .save_favorite(movie, session.reviews())
          .await
          .map_err(SyncError::storage)?;
        tracing::info!(movie_id = %movie.id, reviews = session.reviews().len(), "added to favorites");
        DetailState::Favorited
      }
      DetailState::Favorited => {
        self.store.delete_movie(movie).await.map_err(SyncError::storage)?;
        tracing::info!(movie_id = %movie.id, "removed from favorites");
        DetailState::NotFavorited
      }
    };

    session.set_state(next);
    Ok(next)
  }

  /// Playable address of the movie's first trailer.
  ///
  /// `Ok(None)` when the remote could not be reached or answered with an
  /// unusable payload; [`SyncError::EmptyResult`] when it answered with no
  /// trailers at all.
  pub async fn trailer_address(&self, session: &DetailSession) -> Result<Option<String>> {
    let id = session.movie().id;
    let url = self.addresses.trailers_url(id);
    let cancel = session.cancellation();

    let Some(raw) = self.fetch(url, Endpoint::Trailers, &cancel).await else {
      return Ok(None);
    };

    let keys = match decode_trailers(&raw) {
      Ok(keys) => keys,
      Err(e) => {
        tracing::warn!(movie_id = %id, error = %e, "trailers payload rejected");
        return Ok(None);
      }
    };

    let key = keys.first().ok_or(SyncError::EmptyResult("trailers"))?;
    Ok(Some(self.addresses.video_url(key)))
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  async fn fetch(
    &self,
    url: marquee_remote::Result<String>,
    endpoint: Endpoint,
    cancel: &CancellationToken,
  ) -> Option<String> {
    let outcome = match url {
      Ok(url) => self.remote.fetch(&url, endpoint, cancel).await,
      Err(e) => Err(e),
    };

    match outcome {
      Ok(raw) => Some(raw),
      Err(RemoteError::Cancelled) => {
        tracing::debug!(%endpoint, "fetch cancelled");
        None
      }
      Err(e) => {
        tracing::warn!(%endpoint, error = %e, "fetch failed");
        None
      }
    }
  }
}

/// Network reviews may only replace the stored copy once it has been read.
fn ensure_loaded(session: &DetailSession) -> Result<()> {
  match session.state() {
    DetailState::Unknown => Err(SyncError::NotLoaded),
    DetailState::Favorited | DetailState::NotFavorited => Ok(()),
  }
}
