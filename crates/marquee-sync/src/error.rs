//! Error type for `marquee-sync`.
//!
//! Decode and network failures never appear here: the coordinator absorbs
//! them into an absent result. What remains is what the user must be told.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
  /// The favorites store failed; the triggering action was not applied.
  #[error("store error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The detail view has not been loaded yet, so its favorite state is
  /// unknown.
  #[error("detail view not loaded")]
  NotLoaded,

  /// The remote answered, but with nothing to show.
  #[error("no {0} available")]
  EmptyResult(&'static str),
}

impl SyncError {
  pub(crate) fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
