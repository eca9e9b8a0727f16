//! Error types for `marquee-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown sort order: {0:?}")]
  UnknownSortOrder(String),

  #[error("invalid movie id: {0:?}")]
  InvalidMovieId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
