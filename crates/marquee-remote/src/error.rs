//! Error type for `marquee-remote`.

use std::time::Duration;

use thiserror::Error;

use crate::Endpoint;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("invalid request address {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },

  #[error("{endpoint} request returned status {status}")]
  Status { endpoint: Endpoint, status: u16 },

  /// A transport failure that is not an HTTP client error.
  #[error("transport error: {0}")]
  Transport(String),

  #[error("still offline after {0:?}")]
  OfflineTimeout(Duration),

  #[error("request cancelled")]
  Cancelled,

  #[error("{endpoint} request failed after {attempts} attempts: {last}")]
  Exhausted {
    endpoint: Endpoint,
    attempts: u32,
    #[source]
    last:     Box<Error>,
  },
}

impl Error {
  /// Whether another attempt could succeed. Waiting errors, cancellation
  /// and client-side statuses are final.
  pub fn is_retryable(&self) -> bool {
    match self {
      Error::Http(_) | Error::Transport(_) => true,
      Error::Status { status, .. } => *status >= 500 || *status == 429,
      Error::InvalidUrl { .. }
      | Error::OfflineTimeout(_)
      | Error::Cancelled
      | Error::Exhausted { .. } => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
