//! Error types for the response decoder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The payload is not a JSON document of the expected shape.
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("payload has no `results` array")]
  MissingResults,

  /// An element of `results` is missing a field or has the wrong type.
  #[error("result #{index}: {source}")]
  Element {
    index:  usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("result #{index}: invalid {field}: {reason}")]
  InvalidField {
    index:  usize,
    field:  &'static str,
    reason: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
