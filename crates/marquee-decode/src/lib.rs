//! Response decoder for Marquee.
//!
//! Turns raw catalog, review and trailer payloads into [`marquee_core`]
//! values. Pure synchronous; no HTTP or database dependencies.
//!
//! Every decoder is strict at the batch level: an unparsable document, a
//! missing `results` array or a single malformed element fails the whole
//! call, so callers never see a partial list. The one leniency is
//! `release_date`, which degrades to `None` when it does not parse.
//!
//! # Quick start
//!
//! ```no_run
//! use marquee_core::resolve::AddressResolver;
//!
//! struct NoImages;
//!
//! impl AddressResolver for NoImages {
//!   fn poster_url(&self, _: &str) -> Option<String> { None }
//!   fn video_url(&self, key: &str) -> String { key.to_owned() }
//! }
//!
//! let raw = r#"{"results":[{"id":42,"original_title":"X","poster_path":"",
//!   "overview":"o","vote_average":7.5,"release_date":"2020-01-02"}]}"#;
//! let movies = marquee_decode::decode_catalog(raw, &NoImages).unwrap();
//! assert_eq!(movies.len(), 1);
//! ```

pub mod error;
mod parse;

pub use error::{Error, Result};
use marquee_core::{
  Movie, Review,
  catalog::CatalogPage,
  resolve::AddressResolver,
};

/// Decode a catalog payload into its movies.
///
/// Poster paths are resolved into full addresses through `resolver`.
pub fn decode_catalog<R>(raw: &str, resolver: &R) -> Result<Vec<Movie>>
where
  R: AddressResolver + ?Sized,
{
  parse::catalog(raw, resolver).map(|page| page.movies)
}

/// Decode a catalog payload, keeping its pagination fields.
///
/// `page` and `total_pages` default to 1 when the payload omits them.
pub fn decode_catalog_page<R>(raw: &str, resolver: &R) -> Result<CatalogPage>
where
  R: AddressResolver + ?Sized,
{
  parse::catalog(raw, resolver)
}

/// Decode a review payload.
pub fn decode_reviews(raw: &str) -> Result<Vec<Review>> { parse::reviews(raw) }

/// Decode a trailer payload into its video keys, in payload order.
pub fn decode_trailers(raw: &str) -> Result<Vec<String>> { parse::trailers(raw) }
