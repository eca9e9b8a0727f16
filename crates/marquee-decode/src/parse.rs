//! Payload shapes and element-level decoding.

use chrono::NaiveDate;
use marquee_core::{
  Movie, MovieId, Review,
  catalog::CatalogPage,
  resolve::AddressResolver,
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Result};

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";
const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

// ─── Wire shapes ─────────────────────────────────────────────────────────────

/// The envelope shared by every endpoint. Elements stay as raw values so a
/// failure can be attributed to its index.
#[derive(Deserialize)]
struct Envelope {
  #[serde(default)]
  results:     Option<Vec<Value>>,
  #[serde(default)]
  page:        Option<u32>,
  #[serde(default)]
  total_pages: Option<u32>,
}

#[derive(Deserialize)]
struct RawMovie {
  id:             i64,
  original_title: String,
  #[serde(default)]
  poster_path:    Option<String>,
  overview:       String,
  vote_average:   RawRating,
  #[serde(default)]
  release_date:   Option<String>,
}

/// `vote_average` arrives as a number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRating {
  Number(f64),
  Text(String),
}

#[derive(Deserialize)]
struct RawReview {
  #[serde(default)]
  id:      Option<String>,
  author:  String,
  content: String,
}

#[derive(Deserialize)]
struct RawVideo {
  key: String,
}

// ─── Envelope handling ───────────────────────────────────────────────────────

fn envelope(raw: &str) -> Result<(Vec<Value>, Option<u32>, Option<u32>)> {
  let doc: Envelope = serde_json::from_str(raw)?;
  let results = doc.results.ok_or(Error::MissingResults)?;
  Ok((results, doc.page, doc.total_pages))
}

fn element<T: DeserializeOwned>(index: usize, value: Value) -> Result<T> {
  serde_json::from_value(value).map_err(|source| Error::Element { index, source })
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

pub fn catalog<R>(raw: &str, resolver: &R) -> Result<CatalogPage>
where
  R: AddressResolver + ?Sized,
{
  let (results, page, total_pages) = envelope(raw)?;

  let movies = results
    .into_iter()
    .enumerate()
    .map(|(index, value)| movie(index, element(index, value)?, resolver))
    .collect::<Result<Vec<_>>>()?;

  let page = page.unwrap_or(1).max(1);
  Ok(CatalogPage { page, total_pages: total_pages.unwrap_or(page).max(page), movies })
}

fn movie<R>(index: usize, raw: RawMovie, resolver: &R) -> Result<Movie>
where
  R: AddressResolver + ?Sized,
{
  let user_rating = rating(index, raw.vote_average)?;

  let poster_url = raw
    .poster_path
    .as_deref()
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .and_then(|p| resolver.poster_url(p));

  Ok(Movie {
    id: MovieId(raw.id),
    title: raw.original_title,
    poster_url,
    synopsis: raw.overview,
    user_rating,
    release_date: raw.release_date.as_deref().and_then(|s| release_date(raw.id, s)),
  })
}

fn rating(index: usize, raw: RawRating) -> Result<f64> {
  let invalid = |reason: String| Error::InvalidField { index, field: "vote_average", reason };

  let value = match raw {
    RawRating::Number(n) => n,
    RawRating::Text(s) => {
      s.trim().parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?
    }
  };

  if !value.is_finite() || !RATING_RANGE.contains(&value) {
    return Err(invalid(format!(
      "{value} is outside {}..={}",
      RATING_RANGE.start(),
      RATING_RANGE.end()
    )));
  }
  Ok(value)
}

/// A date that does not parse is treated as absent, never as a failure.
fn release_date(id: i64, s: &str) -> Option<NaiveDate> {
  let s = s.trim();
  if s.is_empty() {
    return None;
  }
  match NaiveDate::parse_from_str(s, RELEASE_DATE_FORMAT) {
    Ok(date) => Some(date),
    Err(e) => {
      tracing::debug!(movie_id = id, value = s, error = %e, "ignoring unparsable release date");
      None
    }
  }
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

pub fn reviews(raw: &str) -> Result<Vec<Review>> {
  let (results, ..) = envelope(raw)?;

  results
    .into_iter()
    .enumerate()
    .map(|(index, value)| {
      let r: RawReview = element(index, value)?;
      Ok(Review { remote_id: r.id, author: r.author, content: r.content })
    })
    .collect()
}

// ─── Trailers ────────────────────────────────────────────────────────────────

pub fn trailers(raw: &str) -> Result<Vec<String>> {
  let (results, ..) = envelope(raw)?;

  results
    .into_iter()
    .enumerate()
    .map(|(index, value)| element::<RawVideo>(index, value).map(|v| v.key))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  struct TestResolver;

  impl AddressResolver for TestResolver {
    fn poster_url(&self, relative_path: &str) -> Option<String> {
      Some(format!("https://img.test/w185/{}", relative_path.trim_start_matches('/')))
    }

    fn video_url(&self, key: &str) -> String { format!("https://video.test/{key}") }
  }

  // ── Catalog ─────────────────────────────────────────────────────────────

  #[test]
  fn catalog_with_string_rating() {
    let raw = r#"{"results":[{"id":42,"original_title":"X","poster_path":"/p.jpg",
      "overview":"o","vote_average":"7.5","release_date":"2020-01-02"}]}"#;

    let page = catalog(raw, &TestResolver).unwrap();
    assert_eq!(page.movies.len(), 1);

    let m = &page.movies[0];
    assert_eq!(m.id, MovieId(42));
    assert_eq!(m.title, "X");
    assert_eq!(m.synopsis, "o");
    assert_eq!(m.user_rating, 7.5);
    assert_eq!(m.release_date, NaiveDate::from_ymd_opt(2020, 1, 2));
    assert_eq!(m.poster_url.as_deref(), Some("https://img.test/w185/p.jpg"));
  }

  #[test]
  fn catalog_with_numeric_rating() {
    let raw = r#"{"results":[{"id":1,"original_title":"A","poster_path":"/a.jpg",
      "overview":"","vote_average":8,"release_date":"1999-10-15"}]}"#;
    let page = catalog(raw, &TestResolver).unwrap();
    assert_eq!(page.movies[0].user_rating, 8.0);
  }

  #[test]
  fn unparsable_release_date_keeps_the_record() {
    let raw = r#"{"results":[
      {"id":1,"original_title":"A","poster_path":"/a.jpg","overview":"","vote_average":5,"release_date":"soon"},
      {"id":2,"original_title":"B","poster_path":"/b.jpg","overview":"","vote_average":6,"release_date":"2001-02-03"}
    ]}"#;

    let page = catalog(raw, &TestResolver).unwrap();
    assert_eq!(page.movies.len(), 2);
    assert_eq!(page.movies[0].release_date, None);
    assert_eq!(page.movies[1].release_date, NaiveDate::from_ymd_opt(2001, 2, 3));
  }

  #[test]
  fn missing_or_empty_release_date_is_none() {
    let raw = r#"{"results":[
      {"id":1,"original_title":"A","overview":"","vote_average":5},
      {"id":2,"original_title":"B","overview":"","vote_average":5,"release_date":""},
      {"id":3,"original_title":"C","overview":"","vote_average":5,"release_date":null}
    ]}"#;
    let page = catalog(raw, &TestResolver).unwrap();
    assert!(page.movies.iter().all(|m| m.release_date.is_none()));
  }

  #[test]
  fn empty_or_missing_poster_path_has_no_image() {
    let raw = r#"{"results":[
      {"id":1,"original_title":"A","poster_path":"","overview":"","vote_average":5},
      {"id":2,"original_title":"B","poster_path":null,"overview":"","vote_average":5},
      {"id":3,"original_title":"C","overview":"","vote_average":5}
    ]}"#;
    let page = catalog(raw, &TestResolver).unwrap();
    assert!(page.movies.iter().all(|m| m.poster_url.is_none()));
  }

  #[test]
  fn catalog_pagination_defaults() {
    let raw = r#"{"results":[]}"#;
    let page = catalog(raw, &TestResolver).unwrap();
    assert_eq!((page.page, page.total_pages), (1, 1));
    assert!(!page.has_next());

    let raw = r#"{"page":2,"total_pages":40,"results":[]}"#;
    let page = catalog(raw, &TestResolver).unwrap();
    assert_eq!((page.page, page.total_pages), (2, 40));
    assert!(page.has_next());
  }

  #[test]
  fn malformed_element_fails_the_batch() {
    let raw = r#"{"results":[
      {"id":1,"original_title":"A","overview":"","vote_average":5},
      {"id":2,"overview":"","vote_average":5}
    ]}"#;
    let r = catalog(raw, &TestResolver);
    assert!(matches!(r, Err(Error::Element { index: 1, .. })));
  }

  #[test]
  fn non_numeric_rating_string_fails_the_batch() {
    let raw = r#"{"results":[{"id":1,"original_title":"A","overview":"","vote_average":"n/a"}]}"#;
    let r = catalog(raw, &TestResolver);
    assert!(matches!(
      r,
      Err(Error::InvalidField { index: 0, field: "vote_average", .. })
    ));
  }

  #[test]
  fn out_of_range_ratings_fail_the_batch() {
    for rating in [r#""NaN""#, r#""inf""#, r#""-5""#, r#""1e9""#, "11", "-0.5"] {
      let raw = format!(
        r#"{{"results":[{{"id":1,"original_title":"A","overview":"","vote_average":{rating}}}]}}"#
      );
      assert!(
        matches!(
          catalog(&raw, &TestResolver),
          Err(Error::InvalidField { index: 0, field: "vote_average", .. })
        ),
        "rating {rating} was accepted"
      );
    }
  }

  #[test]
  fn rating_bounds_are_inclusive() {
    let raw = r#"{"results":[
      {"id":1,"original_title":"A","overview":"","vote_average":0},
      {"id":2,"original_title":"B","overview":"","vote_average":"10.0"}
    ]}"#;
    let page = catalog(raw, &TestResolver).unwrap();
    assert_eq!(page.movies[0].user_rating, 0.0);
    assert_eq!(page.movies[1].user_rating, 10.0);
  }

  #[test]
  fn catalog_without_results_fails() {
    assert!(matches!(
      catalog(r#"{"page":1}"#, &TestResolver),
      Err(Error::MissingResults)
    ));
    assert!(matches!(catalog("not json", &TestResolver), Err(Error::Json(_))));
  }

  // ── Reviews ─────────────────────────────────────────────────────────────

  #[test]
  fn reviews_decode_in_order_with_remote_ids() {
    let raw = r#"{"id":42,"results":[
      {"id":"r1","author":"A","content":"hi"},
      {"author":"B","content":"bye"}
    ]}"#;

    let reviews = reviews(raw).unwrap();
    assert_eq!(reviews, vec![Review::new("A", "hi"), Review::new("B", "bye")]);
    assert_eq!(reviews[0].remote_id.as_deref(), Some("r1"));
    assert_eq!(reviews[1].remote_id, None);
  }

  #[test]
  fn reviews_without_results_yield_nothing() {
    assert!(matches!(reviews(r#"{"id":42}"#), Err(Error::MissingResults)));
    assert!(matches!(reviews(r#"{"results":null}"#), Err(Error::MissingResults)));
  }

  #[test]
  fn review_missing_author_fails_the_batch() {
    let raw = r#"{"results":[{"author":"A","content":"hi"},{"content":"orphan"}]}"#;
    assert!(matches!(reviews(raw), Err(Error::Element { index: 1, .. })));
  }

  // ── Trailers ────────────────────────────────────────────────────────────

  #[test]
  fn trailer_keys_keep_payload_order() {
    let raw = r#"{"results":[{"key":"abc123","site":"YouTube"},{"key":"def456"}]}"#;
    assert_eq!(trailers(raw).unwrap(), vec!["abc123", "def456"]);
  }

  #[test]
  fn empty_trailer_list_is_not_an_error() {
    assert!(trailers(r#"{"results":[]}"#).unwrap().is_empty());
  }

  #[test]
  fn trailer_without_key_fails() {
    assert!(matches!(
      trailers(r#"{"results":[{"name":"Teaser"}]}"#),
      Err(Error::Element { index: 0, .. })
    ));
  }
}
