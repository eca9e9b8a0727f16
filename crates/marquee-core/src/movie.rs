//! Movie: a catalog entry, identified solely by its remote id.

use std::{
  fmt,
  hash::{Hash, Hasher},
  str::FromStr,
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Remote-assigned, stable movie identifier.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub i64);

impl fmt::Display for MovieId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

impl FromStr for MovieId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim()
      .parse()
      .map(MovieId)
      .map_err(|_| Error::InvalidMovieId(s.to_owned()))
  }
}

impl From<i64> for MovieId {
  fn from(id: i64) -> Self { Self(id) }
}

/// A movie as shown in the catalog and stored in favorites.
///
/// Equality and hashing consider `id` only: a server-side correction to the
/// title or rating must not break matching against the local copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
  pub id:           MovieId,
  pub title:        String,
  /// Fully-resolved poster address; `None` when the catalog has no image.
  pub poster_url:   Option<String>,
  pub synopsis:     String,
  /// Average user rating on a 0–10 scale.
  pub user_rating:  f64,
  pub release_date: Option<NaiveDate>,
}

impl Movie {
  pub fn release_year(&self) -> Option<i32> { self.release_date.map(|d| d.year()) }

  /// Rating as displayed next to the title, e.g. `7.5/10`.
  pub fn rating_label(&self) -> String { format!("{}/10", self.user_rating) }
}

impl PartialEq for Movie {
  fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Movie {}

impl Hash for Movie {
  fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state); }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn movie(id: i64, title: &str, rating: f64) -> Movie {
    Movie {
      id:           MovieId(id),
      title:        title.into(),
      poster_url:   None,
      synopsis:     String::new(),
      user_rating:  rating,
      release_date: NaiveDate::from_ymd_opt(2020, 1, 2),
    }
  }

  #[test]
  fn equality_ignores_everything_but_id() {
    assert_eq!(movie(42, "X", 7.5), movie(42, "X (restored)", 8.1));
    assert_ne!(movie(42, "X", 7.5), movie(43, "X", 7.5));
  }

  #[test]
  fn hash_follows_id() {
    let mut set = std::collections::HashSet::new();
    set.insert(movie(1, "a", 1.0));
    set.insert(movie(1, "b", 2.0));
    set.insert(movie(2, "a", 1.0));
    assert_eq!(set.len(), 2);
  }

  #[test]
  fn display_helpers() {
    let m = movie(7, "Heat", 7.5);
    assert_eq!(m.release_year(), Some(2020));
    assert_eq!(m.rating_label(), "7.5/10");
  }

  #[test]
  fn movie_id_parses_and_rejects() {
    assert_eq!(" 550 ".parse::<MovieId>().unwrap(), MovieId(550));
    assert!(matches!(
      "abc".parse::<MovieId>(),
      Err(Error::InvalidMovieId(s)) if s == "abc"
    ));
  }

  #[test]
  fn movie_id_serializes_as_plain_number() {
    let json = serde_json::to_string(&MovieId(42)).unwrap();
    assert_eq!(json, "42");
  }
}
