//! Catalog query parameters and paginated results.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, movie::Movie};

/// Criterion the remote catalog is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
  #[default]
  Popular,
  TopRated,
}

impl SortOrder {
  /// Path segment used by the catalog endpoint.
  pub fn path_segment(self) -> &'static str {
    match self {
      SortOrder::Popular => "popular",
      SortOrder::TopRated => "top_rated",
    }
  }
}

impl fmt::Display for SortOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.path_segment())
  }
}

impl FromStr for SortOrder {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "popular" => Ok(SortOrder::Popular),
      "top-rated" | "top_rated" | "toprated" => Ok(SortOrder::TopRated),
      other => Err(Error::UnknownSortOrder(other.to_owned())),
    }
  }
}

/// One page request against the catalog. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogQuery {
  pub sort: SortOrder,
  pub page: u32,
}

impl CatalogQuery {
  pub fn new(sort: SortOrder, page: u32) -> Self { Self { sort, page: page.max(1) } }
}

impl Default for CatalogQuery {
  fn default() -> Self { Self::new(SortOrder::default(), 1) }
}

/// A decoded catalog page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPage {
  pub page:        u32,
  pub total_pages: u32,
  pub movies:      Vec<Movie>,
}

impl CatalogPage {
  pub fn has_next(&self) -> bool { self.page < self.total_pages }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sort_order_parses_cli_spellings() {
    assert_eq!("popular".parse::<SortOrder>().unwrap(), SortOrder::Popular);
    assert_eq!("Top-Rated".parse::<SortOrder>().unwrap(), SortOrder::TopRated);
    assert_eq!("top_rated".parse::<SortOrder>().unwrap(), SortOrder::TopRated);
    assert!("newest".parse::<SortOrder>().is_err());
  }

  #[test]
  fn page_is_at_least_one() {
    assert_eq!(CatalogQuery::new(SortOrder::Popular, 0).page, 1);
  }
}
