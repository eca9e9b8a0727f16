//! Request targets and external addresses for the TMDB v3 API.

use marquee_core::{MovieId, catalog::CatalogQuery, resolve::AddressResolver};
use reqwest::Url;

use crate::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_IMAGE_SIZE: &str = "w185";
pub const DEFAULT_VIDEO_BASE: &str = "https://www.youtube.com/watch";

/// Builds request targets and resolves poster paths / trailer keys.
#[derive(Debug, Clone)]
pub struct TmdbAddresses {
  pub api_base:   String,
  pub image_base: String,
  pub image_size: String,
  pub video_base: String,
  pub api_key:    String,
}

impl TmdbAddresses {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_base:   DEFAULT_API_BASE.to_owned(),
      image_base: DEFAULT_IMAGE_BASE.to_owned(),
      image_size: DEFAULT_IMAGE_SIZE.to_owned(),
      video_base: DEFAULT_VIDEO_BASE.to_owned(),
      api_key:    api_key.into(),
    }
  }

  /// `{api_base}/movie/{path}` with `api_key` and `params` as encoded query
  /// pairs.
  fn movie_url(&self, path: &str, params: &[(&str, &str)]) -> Result<String> {
    let base = format!("{}/movie/{}", self.api_base.trim_end_matches('/'), path);
    let mut url = Url::parse(&base)
      .map_err(|e| Error::InvalidUrl { url: base.clone(), reason: e.to_string() })?;
    url
      .query_pairs_mut()
      .append_pair("api_key", &self.api_key)
      .extend_pairs(params);
    Ok(url.into())
  }

  /// `GET /movie/{sort}?api_key=..&page=N`
  pub fn catalog_url(&self, query: &CatalogQuery) -> Result<String> {
    let page = query.page.max(1).to_string();
    self.movie_url(query.sort.path_segment(), &[("page", &page)])
  }

  /// `GET /movie/{id}/reviews?api_key=..`
  pub fn reviews_url(&self, id: MovieId) -> Result<String> {
    self.movie_url(&format!("{id}/reviews"), &[])
  }

  /// `GET /movie/{id}/videos?api_key=..`
  pub fn trailers_url(&self, id: MovieId) -> Result<String> {
    self.movie_url(&format!("{id}/videos"), &[])
  }
}

impl AddressResolver for TmdbAddresses {
  fn poster_url(&self, relative_path: &str) -> Option<String> {
    let path = relative_path.trim().trim_start_matches('/');
    if path.is_empty() {
      return None;
    }
    Some(format!(
      "{}/{}/{}",
      self.image_base.trim_end_matches('/'),
      self.image_size,
      path
    ))
  }

  fn video_url(&self, key: &str) -> String {
    match Url::parse_with_params(&self.video_base, &[("v", key)]) {
      Ok(url) => url.into(),
      Err(e) => {
        tracing::warn!(video_base = %self.video_base, error = %e, "invalid video base address");
        format!("{}?v={}", self.video_base, key)
      }
    }
  }
}
