//! Runtime settings, read from `marquee.toml` and `MARQUEE_*` variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use marquee_remote::{RetryPolicy, TmdbAddresses, WaitPolicy, urls};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub api_base_url:         String,
  pub image_base_url:       String,
  pub image_size:           String,
  pub video_base_url:       String,
  pub api_key:              String,
  pub store_path:           PathBuf,
  pub request_timeout_secs: u64,
  /// `host:port` dialled to decide whether the network is up.
  pub probe_addr:           String,
  pub probe_timeout_ms:     u64,
  pub wait_initial_ms:      u64,
  pub wait_max_ms:          u64,
  /// Zero waits for connectivity until interrupted.
  pub wait_timeout_secs:    u64,
  pub max_attempts:         u32,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_base_url:         urls::DEFAULT_API_BASE.to_owned(),
      image_base_url:       urls::DEFAULT_IMAGE_BASE.to_owned(),
      image_size:           urls::DEFAULT_IMAGE_SIZE.to_owned(),
      video_base_url:       urls::DEFAULT_VIDEO_BASE.to_owned(),
      api_key:              String::new(),
      store_path:           PathBuf::from("~/.local/share/marquee/favorites.db"),
      request_timeout_secs: 15,
      probe_addr:           "api.themoviedb.org:443".to_owned(),
      probe_timeout_ms:     2_000,
      wait_initial_ms:      250,
      wait_max_ms:          10_000,
      wait_timeout_secs:    120,
      max_attempts:         3,
    }
  }
}

impl Settings {
  pub fn addresses(&self) -> TmdbAddresses {
    TmdbAddresses {
      api_base:   self.api_base_url.trim_end_matches('/').to_owned(),
      image_base: self.image_base_url.trim_end_matches('/').to_owned(),
      image_size: self.image_size.clone(),
      video_base: self.video_base_url.clone(),
      api_key:    self.api_key.clone(),
    }
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

  pub fn probe_timeout(&self) -> Duration { Duration::from_millis(self.probe_timeout_ms) }

  pub fn wait_policy(&self) -> WaitPolicy {
    WaitPolicy {
      initial_backoff: Duration::from_millis(self.wait_initial_ms.max(1)),
      max_backoff:     Duration::from_millis(self.wait_max_ms.max(self.wait_initial_ms).max(1)),
      timeout:         (self.wait_timeout_secs > 0)
        .then(|| Duration::from_secs(self.wait_timeout_secs)),
    }
  }

  pub fn retry_policy(&self) -> RetryPolicy { RetryPolicy { max_attempts: self.max_attempts.max(1) } }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_point_at_tmdb() {
    let s = Settings::default();
    let a = s.addresses();
    assert_eq!(a.api_base, "https://api.themoviedb.org/3");
    assert_eq!(a.image_size, "w185");
    assert_eq!(s.retry_policy().max_attempts, 3);
    assert_eq!(s.wait_policy().timeout, Some(Duration::from_secs(120)));
  }

  #[test]
  fn partial_config_keeps_other_defaults() {
    let cfg = config::Config::builder()
      .set_override("api_key", "k")
      .unwrap()
      .set_override("wait_timeout_secs", 0)
      .unwrap()
      .build()
      .unwrap();
    let s: Settings = cfg.try_deserialize().unwrap();

    assert_eq!(s.api_key, "k");
    assert_eq!(s.wait_policy().timeout, None);
    assert_eq!(s.probe_addr, "api.themoviedb.org:443");
  }

  #[test]
  fn trailing_slashes_are_dropped() {
    let s = Settings { api_base_url: "http://localhost:8080/3/".into(), ..Settings::default() };
    assert_eq!(s.addresses().api_base, "http://localhost:8080/3");
  }

  #[test]
  fn absolute_store_path_is_kept() {
    let s = Settings { store_path: "/tmp/fav.db".into(), ..Settings::default() };
    assert_eq!(s.store_path(), PathBuf::from("/tmp/fav.db"));
  }
}
