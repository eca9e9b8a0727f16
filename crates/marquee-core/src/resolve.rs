//! Turning relative image paths and video keys into external addresses.

/// Resolves catalog-relative references into fully-qualified addresses.
///
/// Implementations must be pure: no I/O, same input gives the same output.
pub trait AddressResolver: Send + Sync {
  /// Poster address for a relative image path. Empty paths have no image.
  fn poster_url(&self, relative_path: &str) -> Option<String>;

  /// Playable external address for a trailer key.
  fn video_url(&self, key: &str) -> String;
}
