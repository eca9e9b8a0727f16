//! Review: a single user review attached to a movie.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One review of a movie.
///
/// Equality is structural over `(author, content)`. `remote_id` is the
/// identifier assigned by the review service; it is carried through to
/// storage so a stored review can be addressed without relying on content
/// matches, but it does not take part in equality.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Review {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub remote_id: Option<String>,
  pub author:    String,
  pub content:   String,
}

impl Review {
  pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
    Self { remote_id: None, author: author.into(), content: content.into() }
  }

  pub fn with_remote_id(mut self, id: impl Into<String>) -> Self {
    self.remote_id = Some(id.into());
    self
  }
}

impl PartialEq for Review {
  fn eq(&self, other: &Self) -> bool {
    self.author == other.author && self.content == other.content
  }
}

impl fmt::Display for Review {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: \"{}\"", self.author, self.content)
  }
}

/// Render reviews as one text block, separated by blank lines.
pub fn render_reviews(reviews: &[Review]) -> String {
  reviews
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("\n\n")
    .trim()
    .to_owned()
}
