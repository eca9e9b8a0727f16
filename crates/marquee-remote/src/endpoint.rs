use std::fmt;

/// Which remote resource a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
  Catalog,
  Reviews,
  Trailers,
}

impl Endpoint {
  pub fn as_str(self) -> &'static str {
    match self {
      Endpoint::Catalog => "catalog",
      Endpoint::Reviews => "reviews",
      Endpoint::Trailers => "trailers",
    }
  }
}

impl fmt::Display for Endpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
