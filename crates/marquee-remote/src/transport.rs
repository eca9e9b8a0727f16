//! The single-request transport primitive.

use std::{future::Future, time::Duration};

use reqwest::Client;

use crate::{Endpoint, Error, Result};

/// Performs one logical request and returns the raw response body.
pub trait Transport: Send + Sync {
  fn fetch<'a>(
    &'a self,
    url: &'a str,
    endpoint: Endpoint,
  ) -> impl Future<Output = Result<String>> + Send + 'a;
}

/// [`Transport`] over HTTP `GET`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpTransport {
  client: Client,
}

impl HttpTransport {
  pub fn new(timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
      .timeout(timeout)
      .build()?;
    Ok(Self { client })
  }
}

impl Transport for HttpTransport {
  async fn fetch(&self, url: &str, endpoint: Endpoint) -> Result<String> {
    let resp = self.client.get(url).send().await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { endpoint, status: status.as_u16() });
    }
    Ok(resp.text().await?)
  }
}
