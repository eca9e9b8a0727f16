//! [`RemoteFetcher`]: connectivity-gated requests with bounded retry.

use tokio_util::sync::CancellationToken;

use crate::{
  ConnectivityProbe, Endpoint, Error, Result, Transport, WaitPolicy, wait_until_online,
};

/// How many times a request is attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
}

impl Default for RetryPolicy {
  fn default() -> Self { Self { max_attempts: 3 } }
}

/// Issues requests through a [`Transport`] once a [`ConnectivityProbe`]
/// reports the network as available.
pub struct RemoteFetcher<T, P> {
  transport: T,
  probe:     P,
  wait:      WaitPolicy,
  retry:     RetryPolicy,
}

impl<T, P> RemoteFetcher<T, P>
where
  T: Transport,
  P: ConnectivityProbe,
{
  pub fn new(transport: T, probe: P) -> Self {
    Self { transport, probe, wait: WaitPolicy::default(), retry: RetryPolicy::default() }
  }

  pub fn with_wait_policy(mut self, wait: WaitPolicy) -> Self {
    self.wait = wait;
    self
  }

  pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  /// Fetch `url`, waiting for connectivity before every attempt.
  ///
  /// The request is never attempted while offline. A retryable failure is
  /// followed by a pause that starts at the wait policy's initial backoff and
  /// doubles per attempt, then the request goes back through the
  /// connectivity gate, up to `max_attempts` times in total. `cancel` is
  /// honoured while waiting, while pausing and while a call is in flight.
  pub async fn fetch(
    &self,
    url: &str,
    endpoint: Endpoint,
    cancel: &CancellationToken,
  ) -> Result<String> {
    let max_attempts = self.retry.max_attempts.max(1);
    let mut attempt = 0;
    let mut pause = self.wait.initial_backoff;

    loop {
      attempt += 1;
      wait_until_online(&self.probe, &self.wait, cancel).await?;

      let outcome = tokio::select! {
        _ = cancel.cancelled() => return Err(Error::Cancelled),
        r = self.transport.fetch(url, endpoint) => r,
      };

      match outcome {
        Ok(body) => {
          tracing::debug!(%endpoint, attempt, bytes = body.len(), "fetched");
          return Ok(body);
        }
        Err(e) if e.is_retryable() && attempt < max_attempts => {
          tracing::warn!(%endpoint, attempt, ?pause, error = %e, "request failed, retrying");
          tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            _ = tokio::time::sleep(pause) => {}
          }
          pause = self.wait.next_backoff(pause);
        }
        Err(e) if e.is_retryable() => {
          return Err(Error::Exhausted { endpoint, attempts: attempt, last: Box::new(e) });
        }
        Err(e) => return Err(e),
      }
    }
  }
}
