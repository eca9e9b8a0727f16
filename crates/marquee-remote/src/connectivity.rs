//! Connectivity probing and the wait-until-online gate.

use std::{future::Future, time::Duration};

use tokio::{net::TcpStream, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Reports whether the network is currently usable.
pub trait ConnectivityProbe: Send + Sync {
  fn is_online(&self) -> impl Future<Output = bool> + Send + '_;
}

/// A probe for environments where connectivity is not observable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
  async fn is_online(&self) -> bool { true }
}

/// Considers the network online when a TCP connection to `addr` succeeds
/// within `timeout`.
#[derive(Debug, Clone)]
pub struct TcpProbe {
  pub addr:    String,
  pub timeout: Duration,
}

impl TcpProbe {
  pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
    Self { addr: addr.into(), timeout }
  }
}

impl ConnectivityProbe for TcpProbe {
  async fn is_online(&self) -> bool {
    matches!(
      tokio::time::timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await,
      Ok(Ok(_))
    )
  }
}

/// How long and how often to poll a probe while offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
  pub initial_backoff: Duration,
  pub max_backoff:     Duration,
  /// Give up after this long. `None` waits until cancelled.
  pub timeout:         Option<Duration>,
}

impl Default for WaitPolicy {
  fn default() -> Self {
    Self {
      initial_backoff: Duration::from_millis(250),
      max_backoff:     Duration::from_secs(10),
      timeout:         Some(Duration::from_secs(120)),
    }
  }
}

impl WaitPolicy {
  pub(crate) fn next_backoff(&self, current: Duration) -> Duration {
    current.saturating_mul(2).min(self.max_backoff)
  }
}

/// Suspend until `probe` reports online.
///
/// The probe is checked immediately, then after exponentially growing
/// pauses. Returns [`Error::OfflineTimeout`] once the policy's timeout has
/// elapsed and [`Error::Cancelled`] as soon as `cancel` fires.
pub async fn wait_until_online<P>(
  probe: &P,
  policy: &WaitPolicy,
  cancel: &CancellationToken,
) -> Result<()>
where
  P: ConnectivityProbe + ?Sized,
{
  let started = Instant::now();
  let deadline = policy.timeout.map(|t| started + t);
  let mut backoff = policy.initial_backoff;

  loop {
    if cancel.is_cancelled() {
      return Err(Error::Cancelled);
    }
    if probe.is_online().await {
      return Ok(());
    }

    let mut pause = backoff;
    if let Some(deadline) = deadline {
      let now = Instant::now();
      if now >= deadline {
        return Err(Error::OfflineTimeout(now - started));
      }
      pause = pause.min(deadline - now);
    }

    tracing::debug!(?pause, "offline, waiting before next connectivity check");
    tokio::select! {
      _ = cancel.cancelled() => return Err(Error::Cancelled),
      _ = tokio::time::sleep(pause) => {}
    }
    backoff = policy.next_backoff(backoff);
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  /// Offline for the first `offline_checks` probes, online afterwards.
  struct FlakyProbe {
    offline_checks: usize,
    checks:         AtomicUsize,
  }

  impl FlakyProbe {
    fn new(offline_checks: usize) -> Self {
      Self { offline_checks, checks: AtomicUsize::new(0) }
    }
  }

  impl ConnectivityProbe for FlakyProbe {
    async fn is_online(&self) -> bool {
      self.checks.fetch_add(1, Ordering::SeqCst) >= self.offline_checks
    }
  }

  fn fast_policy(timeout: Option<Duration>) -> WaitPolicy {
    WaitPolicy {
      initial_backoff: Duration::from_millis(1),
      max_backoff: Duration::from_millis(4),
      timeout,
    }
  }

  #[tokio::test]
  async fn online_returns_immediately() {
    let probe = FlakyProbe::new(0);
    wait_until_online(&probe, &fast_policy(None), &CancellationToken::new())
      .await
      .unwrap();
    assert_eq!(probe.checks.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn waits_until_probe_reports_online() {
    let probe = FlakyProbe::new(3);
    wait_until_online(&probe, &fast_policy(Some(Duration::from_secs(5))), &CancellationToken::new())
      .await
      .unwrap();
    assert_eq!(probe.checks.load(Ordering::SeqCst), 4);
  }

  #[tokio::test]
  async fn gives_up_after_timeout() {
    let probe = FlakyProbe::new(usize::MAX);
    let r = wait_until_online(
      &probe,
      &fast_policy(Some(Duration::from_millis(20))),
      &CancellationToken::new(),
    )
    .await;
    assert!(matches!(r, Err(Error::OfflineTimeout(_))));
    assert!(probe.checks.load(Ordering::SeqCst) > 1);
  }

  #[tokio::test]
  async fn cancellation_stops_the_wait() {
    let probe = FlakyProbe::new(usize::MAX);
    let cancel = CancellationToken::new();
    let waiter = {
      let cancel = cancel.clone();
      tokio::spawn(async move { wait_until_online(&probe, &fast_policy(None), &cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    cancel.cancel();

    let r = waiter.await.unwrap();
    assert!(matches!(r, Err(Error::Cancelled)));
  }

  #[test]
  fn backoff_doubles_up_to_the_cap() {
    let p = fast_policy(None);
    assert_eq!(p.next_backoff(Duration::from_millis(1)), Duration::from_millis(2));
    assert_eq!(p.next_backoff(Duration::from_millis(4)), Duration::from_millis(4));
  }
}
