//! Remote fetcher for the Marquee catalog service.
//!
//! Requests are gated on connectivity: a fetch waits (with backoff, an
//! optional deadline and cancellation) until the [`ConnectivityProbe`]
//! reports the network as available, then hands the request to a
//! [`Transport`]. Failed calls re-enter the gate and are retried a bounded
//! number of times.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// trait methods that need them.
#![allow(async_fn_in_trait)]

mod connectivity;
mod endpoint;
mod fetcher;
mod transport;

pub mod error;
pub mod urls;

pub use connectivity::{AlwaysOnline, ConnectivityProbe, TcpProbe, WaitPolicy, wait_until_online};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use fetcher::{RemoteFetcher, RetryPolicy};
pub use transport::{HttpTransport, Transport};
pub use urls::TmdbAddresses;
