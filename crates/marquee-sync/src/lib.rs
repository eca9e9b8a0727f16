//! Sync coordinator for Marquee.
//!
//! The only component that sees both the favorites store and the remote
//! fetcher. It decides what is persisted, when reviews are read from the
//! store versus the network, and how a detail view's favorite state follows
//! committed storage writes.

mod coordinator;
mod session;

pub mod error;

pub use coordinator::Coordinator;
pub use error::{Result, SyncError};
pub use session::{DetailSession, DetailState, ReviewSource};
