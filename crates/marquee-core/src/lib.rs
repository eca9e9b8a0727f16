//! Core types and trait definitions for the Marquee favorites cache.
//!
//! This crate has no HTTP or database dependencies.
//! All other crates depend on it.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// trait methods that need them.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod error;
pub mod movie;
pub mod resolve;
pub mod review;
pub mod store;

pub use error::{Error, Result};
pub use movie::{Movie, MovieId};
pub use review::Review;
