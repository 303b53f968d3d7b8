//! Slice sources
//!
//! A [`SliceSource`] turns a [`SliceKey`] into a raw [`Slice`]. The network
//! client and the caching wrapper both implement it, so the batch driver
//! never knows whether a slice came from disk or from BLS.

pub mod client;
pub mod retry;
pub mod slice;

pub use client::QcewClient;
pub use retry::{BackoffStrategy, RetryConfig, RetryExecutor};
pub use slice::{Slice, SliceKey};

use crate::error::Result;

/// Anything that can produce the raw table for a key
pub trait SliceSource {
    fn fetch(&self, key: &SliceKey) -> Result<Slice>;
}

impl<S: SliceSource + ?Sized> SliceSource for &S {
    fn fetch(&self, key: &SliceKey) -> Result<Slice> {
        (**self).fetch(key)
    }
}

impl<S: SliceSource + ?Sized> SliceSource for Box<S> {
    fn fetch(&self, key: &SliceKey) -> Result<Slice> {
        (**self).fetch(key)
    }
}
