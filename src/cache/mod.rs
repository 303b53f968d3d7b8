//! Slice caching
//!
//! [`CachedSource`] wraps any [`SliceSource`] with a [`SliceCache`]: a key
//! that is already cached never reaches the inner source, and every fresh
//! download is stored before it is returned. Re-running a batch against a
//! populated cache therefore resumes where the previous run stopped.

pub mod file;
pub mod manifest;
pub mod memory;

pub use file::FileSliceCache;
pub use manifest::{Manifest, ManifestEntry, MANIFEST_FILE};
pub use memory::MemorySliceCache;

use crate::error::Result;
use crate::source::{Slice, SliceKey, SliceSource};
use tracing::{debug, warn};

/// Keyed storage for raw slices
pub trait SliceCache {
    fn get(&self, key: &SliceKey) -> Result<Option<Slice>>;
    fn put(&self, key: &SliceKey, slice: &Slice) -> Result<()>;
    fn contains(&self, key: &SliceKey) -> bool;
}

impl<C: SliceCache + ?Sized> SliceCache for &C {
    fn get(&self, key: &SliceKey) -> Result<Option<Slice>> {
        (**self).get(key)
    }

    fn put(&self, key: &SliceKey, slice: &Slice) -> Result<()> {
        (**self).put(key, slice)
    }

    fn contains(&self, key: &SliceKey) -> bool {
        (**self).contains(key)
    }
}

/// Read-through cache in front of a source
pub struct CachedSource<S, C> {
    source: S,
    cache: C,
}

impl<S: SliceSource, C: SliceCache> CachedSource<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached slice, or fetch, store and return it
    pub fn get_or_fetch(&self, key: &SliceKey) -> Result<Slice> {
        if let Some(slice) = self.cache.get(key)? {
            debug!("Cache hit for {}", key);
            return Ok(slice);
        }

        debug!("Cache miss for {}", key);
        let slice = self.source.fetch(key)?;
        if let Err(e) = self.cache.put(key, &slice) {
            warn!("Failed to cache {}: {}", key, e);
        }
        Ok(slice)
    }
}

impl<S: SliceSource, C: SliceCache> SliceSource for CachedSource<S, C> {
    fn fetch(&self, key: &SliceKey) -> Result<Slice> {
        self.get_or_fetch(key)
    }
}
