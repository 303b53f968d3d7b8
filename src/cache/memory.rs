//! In-memory slice cache for tests

use super::SliceCache;
use crate::error::Result;
use crate::source::{Slice, SliceKey};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemorySliceCache {
    slices: Mutex<HashMap<SliceKey, Slice>>,
}

impl MemorySliceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slices.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SliceCache for MemorySliceCache {
    fn get(&self, key: &SliceKey) -> Result<Option<Slice>> {
        let slices = self.slices.lock().unwrap_or_else(|p| p.into_inner());
        Ok(slices.get(key).cloned())
    }

    fn put(&self, key: &SliceKey, slice: &Slice) -> Result<()> {
        let mut slices = self.slices.lock().unwrap_or_else(|p| p.into_inner());
        slices.insert(key.clone(), slice.clone());
        Ok(())
    }

    fn contains(&self, key: &SliceKey) -> bool {
        let slices = self.slices.lock().unwrap_or_else(|p| p.into_inner());
        slices.contains_key(key)
    }
}
