//! Flat-directory slice cache
//!
//! Layout: one `{STATE}_{YEAR}_Q{Q}.csv` per slice plus `manifest.json`.
//! Entries never expire; deleting a file is the only way to force a
//! re-download.

use super::manifest::{Manifest, MANIFEST_FILE};
use super::SliceCache;
use crate::error::{Error, Result};
use crate::source::{Slice, SliceKey};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

pub struct FileSliceCache {
    cache_dir: PathBuf,
    manifest: Mutex<Manifest>,
}

impl FileSliceCache {
    /// Open (creating if needed) a cache directory
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| {
            Error::Cache(format!(
                "Failed to create cache directory {}: {}",
                cache_dir.display(),
                e
            ))
        })?;

        let manifest = Manifest::load_or_default(&cache_dir.join(MANIFEST_FILE));
        debug!(
            "Opened slice cache at {} ({} manifest entries)",
            cache_dir.display(),
            manifest.len()
        );

        Ok(Self {
            cache_dir,
            manifest: Mutex::new(manifest),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn path_for(&self, key: &SliceKey) -> PathBuf {
        self.cache_dir.join(key.cache_name())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.cache_dir.join(MANIFEST_FILE)
    }

    /// Snapshot of the in-memory manifest
    pub fn manifest(&self) -> Manifest {
        self.lock_manifest().clone()
    }

    /// Keys from `candidates` whose slice file is present
    pub fn cached_keys<'a>(&self, candidates: &'a [SliceKey]) -> Vec<&'a SliceKey> {
        candidates.iter().filter(|k| self.contains(k)).collect()
    }

    fn lock_manifest(&self) -> MutexGuard<'_, Manifest> {
        self.manifest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_in_manifest(&self, key: &SliceKey) {
        let mut manifest = self.lock_manifest();
        manifest.record(key);
        if let Err(e) = manifest.save(&self.manifest_path()) {
            warn!("Failed to update cache manifest for {}: {}", key, e);
        }
    }
}

impl SliceCache for FileSliceCache {
    fn get(&self, key: &SliceKey) -> Result<Option<Slice>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let slice = Slice::from_csv_reader(BufReader::new(file))?;
        Ok(Some(slice))
    }

    fn put(&self, key: &SliceKey, slice: &Slice) -> Result<()> {
        let path = self.path_for(key);
        let temp_file = path.with_extension("csv.tmp");

        let written = File::create(&temp_file)
            .map_err(Error::from)
            .and_then(|file| slice.write_csv(BufWriter::new(file)))
            .and_then(|()| fs::rename(&temp_file, &path).map_err(Error::from));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_file) {
                debug!("Could not remove {}: {}", temp_file.display(), cleanup);
            }
            return Err(e);
        }

        self.record_in_manifest(key);
        Ok(())
    }

    fn contains(&self, key: &SliceKey) -> bool {
        self.path_for(key).exists()
    }
}
