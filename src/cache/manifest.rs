//! JSON manifest of cached slices

use crate::error::Result;
use crate::source::SliceKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub state: String,
    pub year: i32,
    pub quarter: u8,
    pub cached: bool,
}

impl ManifestEntry {
    pub fn cached(key: &SliceKey) -> Self {
        Self {
            state: key.state.clone(),
            year: key.year,
            quarter: key.quarter,
            cached: true,
        }
    }

    pub fn key(&self) -> SliceKey {
        SliceKey::new(self.state.clone(), self.year, self.quarter)
    }
}

/// Bookkeeping of which keys were downloaded, keyed by cache file name.
/// The slice files themselves remain the source of truth for hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Load from disk; a missing or unreadable manifest starts empty.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("Manifest {} is corrupted, starting empty: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Cannot read manifest {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write via temp file and rename so a crash never leaves half a manifest
    pub fn save(&self, path: &Path) -> Result<()> {
        let temp_file = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_file, json)?;
        fs::rename(&temp_file, path)?;
        Ok(())
    }

    pub fn record(&mut self, key: &SliceKey) {
        self.entries
            .insert(key.cache_name(), ManifestEntry::cached(key));
    }

    pub fn get(&self, key: &SliceKey) -> Option<&ManifestEntry> {
        self.entries.get(&key.cache_name())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &ManifestEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_uses_cache_name() {
        let mut manifest = Manifest::default();
        let key = SliceKey::new("OH", 2022, 4);
        manifest.record(&key);

        let (name, entry) = manifest.entries().next().unwrap();
        assert_eq!(name, "OH_2022_Q4.csv");
        assert!(entry.cached);
        assert_eq!(entry.key(), key);
    }

    #[test]
    fn test_json_shape() {
        let mut manifest = Manifest::default();
        manifest.record(&SliceKey::new("AK", 2019, 2));
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "AK_2019_Q2.csv": {"state": "AK", "year": 2019, "quarter": 2, "cached": true}
            })
        );
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(MANIFEST_FILE);

        let mut manifest = Manifest::default();
        manifest.record(&SliceKey::new("NY", 2020, 1));
        manifest.save(&path).unwrap();

        assert_eq!(Manifest::load_or_default(&path), manifest);
        assert!(!temp_dir.path().join("manifest.json.tmp").exists());
    }

    #[test]
    fn test_corrupted_manifest_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(MANIFEST_FILE);
        fs::write(&path, "{ not json").unwrap();

        assert!(Manifest::load_or_default(&path).is_empty());
    }
}
