//! `status`: compare the selection against the slice cache

use super::load_config;
use crate::cache::FileSliceCache;
use crate::cli::args::SelectionArgs;
use anyhow::{Context, Result};

pub fn run_status_command(selection: &SelectionArgs, list_missing: bool) -> Result<()> {
    let config = load_config(selection)?;
    let cache = FileSliceCache::open(&config.cache_dir).with_context(|| {
        format!("Failed to open slice cache {}", config.cache_dir.display())
    })?;

    let tasks = config.tasks();
    let cached = cache.cached_keys(&tasks);
    let manifest = cache.manifest();

    println!("Cache directory: {}", cache.cache_dir().display());
    println!("Manifest entries: {}", manifest.len());
    println!("Cached: {}/{}", cached.len(), tasks.len());

    if list_missing {
        for key in tasks.iter().filter(|k| !cached.contains(k)) {
            println!("missing {}", key.cache_name());
        }
    }

    Ok(())
}
