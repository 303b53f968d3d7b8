//! Command implementations

pub mod run;
pub mod status;

pub use run::run_batch_command;
pub use status::run_status_command;

use crate::cli::args::SelectionArgs;
use crate::config::PipelineConfig;
use anyhow::{Context, Result};

/// Defaults, then the configuration file, then CLI flags
pub fn load_config(selection: &SelectionArgs) -> Result<PipelineConfig> {
    let mut config = match &selection.config {
        Some(path) => PipelineConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    apply_selection(&mut config, selection);
    config.validate().context("Invalid pipeline configuration")?;
    Ok(config)
}

fn apply_selection(config: &mut PipelineConfig, selection: &SelectionArgs) {
    if let Some(year) = selection.start_year {
        config.start_year = year;
    }
    if let Some(year) = selection.end_year {
        config.end_year = year;
    }
    if !selection.quarters.is_empty() {
        config.quarters = selection.quarters.clone();
    }
    if !selection.states.is_empty() {
        config.states = selection
            .states
            .iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .collect();
    }
    if let Some(dir) = &selection.cache_dir {
        config.cache_dir = dir.clone();
    }
}
