//! `run`: execute the batch and write the fact table

use super::load_config;
use crate::app::AppConfig;
use crate::cache::{CachedSource, FileSliceCache};
use crate::cli::args::SelectionArgs;
use crate::driver::BatchDriver;
use crate::output::write_facts_to_path;
use crate::source::QcewClient;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::info;

pub fn run_batch_command(
    selection: &SelectionArgs,
    output: Option<PathBuf>,
    app: &AppConfig,
) -> Result<()> {
    let mut config = load_config(selection)?;
    if let Some(output) = output {
        config.output = output;
    }

    let client = QcewClient::new(&config.source).context("Failed to create QCEW client")?;
    let cache = FileSliceCache::open(&config.cache_dir).with_context(|| {
        format!("Failed to open slice cache {}", config.cache_dir.display())
    })?;

    let tasks = config.tasks();
    info!(
        "Processing {} slices into {}",
        tasks.len(),
        config.output.display()
    );

    let driver = BatchDriver::new(CachedSource::new(client, cache), config.target_naics.clone())
        .with_progress(progress_bar(app, tasks.len()));
    let report = driver.run(&tasks);

    write_facts_to_path(&config.output, &report.facts)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    println!("Rows written: {}", report.facts.len());
    println!("Wrote {}", config.output.display());
    if !report.skipped.is_empty() {
        println!(
            "Skipped {} of {} slices; re-run to retry them from where this run stopped",
            report.skipped.len(),
            report.tasks_total
        );
    }

    Ok(())
}

fn progress_bar(app: &AppConfig, len: usize) -> ProgressBar {
    if !app.show_progress || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        bar.set_style(style);
    }
    bar
}
