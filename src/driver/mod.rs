//! Batch driver
//!
//! Walks every (state, year, quarter) task in order, pulls each slice from
//! the injected source and transforms it. A failing task is logged and
//! skipped; the batch always runs to completion.

use crate::source::{SliceKey, SliceSource};
use crate::transform::{transform, EmploymentFact, TargetSet};
use indicatif::ProgressBar;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A task that produced no data because its fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTask {
    pub key: SliceKey,
    pub reason: String,
}

/// Outcome of a full batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Deduplicated facts sorted by (date_id, state_code, naics_code)
    pub facts: Vec<EmploymentFact>,
    pub tasks_total: usize,
    pub tasks_succeeded: usize,
    /// Tasks that fetched fine but contributed no rows
    pub tasks_empty: usize,
    pub skipped: Vec<SkippedTask>,
}

pub struct BatchDriver<S> {
    source: S,
    targets: TargetSet,
    progress: ProgressBar,
}

impl<S: SliceSource> BatchDriver<S> {
    pub fn new(source: S, targets: TargetSet) -> Self {
        Self {
            source,
            targets,
            progress: ProgressBar::hidden(),
        }
    }

    /// Advance `progress` once per task
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and transform one task
    pub fn process_one(&self, key: &SliceKey) -> crate::error::Result<Vec<EmploymentFact>> {
        let slice = self.source.fetch(key)?;
        Ok(transform(&slice, key, &self.targets))
    }

    /// Run every task in order and merge the results
    pub fn run(&self, tasks: &[SliceKey]) -> BatchReport {
        let mut report = BatchReport {
            tasks_total: tasks.len(),
            ..Default::default()
        };
        let mut partials: Vec<Vec<EmploymentFact>> = Vec::new();

        self.progress.set_length(tasks.len() as u64);
        for key in tasks {
            self.progress.set_message(key.to_string());
            match self.process_one(key) {
                Ok(facts) if facts.is_empty() => {
                    debug!("{} produced no facts", key);
                    report.tasks_succeeded += 1;
                    report.tasks_empty += 1;
                }
                Ok(facts) => {
                    report.tasks_succeeded += 1;
                    partials.push(facts);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", key, e);
                    report.skipped.push(SkippedTask {
                        key: key.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        report.facts = merge_partials(partials);
        info!(
            "Batch finished: {} facts from {}/{} tasks ({} empty, {} skipped)",
            report.facts.len(),
            report.tasks_succeeded,
            report.tasks_total,
            report.tasks_empty,
            report.skipped.len()
        );
        report
    }
}

/// Concatenate in task order, keep the first fact per
/// (date_id, state_code, naics_code), then sort by that key.
pub fn merge_partials(partials: Vec<Vec<EmploymentFact>>) -> Vec<EmploymentFact> {
    let mut seen: HashSet<(u32, String, u8)> = HashSet::new();
    let mut facts: Vec<EmploymentFact> = partials
        .into_iter()
        .flatten()
        .filter(|f| seen.insert((f.date_id, f.state_code.clone(), f.naics_code)))
        .collect();

    facts.sort_by(|a, b| a.key().cmp(&b.key()));
    facts
}
