//! Pipeline configuration
//!
//! Every setting has a literal default matching the statewide 2019–2024
//! pull. A TOML file can override any subset of fields and the CLI can
//! override the selection afterwards.

pub mod states;

use crate::error::{Error, Result};
use crate::source::{RetryConfig, SliceKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use states::{all_states, state_fips, STATE_FIPS};

pub const DEFAULT_BASE_URL: &str = "https://data.bls.gov/cew/data/api";
pub const DEFAULT_CACHE_DIR: &str = "qcew_cache";
pub const DEFAULT_OUTPUT: &str = "fact_industry_employment_monthly_naics.csv";

/// The 15 two-digit NAICS sectors carried into the fact table.
pub const TARGET_NAICS: [u8; 15] = [11, 22, 23, 31, 44, 48, 51, 52, 54, 61, 62, 71, 72, 81, 92];

/// Full pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub quarters: Vec<u8>,
    pub states: Vec<String>,
    pub target_naics: BTreeSet<u8>,
    pub cache_dir: PathBuf,
    pub output: PathBuf,
    pub source: SourceConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_year: 2019,
            end_year: 2024,
            quarters: vec![1, 2, 3, 4],
            states: all_states(),
            target_naics: TARGET_NAICS.into_iter().collect(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            source: SourceConfig::default(),
        }
    }
}

/// Settings for the remote QCEW area-slice endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Pause after every successful download
    #[serde(with = "humantime_serde")]
    pub throttle: Duration,

    pub retry: RetryConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            throttle: Duration::from_millis(400),
            retry: RetryConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration file, filling unspecified fields with defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject selections that cannot produce a single task.
    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(Error::Config(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if self.quarters.is_empty() {
            return Err(Error::Config("no quarters selected".to_string()));
        }
        if let Some(q) = self.quarters.iter().find(|q| !(1..=4).contains(*q)) {
            return Err(Error::Config(format!("quarter {q} is not in 1..=4")));
        }
        if self.states.is_empty() {
            return Err(Error::Config("no states selected".to_string()));
        }
        if let Some(unknown) = self.states.iter().find(|s| state_fips(s).is_none()) {
            return Err(Error::UnknownState(unknown.clone()));
        }
        if self.target_naics.is_empty() {
            return Err(Error::Config("target NAICS set is empty".to_string()));
        }
        self.source.retry.validate()
    }

    /// Every (state, year, quarter) in the selection, state outermost.
    pub fn tasks(&self) -> Vec<SliceKey> {
        let mut tasks = Vec::new();
        for state in &self.states {
            for year in self.start_year..=self.end_year {
                for &quarter in &self.quarters {
                    tasks.push(SliceKey::new(state.to_ascii_uppercase(), year, quarter));
                }
            }
        }
        tasks
    }
}
