//! Blocking HTTP client for the QCEW open-data area slices

use super::retry::RetryExecutor;
use super::slice::{Slice, SliceKey};
use super::SliceSource;
use crate::config::{state_fips, SourceConfig};
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("qcew-etl/", env!("CARGO_PKG_VERSION"));

/// QCEW area-slice client with retry and request throttling
pub struct QcewClient {
    client: Client,
    base_url: String,
    throttle: Duration,
    retry: RetryExecutor,
}

impl QcewClient {
    /// Create a new client from source settings
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            throttle: config.throttle,
            retry: RetryExecutor::new(config.retry.clone()),
        })
    }

    /// Statewide area slice URL for a key
    pub fn slice_url(&self, key: &SliceKey) -> Result<String> {
        slice_url(&self.base_url, key)
    }

    /// Make a single GET and return the body text
    fn download(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(format!("{} for {}", status, url)));
        }
        Ok(response.text()?)
    }
}

impl SliceSource for QcewClient {
    fn fetch(&self, key: &SliceKey) -> Result<Slice> {
        let url = self.slice_url(key)?;
        debug!("Downloading {} from {}", key, url);

        let body = self
            .retry
            .execute_with_retry(|| self.download(&url), &format!("download of {key}"))?;
        let slice = Slice::from_csv_str(&body)?;

        if !self.throttle.is_zero() {
            thread::sleep(self.throttle);
        }

        debug!("Downloaded {} ({} rows)", key, slice.len());
        Ok(slice)
    }
}

/// `{base}/{year}/{quarter}/area/{fips}000.csv`
pub fn slice_url(base_url: &str, key: &SliceKey) -> Result<String> {
    let fips = state_fips(&key.state).ok_or_else(|| Error::UnknownState(key.state.clone()))?;
    Ok(format!(
        "{}/{}/{}/area/{}000.csv",
        base_url.trim_end_matches('/'),
        key.year,
        key.quarter,
        fips
    ))
}
