//! Common test utilities and helpers

#![allow(dead_code)]

use qcew_etl::source::{Slice, SliceKey, SliceSource};
use qcew_etl::{Error, Result};
use std::cell::RefCell;
use std::collections::HashMap;

pub const QCEW_HEADER: &str = "area_fips,own_code,industry_code,agglvl_code,size_code,year,qtr,disclosure_code,qtrly_estabs,month1_emplvl,month2_emplvl,month3_emplvl";

/// Build QCEW-shaped CSV text from data rows
pub fn qcew_csv(rows: &[&str]) -> String {
    let mut csv = String::from(QCEW_HEADER);
    csv.push('\n');
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

/// Source backed by canned CSV text that records every fetch
#[derive(Default)]
pub struct FakeSource {
    slices: HashMap<SliceKey, String>,
    failing: Vec<SliceKey>,
    calls: RefCell<Vec<SliceKey>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slice(mut self, key: SliceKey, rows: &[&str]) -> Self {
        self.slices.insert(key, qcew_csv(rows));
        self
    }

    pub fn with_failure(mut self, key: SliceKey) -> Self {
        self.failing.push(key);
        self
    }

    pub fn calls(&self) -> Vec<SliceKey> {
        self.calls.borrow().clone()
    }
}

impl SliceSource for FakeSource {
    fn fetch(&self, key: &SliceKey) -> Result<Slice> {
        self.calls.borrow_mut().push(key.clone());
        if self.failing.contains(key) {
            return Err(Error::HttpStatus(format!("503 Service Unavailable for {key}")));
        }
        match self.slices.get(key) {
            Some(csv) => Slice::from_csv_str(csv),
            None => Err(Error::HttpStatus(format!("404 Not Found for {key}"))),
        }
    }
}

/// Source that fails every request; proves a run was served from cache
pub struct OfflineSource;

impl SliceSource for OfflineSource {
    fn fetch(&self, key: &SliceKey) -> Result<Slice> {
        Err(Error::HttpStatus(format!("offline: {key}")))
    }
}
