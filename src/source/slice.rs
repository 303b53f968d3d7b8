//! Raw QCEW area slices

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};

/// Identifies one downloadable slice: a state for one quarter of one year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SliceKey {
    pub state: String,
    pub year: i32,
    pub quarter: u8,
}

impl SliceKey {
    pub fn new(state: impl Into<String>, year: i32, quarter: u8) -> Self {
        Self {
            state: state.into(),
            year,
            quarter,
        }
    }

    /// Stable cache file name, e.g. `CA_2021_Q3.csv`.
    pub fn cache_name(&self) -> String {
        format!("{}_{}_Q{}.csv", self.state, self.year, self.quarter)
    }
}

impl fmt::Display for SliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} Q{}", self.state, self.year, self.quarter)
    }
}

/// Untyped table exactly as the endpoint (or the cache) delivered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slice {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Slice {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Parse CSV with a header row. Short records are allowed; missing
    /// trailing fields read as absent.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn from_csv_str(data: &str) -> Result<Self> {
        Self::from_csv_reader(data.as_bytes())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
