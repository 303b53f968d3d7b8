//! # qcew-etl
//!
//! Pulls BLS Quarterly Census of Employment and Wages (QCEW) statewide
//! area slices, caches them on disk and reshapes them into a monthly
//! employment fact table keyed by `(date_id, state_code, naics_code)`.
//!
//! ## Usage
//!
//! ```bash
//! qcew-etl run [--states AL,AK] [--start-year 2019] [--end-year 2024] [-o out.csv]
//! qcew-etl status [--missing]
//! ```
//!
//! ## Modules
//!
//! - `source` - Slice keys, raw slices, the HTTP client and its retry policy
//! - `cache` - Read-through slice cache with a JSON manifest
//! - `transform` - Level-54 filtering, sector mapping, total resolution, month expansion
//! - `driver` - Sequential batch over states × years × quarters
//! - `output` - CSV writer for the fact table
//! - `config` - Pipeline configuration and the state FIPS table
//! - `app` / `cli` - Logging, fatal error handling and command handlers
pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod source;
pub mod transform;

pub use error::{Error, Result};
