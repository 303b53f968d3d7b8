//! CSV output for the monthly fact table

use crate::error::Result;
use crate::transform::EmploymentFact;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const OUTPUT_COLUMNS: [&str; 5] = [
    "date_id",
    "state_code",
    "naics_code",
    "employment_count",
    "source_system",
];

/// Write facts with a header row. The header is written even when there
/// are no facts; missing employment counts become empty fields.
pub fn write_facts<W: Write>(writer: W, facts: &[EmploymentFact]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(OUTPUT_COLUMNS)?;
    for fact in facts {
        writer.serialize(fact)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_facts_to_path(path: &Path, facts: &[EmploymentFact]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    write_facts(BufWriter::new(file), facts)
}
