//! Slice transformer
//!
//! Turns one raw QCEW area slice into monthly employment facts for the
//! statewide NAICS-sector rows:
//!
//! 1. coerce the numeric columns, dropping what does not parse
//! 2. keep aggregation level 54 (statewide, by NAICS sector)
//! 3. map industry codes to 2-digit sectors and keep the target set
//! 4. resolve one total per (year, quarter, sector): the all-ownerships
//!    row when the group has one, otherwise the sum of federal, state,
//!    local and private rows
//! 5. expand each quarterly total into its three months

pub mod coerce;
pub mod date_id;
pub mod naics;

pub use date_id::month_end_date_id;
pub use naics::normalize_sector_code;

use crate::source::{Slice, SliceKey};
use coerce::{parse_int, parse_number, round_count};
use date_id::absolute_month;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

pub type TargetSet = BTreeSet<u8>;

/// `agglvl_code` for statewide, by NAICS sector, all establishment sizes
pub const STATEWIDE_SECTOR_AGGLVL: i64 = 54;
/// `own_code` of the all-ownerships total
pub const ALL_OWNERSHIPS: i64 = 0;
/// Federal, state, local and private ownership codes
pub const SUMMABLE_OWNERSHIPS: [i64; 4] = [1, 2, 3, 5];

pub const COL_AGGLVL: &str = "agglvl_code";
pub const COL_OWN_CODE: &str = "own_code";
pub const COL_INDUSTRY: &str = "industry_code";
pub const COL_YEAR: &str = "year";
pub const COL_QUARTER: &str = "qtr";
pub const COL_MONTHS: [&str; 3] = ["month1_emplvl", "month2_emplvl", "month3_emplvl"];

/// How a fact's employment total was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceSystem {
    #[serde(rename = "QCEW sector (direct total)")]
    DirectTotal,
    #[serde(rename = "QCEW sector (summed ownerships)")]
    SummedOwnerships,
}

impl SourceSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceSystem::DirectTotal => "QCEW sector (direct total)",
            SourceSystem::SummedOwnerships => "QCEW sector (summed ownerships)",
        }
    }
}

impl fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output row: employment in a state's sector at a month end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmploymentFact {
    pub date_id: u32,
    pub state_code: String,
    pub naics_code: u8,
    pub employment_count: Option<i64>,
    pub source_system: SourceSystem,
}

impl EmploymentFact {
    /// Identity used for deduplication and ordering
    pub fn key(&self) -> (u32, &str, u8) {
        (self.date_id, self.state_code.as_str(), self.naics_code)
    }
}

/// Column positions in a slice; absent columns read as blank fields
struct Columns {
    agglvl: Option<usize>,
    own_code: Option<usize>,
    industry: Option<usize>,
    year: Option<usize>,
    quarter: Option<usize>,
    months: [Option<usize>; 3],
}

impl Columns {
    fn locate(slice: &Slice) -> Self {
        Self {
            agglvl: slice.column_index(COL_AGGLVL),
            own_code: slice.column_index(COL_OWN_CODE),
            industry: slice.column_index(COL_INDUSTRY),
            year: slice.column_index(COL_YEAR),
            quarter: slice.column_index(COL_QUARTER),
            months: COL_MONTHS.map(|name| slice.column_index(name)),
        }
    }
}

fn field(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .unwrap_or("")
}

/// A level-54 row whose sector is in the target set
#[derive(Debug, Clone)]
struct SectorRow {
    own_code: Option<i64>,
    months: [Option<f64>; 3],
}

/// (year, quarter, sector); the state is fixed for a slice
type GroupKey = (i64, i64, u8);

#[derive(Debug)]
struct QuarterTotal {
    group: GroupKey,
    months: [Option<f64>; 3],
    source: SourceSystem,
}

/// Transform one slice into monthly facts for `key.state`.
///
/// Never fails: rows that cannot be coerced or mapped are dropped, and an
/// empty result means nothing in the slice qualified.
pub fn transform(slice: &Slice, key: &SliceKey, targets: &TargetSet) -> Vec<EmploymentFact> {
    let groups = sector_groups(slice, key, targets);
    if groups.is_empty() {
        debug!("{}: no statewide sector rows in target set", key);
        return Vec::new();
    }

    let totals: Vec<QuarterTotal> = groups
        .into_iter()
        .flat_map(|(group, rows)| resolve_totals(group, &rows))
        .collect();
    if totals.is_empty() {
        debug!("{}: no ownership rows to total", key);
        return Vec::new();
    }

    let facts: Vec<EmploymentFact> = totals
        .iter()
        .flat_map(|total| expand_months(total, &key.state))
        .collect();
    debug!("{}: {} facts from {} raw rows", key, facts.len(), slice.len());
    facts
}

/// Steps 1–3: coerce, keep level 54, map and filter sectors, then group.
fn sector_groups(
    slice: &Slice,
    key: &SliceKey,
    targets: &TargetSet,
) -> BTreeMap<GroupKey, Vec<SectorRow>> {
    let cols = Columns::locate(slice);
    let mut groups: BTreeMap<GroupKey, Vec<SectorRow>> = BTreeMap::new();

    for row in &slice.rows {
        if parse_int(field(row, cols.agglvl)) != Some(STATEWIDE_SECTOR_AGGLVL) {
            continue;
        }

        let Some(naics) = normalize_sector_code(field(row, cols.industry).trim()) else {
            continue;
        };
        if !targets.contains(&naics) {
            continue;
        }

        let year = parse_int(field(row, cols.year)).unwrap_or(i64::from(key.year));
        let quarter = parse_int(field(row, cols.quarter)).unwrap_or(i64::from(key.quarter));

        groups
            .entry((year, quarter, naics))
            .or_default()
            .push(SectorRow {
                own_code: parse_int(field(row, cols.own_code)),
                months: cols.months.map(|idx| parse_number(field(row, idx))),
            });
    }

    groups
}

/// Step 4, decided per group: all-ownership rows win outright, otherwise
/// the summable ownerships are added month by month.
fn resolve_totals(group: GroupKey, rows: &[SectorRow]) -> Vec<QuarterTotal> {
    let direct: Vec<QuarterTotal> = rows
        .iter()
        .filter(|r| r.own_code == Some(ALL_OWNERSHIPS))
        .map(|r| QuarterTotal {
            group,
            months: r.months,
            source: SourceSystem::DirectTotal,
        })
        .collect();
    if !direct.is_empty() {
        return direct;
    }

    let owned: Vec<&SectorRow> = rows
        .iter()
        .filter(|r| r.own_code.is_some_and(|c| SUMMABLE_OWNERSHIPS.contains(&c)))
        .collect();
    if owned.is_empty() {
        return Vec::new();
    }

    // Absent values count as zero once any ownership row exists.
    let mut months = [None; 3];
    for (i, month) in months.iter_mut().enumerate() {
        *month = Some(owned.iter().filter_map(|r| r.months[i]).sum::<f64>());
    }

    vec![QuarterTotal {
        group,
        months,
        source: SourceSystem::SummedOwnerships,
    }]
}

/// Steps 5–7: one fact per month of the quarter.
fn expand_months(total: &QuarterTotal, state: &str) -> Vec<EmploymentFact> {
    let (year, quarter, naics) = total.group;
    let Ok(year) = i32::try_from(year) else {
        return Vec::new();
    };

    (1..=3u32)
        .filter_map(|month_in_quarter| {
            let month = absolute_month(quarter, month_in_quarter)?;
            let date_id = month_end_date_id(year, month)?;
            Some(EmploymentFact {
                date_id,
                state_code: state.to_string(),
                naics_code: naics,
                employment_count: total.months[month_in_quarter as usize - 1]
                    .and_then(round_count),
                source_system: total.source,
            })
        })
        .collect()
}
