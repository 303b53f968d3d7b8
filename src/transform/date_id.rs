//! Integer-encoded month-end dates (`YYYYMMDD`)

use chrono::{Datelike, NaiveDate};

/// Last calendar day of a month, or `None` for an invalid year/month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    next_first.pred_opt().map(|d| d.day())
}

/// `year*10000 + month*100 + last_day` for the given month.
pub fn month_end_date_id(year: i32, month: u32) -> Option<u32> {
    let last = last_day_of_month(year, month)?;
    let year = u32::try_from(year).ok().filter(|y| *y <= 9999)?;
    Some(year * 10_000 + month * 100 + last)
}

/// Calendar month (1–12) of the `month_in_quarter`-th (1–3) month of a quarter.
pub fn absolute_month(quarter: i64, month_in_quarter: u32) -> Option<u32> {
    if !(1..=4).contains(&quarter) || !(1..=3).contains(&month_in_quarter) {
        return None;
    }
    Some((quarter as u32 - 1) * 3 + month_in_quarter)
}
