//! Industry code mapping to 2-digit NAICS sectors

/// Map a QCEW sector `industry_code` to its 2-digit NAICS sector.
///
/// Ranges such as `"31-33"`, `"44-45"` and `"48-49"` take the first two
/// digits of the left bound. Anything else is read from its first two
/// characters, so `"10"` stays `10` and `"1011"` becomes `10`.
pub fn normalize_sector_code(industry_code: &str) -> Option<u8> {
    if industry_code.is_empty() {
        return None;
    }

    if let Some((left, _)) = industry_code.split_once('-') {
        return leading_two(left);
    }

    if industry_code.len() == 2 && industry_code.bytes().all(|b| b.is_ascii_digit()) {
        return industry_code.parse().ok();
    }

    leading_two(industry_code)
}

fn leading_two(code: &str) -> Option<u8> {
    code.get(..2).unwrap_or(code).parse().ok()
}
