//! Extraction of the compound text fields used in the published files.
//!
//! Student counts are written as `total(special)`, e.g. `1,204(13)`; class
//! counts as `24(1)` or plain `24`; region labels may carry the province
//! name in front (`충청남도 천안시`).

use std::sync::OnceLock;

use regex::Regex;

use super::error::FieldError;

fn count_and_special_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]+)\(([0-9]+)\)$").expect("static pattern compiles"))
}

/// Split `"N(M)"` into `(N, M)`. Thousands separators are ignored.
///
/// Fails when the text does not match or when `M > N`.
pub fn split_count_and_special(raw: &str) -> Result<(u32, u32), FieldError> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    let caps = count_and_special_re()
        .captures(&cleaned)
        .ok_or_else(|| FieldError::NoMatch { raw: raw.to_string() })?;

    let total = parse_digits(&caps[1], raw)?;
    let special = parse_digits(&caps[2], raw)?;
    if special > total {
        return Err(FieldError::SpecialExceedsTotal { total, special });
    }
    Ok((total, special))
}

/// Leading run of digits, e.g. `24` from `"24(1)"`.
pub fn extract_leading_int(raw: &str) -> Result<u32, FieldError> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();
    let digits: String = cleaned.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(FieldError::NoLeadingDigits { raw: raw.to_string() });
    }
    parse_digits(&digits, raw)
}

/// Drop `prefix` (and the whitespace after it) from the start of a region
/// label, then trim. Labels without the prefix are only trimmed.
pub fn strip_region_prefix(raw: &str, prefix: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() => rest.trim().to_string(),
        _ => trimmed.to_string(),
    }
}

/// Optional decimal cell. Blank → `Ok(None)`.
pub fn parse_decimal(raw: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(FieldError::NotDecimal { raw: raw.to_string() }),
    }
}

fn parse_digits(digits: &str, raw: &str) -> Result<u32, FieldError> {
    digits
        .parse::<u32>()
        .map_err(|_| FieldError::OutOfRange { raw: raw.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_total_and_special() {
        assert_eq!(split_count_and_special("120(5)"), Ok((120, 5)));
        assert_eq!(split_count_and_special("0(0)"), Ok((0, 0)));
        assert_eq!(split_count_and_special(" 80(0) "), Ok((80, 0)));
    }

    #[test]
    fn thousands_separators_are_ignored() {
        assert_eq!(
            split_count_and_special("1,204(13)"),
            split_count_and_special("1204(13)")
        );
        assert_eq!(split_count_and_special("12,345(1,002)"), Ok((12345, 1002)));
    }

    #[test]
    fn malformed_counts_are_rejected() {
        assert!(matches!(
            split_count_and_special("120"),
            Err(FieldError::NoMatch { .. })
        ));
        assert!(matches!(
            split_count_and_special(""),
            Err(FieldError::NoMatch { .. })
        ));
        assert!(matches!(
            split_count_and_special("12a(3)"),
            Err(FieldError::NoMatch { .. })
        ));
        assert_eq!(
            split_count_and_special("3(5)"),
            Err(FieldError::SpecialExceedsTotal { total: 3, special: 5 })
        );
        assert!(matches!(
            split_count_and_special("99999999999(0)"),
            Err(FieldError::OutOfRange { .. })
        ));
    }

    #[test]
    fn leading_int() {
        assert_eq!(extract_leading_int("24(1)"), Ok(24));
        assert_eq!(extract_leading_int("7"), Ok(7));
        assert_eq!(extract_leading_int(" 1,024(2)"), Ok(1024));
        assert!(matches!(
            extract_leading_int("(3)"),
            Err(FieldError::NoLeadingDigits { .. })
        ));
    }

    #[test]
    fn region_prefix() {
        assert_eq!(strip_region_prefix("충청남도 천안시", "충청남도"), "천안시");
        assert_eq!(strip_region_prefix("충청남도아산시", "충청남도"), "아산시");
        assert_eq!(strip_region_prefix("  공주시 ", "충청남도"), "공주시");
        assert_eq!(strip_region_prefix("서울 충청남도", "충청남도"), "서울 충청남도");
        assert_eq!(strip_region_prefix(" 천안 ", ""), "천안");
    }

    #[test]
    fn decimals() {
        assert_eq!(parse_decimal("21.5"), Ok(Some(21.5)));
        assert_eq!(parse_decimal("  "), Ok(None));
        assert!(parse_decimal("n/a").is_err());
        assert!(parse_decimal("NaN").is_err());
    }
}
