//! Loose date parsing for inconsistent listing pages.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Verbose and ISO formats tried before falling back to the numeric
/// pattern. Listing pages mix these freely.
const KNOWN_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%m/%d/%Y",
];

/// Numeric day-month-year with `/ - . <space>` separators and a 2- or
/// 4-digit year.
static NUMERIC_DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[/\-. ](\d{1,2})[/\-. ](\d{2,4})").unwrap());

/// Parse a date from free text, returning `None` for anything
/// unrecognizable.
///
/// Two-stage strategy: a fixed list of common verbose/ISO formats
/// first, then a numeric `D[sep]M[sep]Y` search where a 2-digit year
/// expands to `20YY`. Accepting garbage is worse than returning
/// `None`; downstream treats `None` as "unknown", not "today".
pub fn parse_date_loose(text: &str) -> Option<NaiveDate> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return None;
    }

    for format in KNOWN_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            // chrono's %Y accepts short years, which would swallow
            // strings like "5-6-24" meant for the numeric stage.
            if date.year() >= 1000 {
                return Some(date);
            }
        }
    }

    let caps = NUMERIC_DMY.captures(&cleaned)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year_str = caps.get(3)?.as_str();
    let year: i32 = if year_str.len() == 2 {
        format!("20{}", year_str).parse().ok()?
    } else {
        year_str.parse().ok()?
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn numeric_day_month_year() {
        assert_eq!(parse_date_loose("15/03/2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_loose("15-03-2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_loose("15.03.2024"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn verbose_month_name() {
        assert_eq!(parse_date_loose("March 15, 2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_loose("15 March 2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_loose("Mar 15, 2024"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn two_digit_year_expands() {
        assert_eq!(parse_date_loose("5-6-24"), Some(date(2024, 6, 5)));
    }

    #[test]
    fn embedded_in_surrounding_text() {
        assert_eq!(
            parse_date_loose("Last date to apply: 30/06/2024 (Sunday)"),
            Some(date(2024, 6, 30))
        );
    }

    #[test]
    fn internal_whitespace_collapsed() {
        assert_eq!(
            parse_date_loose("  March   15,\n 2024 "),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_date_loose("TBD"), None);
        assert_eq!(parse_date_loose(""), None);
        assert_eq!(parse_date_loose("   "), None);
        assert_eq!(parse_date_loose("Walk-in interview"), None);
    }

    #[test]
    fn impossible_dates_are_none() {
        // Month 15 survives neither stage.
        assert_eq!(parse_date_loose("32/13/2024"), None);
    }
}
