use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

/// Display rendering, e.g. `26-Dec-25`.
pub const DISPLAY_FORMAT: &str = "%d-%b-%y";
/// Sortable rendering, e.g. `2025-12-26`. Also the storage key.
pub const SORTABLE_FORMAT: &str = "%Y-%m-%d";

/// Accepted input layouts, tried in this exact order.
///
/// Each layout pairs an exact shape with the chrono format that reads it.
/// chrono alone is lenient about widths and signs, so the shape is checked
/// first. Slash dates are read month-first: `01/02/2003` is the 2nd of
/// January, and day-first input only parses when the month-first reading is
/// impossible (e.g. `26/12/2025`).
const INPUT_LAYOUTS: [(&str, &str); 7] = [
    (r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$", "%Y-%m-%d"),         // YYYY-MM-DD
    (r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$", "%m/%d/%Y"),         // MM/DD/YYYY
    (r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$", "%m/%d/%Y"),     // M/D/YYYY
    (r"^[0-9]{2}-[A-Za-z]{3}-[0-9]{2}$", "%d-%b-%y"),      // DD-Mon-YY
    (r"^[0-9]{2}-[A-Za-z]{3}-[0-9]{4}$", "%d-%b-%Y"),      // DD-Mon-YYYY
    (r"^[0-9]{4}/[0-9]{2}/[0-9]{2}$", "%Y/%m/%d"),         // YYYY/MM/DD
    (r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$", "%d/%m/%Y"),         // DD/MM/YYYY
];

struct Layout {
    shape: Regex,
    format: &'static str,
}

fn layouts() -> &'static [Layout] {
    static LAYOUTS: OnceLock<Vec<Layout>> = OnceLock::new();
    LAYOUTS.get_or_init(|| {
        INPUT_LAYOUTS
            .iter()
            .filter_map(|(shape, format)| {
                Regex::new(shape).ok().map(|shape| Layout { shape, format: *format })
            })
            .collect()
    })
}

/// A calendar date together with both of its textual renderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDate {
    pub date: NaiveDate,
    pub display: String,
    pub sortable: String,
}

impl CanonicalDate {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            display: date.format(DISPLAY_FORMAT).to_string(),
            sortable: date.format(SORTABLE_FORMAT).to_string(),
        }
    }
}

/// Parse a date string in any accepted layout.
///
/// The whole string must match one layout exactly. Returns `None` when
/// nothing matches so callers can skip the row instead of aborting.
pub fn normalize_date(input: &str) -> Option<CanonicalDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    layouts()
        .iter()
        .filter(|layout| layout.shape.is_match(input))
        .find_map(|layout| parse_layout(input, layout.format))
        .map(CanonicalDate::from_date)
}

fn parse_layout(input: &str, format: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(input, format).ok()?;
    if format.ends_with("%y") {
        return with_two_digit_year_pivot(date);
    }
    Some(date)
}

// Two-digit years 69-99 are 1969-1999, 00-68 are 2000-2068.
fn with_two_digit_year_pivot(date: NaiveDate) -> Option<NaiveDate> {
    let yy = date.year().rem_euclid(100);
    let year = if yy >= 69 { 1900 + yy } else { 2000 + yy };
    date.with_year(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(input: &str) -> (String, String) {
        let d = normalize_date(input).unwrap_or_else(|| panic!("{} should parse", input));
        (d.display, d.sortable)
    }

    #[test]
    fn test_all_layouts_agree_on_same_day() {
        let expected = ("26-Jan-24".to_string(), "2024-01-26".to_string());
        for input in [
            "2024-01-26",  // YYYY-MM-DD
            "01/26/2024",  // MM/DD/YYYY
            "1/26/2024",   // M/D/YYYY
            "26-Jan-24",   // DD-Mon-YY
            "26-Jan-2024", // DD-Mon-YYYY
            "2024/01/26",  // YYYY/MM/DD
            "26/01/2024",  // DD/MM/YYYY
        ] {
            assert_eq!(pair(input), expected, "input {}", input);
        }
    }

    #[test]
    fn test_single_digit_month_and_day() {
        assert_eq!(pair("1/5/2024"), ("05-Jan-24".to_string(), "2024-01-05".to_string()));
        assert_eq!(pair("01/05/2024"), ("05-Jan-24".to_string(), "2024-01-05".to_string()));
    }

    #[test]
    fn test_ambiguous_slash_date_is_month_first() {
        assert_eq!(pair("01/02/2003").1, "2003-01-02");
        assert_eq!(pair("13/02/2003").1, "2003-02-13");
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(pair("01-Jan-00").1, "2000-01-01");
        assert_eq!(pair("01-Jan-68").1, "2068-01-01");
        assert_eq!(pair("01-Jan-69").1, "1969-01-01");
        assert_eq!(pair("31-Dec-99").1, "1999-12-31");
    }

    #[test]
    fn test_display_and_sortable_name_the_same_day() {
        for input in ["01-Jan-69", "26-Dec-25", "12/26/2025", "26/12/2025"] {
            let d = normalize_date(input).unwrap();
            assert_eq!(normalize_date(&d.display).unwrap().sortable, d.sortable, "input {}", input);
        }
    }

    #[test]
    fn test_rejects_wrong_widths_and_signs() {
        for input in [
            "12/26/25",
            "26-Dec-025",
            "+2025-12-26",
            "2025-1-5",
            "5-Dec-25",
            "025-12-26",
            "1/5/24",
            "2025/1/05",
        ] {
            let parsed = normalize_date(input);
            assert!(parsed.is_none(), "input {:?} gave {:?}", input, parsed);
        }
    }

    #[test]
    fn test_rejects_residue_and_garbage() {
        assert!(normalize_date("2025-12-26x").is_none());
        assert!(normalize_date("26-Dec-25 extra").is_none());
        assert!(normalize_date("Date").is_none());
        assert!(normalize_date("").is_none());
        assert!(normalize_date("2025-02-30").is_none());
        assert!(normalize_date("26-Xyz-25").is_none());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(pair("  2025-12-26 ").1, "2025-12-26");
    }
}
