use std::cmp::Ordering;

use chrono::NaiveDate;

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(day) = NaiveDate::parse_from_str(date.get(..10).unwrap_or(date), "%Y-%m-%d") {
        day.format("%b %d, %Y").to_string()
    } else {
        date.to_string()
    }
}

/// Case-insensitive comparison without allocating lowercase copies.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Collation used for text columns.
///
/// Letters compare case-insensitively first; on a tie the first differing
/// character decides, with lowercase ordered before uppercase (`"a" < "A" < "b"`).
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    cmp_ignore_case(a, b).then_with(|| {
        for (ca, cb) in a.chars().zip(b.chars()) {
            if ca != cb {
                return match (ca.is_lowercase(), cb.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => ca.cmp(&cb),
                };
            }
        }
        a.len().cmp(&b.len())
    })
}

/// Permissive numeric parse for table cells.
///
/// Surrounding whitespace is ignored. Blank text counts as zero, so a blank
/// cell orders among numbers rather than comparing equal to everything. Accepts
/// signs, decimals, exponents and `Infinity`; rejects `NaN` and anything with
/// trailing characters such as lap times (`1:31.158`) or `N/A`.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned.len() + 1 < trimmed.len() {
        return None;
    }
    if unsigned == "Infinity" {
        return Some(if trimmed.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    // Rust accepts "inf" and "nan" spellings that are not numbers here
    if unsigned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2023-03-05"), "Mar 05, 2023");
        assert_eq!(format_date("2023-03-05T15:00:00Z"), "Mar 05, 2023");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("alonso", "ALONSO"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("Alonso", "bottas"), Ordering::Less);
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("A", "b"), Ordering::Less);
        assert_eq!(locale_compare("Zhou", "albon"), Ordering::Greater);
        assert_eq!(locale_compare("Ferrari", "Ferrari"), Ordering::Equal);
        assert_eq!(locale_compare("Red", "Red Bull"), Ordering::Less);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("10"), Some(10.0));
        assert_eq!(parse_numeric(" 2 "), Some(2.0));
        assert_eq!(parse_numeric("-1.5"), Some(-1.5));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric(""), Some(0.0));
        assert_eq!(parse_numeric("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_numeric("N/A"), None);
        assert_eq!(parse_numeric("1:31.158"), None);
        assert_eq!(parse_numeric("+1:33.2"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("--1"), None);
    }
}
