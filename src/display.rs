//! Display formatting for lead cards: Australian day-first dates and
//! mobile numbers grouped `dddd ddd ddd`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Day-granularity date format used for group headers.
pub const AU_DATE_FORMAT: &str = "%d/%m/%Y";

fn au_phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^(\d{4})(\d{3})(\d{3})$").expect("valid phone pattern"))
}

/// Parses a contact date cell into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 timestamps (converted
/// to the local calendar day) and `DD/MM/YYYY`. Returns `None` for blank or
/// unrecognised input.
pub fn parse_contact_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(stamp.date());
    }
    NaiveDate::parse_from_str(raw, AU_DATE_FORMAT).ok()
}

/// Formats a contact date cell as `dd/mm/yyyy`, or returns it unchanged if it
/// cannot be parsed.
pub fn format_contact_date(raw: &str) -> String {
    match parse_contact_date(raw) {
        Some(date) => date.format(AU_DATE_FORMAT).to_string(),
        None => raw.trim().to_string(),
    }
}

/// Groups a ten digit phone number as `0412 345 678`. Anything else is
/// returned as entered.
pub fn format_phone_au(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 10 {
        return phone.to_string();
    }
    au_phone_regex()
        .replace(&digits, "$1 $2 $3")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_au_dates() {
        let may_first = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_contact_date("2024-05-01"), may_first);
        assert_eq!(parse_contact_date("01/05/2024"), may_first);
        assert_eq!(parse_contact_date("2024-05-01 09:30:00"), may_first);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_contact_date(""), None);
        assert_eq!(parse_contact_date("   "), None);
        assert_eq!(parse_contact_date("next tuesday"), None);
        assert_eq!(parse_contact_date("2024-13-45"), None);
    }

    #[test]
    fn test_format_contact_date() {
        assert_eq!(format_contact_date("2024-05-01"), "01/05/2024");
        assert_eq!(format_contact_date("sometime"), "sometime");
    }

    #[test]
    fn test_format_phone_au() {
        assert_eq!(format_phone_au("0412345678"), "0412 345 678");
        assert_eq!(format_phone_au("0412-345-678"), "0412 345 678");
        assert_eq!(format_phone_au("041234"), "041234");
        assert_eq!(format_phone_au("+61 412 345 678"), "+61 412 345 678");
    }
}
