//! Date helpers shared by the commands and the document export.
//!
//! Dates are stored as ISO `YYYY-MM-DD`; staff read and type them as
//! `DD-MM-YYYY`. Both spellings are accepted on input.

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};

pub const FRENCH_FORMAT: &str = "%d-%m-%Y";
pub const ISO_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn to_french(date: &NaiveDate) -> String {
    date.format(FRENCH_FORMAT).to_string()
}

pub fn parse_french(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), FRENCH_FORMAT).ok()
}

/// Accepts `today`, `yesterday`, `tomorrow`, ISO or French dates.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    match value.to_lowercase().as_str() {
        "today" | "aujourd'hui" => return Ok(today()),
        "yesterday" | "hier" => return Ok(today() - Duration::days(1)),
        "tomorrow" | "demain" => return Ok(today() + Duration::days(1)),
        _ => {}
    }
    NaiveDate::parse_from_str(value, ISO_FORMAT)
        .ok()
        .or_else(|| parse_french(value))
        .ok_or_else(|| anyhow!("invalid date '{}', expected YYYY-MM-DD or DD-MM-YYYY", value))
}

pub fn parse_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| anyhow!("invalid time '{}', expected HH:MM", value))
}

/// `<date> HH:MM`, where the date part follows [`parse_date`].
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    let (date, time) = value
        .rsplit_once(' ')
        .ok_or_else(|| anyhow!("invalid date and time '{}', expected YYYY-MM-DD HH:MM", value))?;
    Ok(parse_date(date)?.and_time(parse_time(time)?))
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

/// Every date from `start` to `end`, both included.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Same calendar day one year later; 29 February maps to 28 February.
pub fn one_year_after(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(12)).unwrap_or(date + Duration::days(365))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_and_parses_french_dates() {
        assert_eq!(to_french(&ymd(2024, 3, 7)), "07-03-2024");
        assert_eq!(parse_french("07-03-2024"), Some(ymd(2024, 3, 7)));
        assert_eq!(parse_french("2024-03-07"), None);
    }

    #[test]
    fn parses_both_date_spellings() {
        assert_eq!(parse_date("2024-03-07").unwrap(), ymd(2024, 3, 7));
        assert_eq!(parse_date("07-03-2024").unwrap(), ymd(2024, 3, 7));
        assert!(parse_date("03/07/2024").is_err());
    }

    #[test]
    fn parses_datetime() {
        let dt = parse_datetime("2024-03-07 14:30").unwrap();
        assert_eq!(dt, ymd(2024, 3, 7).and_hms_opt(14, 30, 0).unwrap());
    }

    #[test]
    fn week_starts_on_monday() {
        let (monday, sunday) = week_bounds(ymd(2024, 5, 16));
        assert_eq!(monday, ymd(2024, 5, 13));
        assert_eq!(sunday, ymd(2024, 5, 19));
        assert_eq!(days_between(monday, sunday).len(), 7);
    }

    #[test]
    fn next_project_date_is_one_year_later() {
        assert_eq!(one_year_after(ymd(2024, 5, 16)), ymd(2025, 5, 16));
        assert_eq!(one_year_after(ymd(2024, 2, 29)), ymd(2025, 2, 28));
    }
}
