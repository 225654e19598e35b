use crate::errors::RangeError;
use chrono::{Datelike, NaiveDate, Weekday};

/// Inclusive span of calendar dates the register covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn weekend_days(&self) -> Vec<NaiveDate> {
        derive_weekend_days(self.start, self.end)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 7, 31).unwrap_or_default(),
        }
    }
}

pub fn is_weekend_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

/// Every Friday, Saturday and Sunday in `start..=end`, oldest first.
///
/// Callers validate the range through [`DateRange::new`]; an inverted range
/// simply yields no days here.
pub fn derive_weekend_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        if is_weekend_day(date) {
            days.push(date);
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    days
}

/// Column label for a day, e.g. `Fri Jun 28 2024`.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekend_days_for_summer_term() {
        let days = derive_weekend_days(ymd(2024, 6, 28), ymd(2024, 7, 31));
        assert_eq!(
            &days[..4],
            &[ymd(2024, 6, 28), ymd(2024, 6, 29), ymd(2024, 6, 30), ymd(2024, 7, 5)]
        );
        assert_eq!(days.len(), 15);
        assert_eq!(*days.last().unwrap(), ymd(2024, 7, 28));
    }

    #[test]
    fn weekend_days_match_day_by_day_classification() {
        let start = ymd(2023, 12, 20);
        for span in 0..40 {
            let end = start + Duration::days(span);
            let days = derive_weekend_days(start, end);

            let expected = (0..=span)
                .map(|offset| start + Duration::days(offset))
                .filter(|date| {
                    let n = date.weekday().num_days_from_monday();
                    n >= 4
                })
                .count();
            assert_eq!(days.len(), expected, "span {span}");
            assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(days.iter().all(|day| is_weekend_day(*day)));
            if let (Some(first), Some(last)) = (days.first(), days.last()) {
                assert!(*first >= start);
                assert!(*last <= end);
            }
        }
    }

    #[test]
    fn single_weekday_range_is_empty() {
        let wednesday = ymd(2024, 7, 3);
        assert!(derive_weekend_days(wednesday, wednesday).is_empty());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(ymd(2024, 8, 1), ymd(2024, 7, 1)).unwrap_err();
        assert_eq!(err.to_string(), "Start date must be before end date.");
    }

    #[test]
    fn labels_use_browser_date_string_form() {
        assert_eq!(day_label(ymd(2024, 6, 28)), "Fri Jun 28 2024");
        assert_eq!(day_label(ymd(2024, 7, 5)), "Fri Jul 05 2024");
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date(" 2024-07-31 "), Some(ymd(2024, 7, 31)));
        assert_eq!(parse_date("31/07/2024"), None);
    }
}
