//! Whole-calendar-month date arithmetic.
//!
//! Every payment date in a schedule is the last day of its month. Month
//! arithmetic always normalises to month-end, so a month-start input such as
//! 2024-01-01 lands on 2024-01-31 rather than drifting through the 1st of
//! each following month.

use chrono::{Datelike, NaiveDate};

use crate::error::AmortiseError;
use crate::AmortiseResult;

/// Number of days in the given calendar month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 366 in leap years, 365 otherwise.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Last day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> AmortiseResult<NaiveDate> {
    let last = days_in_month(date.year(), date.month());
    NaiveDate::from_ymd_opt(date.year(), date.month(), last)
        .ok_or_else(|| AmortiseError::DateError(format!("no month-end for {date}")))
}

pub fn is_month_end(date: NaiveDate) -> bool {
    date.day() == days_in_month(date.year(), date.month())
}

/// Add `months` calendar months to `date` and normalise to month-end.
///
/// Negative values step backwards.
pub fn add_months_eom(date: NaiveDate, months: i32) -> AmortiseResult<NaiveDate> {
    let total = month_index(date) + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = days_in_month(year, month);
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AmortiseError::DateError(format!("{date} + {months} months is out of range"))
    })
}

/// Signed count of calendar months from `from` to `to`, ignoring the day.
///
/// `months_between(2024-01-31, 2024-12-31) == 11`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    month_index(to) - month_index(from)
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_end_of_month_leap_february() {
        assert_eq!(end_of_month(d(2024, 2, 3)).unwrap(), d(2024, 2, 29));
        assert_eq!(end_of_month(d(2023, 2, 3)).unwrap(), d(2023, 2, 28));
        assert_eq!(end_of_month(d(2100, 2, 1)).unwrap(), d(2100, 2, 28));
        assert_eq!(end_of_month(d(2000, 2, 1)).unwrap(), d(2000, 2, 29));
    }

    #[test]
    fn test_add_months_from_month_start_normalises() {
        // Month-start input must not produce a month-start series
        let dates: Vec<NaiveDate> = (0..4)
            .map(|k| add_months_eom(d(2024, 1, 1), k).unwrap())
            .collect();
        assert_eq!(
            dates,
            vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]
        );
    }

    #[test]
    fn test_add_months_does_not_clamp_drift() {
        // 31 Jan -> 29 Feb -> 31 Mar, never 29 Mar
        let feb = add_months_eom(d(2024, 1, 31), 1).unwrap();
        assert_eq!(feb, d(2024, 2, 29));
        assert_eq!(add_months_eom(feb, 1).unwrap(), d(2024, 3, 31));
    }

    #[test]
    fn test_add_months_across_years_and_backwards() {
        assert_eq!(add_months_eom(d(2024, 11, 30), 3).unwrap(), d(2025, 2, 28));
        assert_eq!(add_months_eom(d(2024, 1, 31), -1).unwrap(), d(2023, 12, 31));
        assert_eq!(add_months_eom(d(2024, 1, 31), 360).unwrap(), d(2054, 1, 31));
    }

    #[test]
    fn test_months_between_ignores_day() {
        assert_eq!(months_between(d(2024, 1, 31), d(2024, 12, 31)), 11);
        assert_eq!(months_between(d(2024, 1, 1), d(2024, 12, 31)), 11);
        assert_eq!(months_between(d(2024, 7, 31), d(2024, 6, 30)), -1);
        assert_eq!(months_between(d(2023, 12, 31), d(2024, 1, 31)), 1);
    }

    #[test]
    fn test_days_in_year() {
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2023), 365);
        assert!(is_month_end(d(2024, 2, 29)));
        assert!(!is_month_end(d(2024, 2, 28)));
    }
}
