//! Calendar enumeration of sitting dates
//!
//! Pure date arithmetic: no store access, no clock. Everything upstream of
//! the producer and the reconciliation batches is built on [`generate`].

use crate::types::SittingDate;

/// Enumerate every calendar day from `start` to `end`, inclusive.
///
/// The result is strictly ascending with one entry per day, using true
/// calendar arithmetic (month, year, and leap-year boundaries are handled by
/// chrono, not by digit manipulation). Returns an empty vec when
/// `start > end`.
pub fn generate(start: SittingDate, end: SittingDate) -> Vec<SittingDate> {
    if start > end {
        return Vec::new();
    }

    let mut dates = Vec::with_capacity((days_between(start, end) + 1) as usize);
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.succ() {
            Some(next) => current = next,
            // NaiveDate::MAX, nothing beyond this day
            None => break,
        }
    }
    dates
}

/// Whole days from `start` to `end` (negative when `end` precedes `start`)
pub fn days_between(start: SittingDate, end: SittingDate) -> i64 {
    start.days_until(end)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> SittingDate {
        SittingDate::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn single_day_range_has_one_entry() {
        let day = d(2024, 6, 15);
        assert_eq!(generate(day, day), vec![day]);
    }

    #[test]
    fn length_is_days_between_plus_one() {
        let cases = [
            (d(2024, 1, 1), d(2024, 1, 31)),
            (d(1985, 3, 1), d(1985, 12, 31)),
            (d(1999, 12, 25), d(2000, 1, 5)),
            (d(2023, 1, 1), d(2024, 12, 31)),
        ];
        for (start, end) in cases {
            let dates = generate(start, end);
            assert_eq!(
                dates.len() as i64,
                days_between(start, end) + 1,
                "wrong length for {start}..{end}"
            );
        }
    }

    #[test]
    fn dates_are_distinct_and_strictly_ascending() {
        let dates = generate(d(2000, 2, 25), d(2000, 3, 5));
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn crosses_leap_day() {
        let dates = generate(d(2024, 2, 28), d(2024, 3, 1));
        assert_eq!(
            dates,
            vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)],
            "2024 is a leap year: 29 February must appear"
        );
    }

    #[test]
    fn skips_leap_day_in_common_year() {
        let dates = generate(d(2023, 2, 28), d(2023, 3, 1));
        assert_eq!(dates, vec![d(2023, 2, 28), d(2023, 3, 1)]);
    }

    #[test]
    fn crosses_year_boundary() {
        let dates = generate(d(1999, 12, 31), d(2000, 1, 1));
        assert_eq!(dates, vec![d(1999, 12, 31), d(2000, 1, 1)]);
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(generate(d(2024, 1, 2), d(2024, 1, 1)).is_empty());
    }

    #[test]
    fn multi_decade_range_has_expected_length() {
        // The full production window: epoch to a fixed recent day
        let start = d(1985, 3, 1);
        let end = d(2024, 9, 22);
        let dates = generate(start, end);
        assert_eq!(dates.len() as i64, days_between(start, end) + 1);
        assert_eq!(dates.first(), Some(&start));
        assert_eq!(dates.last(), Some(&end));
    }
}
