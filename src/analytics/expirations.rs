//! Expiration date filtering.
//!
//! Keeps the near-dated expirations needed for a 0-45 day term structure:
//! everything up to and including the first expiration at least 45 days out.

use chrono::{Duration, NaiveDate};

use crate::error::{ScreenError, ScreenResult};

/// Days ahead an expiration must reach for the term structure to span 45 DTE.
pub const FAR_CUTOFF_DAYS: i64 = 45;

/// Select usable expiration dates from a raw provider list.
///
/// Dates are `YYYY-MM-DD` strings, unsorted, possibly duplicated. The result
/// is sorted ascending and deduplicated: the prefix up to and including the
/// first date on or past `today + 45 days`. A same-day expiry at the front is
/// dropped as non-actionable.
///
/// Fails with [`ScreenError::NoFarDate`] when no expiration reaches the
/// cutoff, and with [`ScreenError::InvalidQuote`] on an unparseable date.
pub fn filter_expirations(dates: &[String], today: NaiveDate) -> ScreenResult<Vec<NaiveDate>> {
    let cutoff = today + Duration::days(FAR_CUTOFF_DAYS);

    let mut sorted: Vec<NaiveDate> = dates
        .iter()
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| {
                ScreenError::InvalidQuote(format!("unparseable expiration date: {}", d))
            })
        })
        .collect::<ScreenResult<_>>()?;
    sorted.sort();
    sorted.dedup();

    let far_idx = sorted
        .iter()
        .position(|d| *d >= cutoff)
        .ok_or(ScreenError::NoFarDate)?;

    let mut kept = sorted[..=far_idx].to_vec();
    // Same-day expiries are not actionable for an earnings entry.
    if kept.first() == Some(&today) {
        kept.remove(0);
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn strings(dates: &[&str]) -> Vec<String> {
        dates.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_prefix_through_first_far_date() {
        let dates = strings(&["2024-02-23", "2024-01-12", "2024-02-02"]);
        let kept = filter_expirations(&dates, date("2024-01-02")).unwrap();
        assert_eq!(
            kept,
            vec![date("2024-01-12"), date("2024-02-02"), date("2024-02-23")]
        );
    }

    #[test]
    fn test_today_is_dropped() {
        // Cutoff is 2024-02-15; 2024-03-20 is the first far date, and the
        // same-day 2024-01-01 entry is excluded.
        let dates = strings(&["2024-01-01", "2024-03-20"]);
        let kept = filter_expirations(&dates, date("2024-01-01")).unwrap();
        assert_eq!(kept, vec![date("2024-03-20")]);
    }

    #[test]
    fn test_all_far_keeps_only_first() {
        let dates = strings(&["2024-06-21", "2024-03-15", "2024-04-19"]);
        let kept = filter_expirations(&dates, date("2024-01-02")).unwrap();
        assert_eq!(kept, vec![date("2024-03-15")]);
    }

    #[test]
    fn test_no_far_date_is_terminal() {
        let dates = strings(&["2024-01-05", "2024-01-19", "2024-02-02"]);
        let err = filter_expirations(&dates, date("2024-01-02")).unwrap_err();
        assert!(matches!(err, ScreenError::NoFarDate));
    }

    #[test]
    fn test_duplicates_are_removed() {
        let dates = strings(&["2024-01-19", "2024-01-19", "2024-02-23"]);
        let kept = filter_expirations(&dates, date("2024-01-02")).unwrap();
        assert_eq!(kept, vec![date("2024-01-19"), date("2024-02-23")]);
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let dates = strings(&["01/19/2024", "2024-02-23"]);
        let err = filter_expirations(&dates, date("2024-01-02")).unwrap_err();
        assert!(matches!(err, ScreenError::InvalidQuote(_)));
    }
}
