//! Recency weighting: newer community comments count for more.

use chrono::{Datelike, NaiveDate};

/// Comments with an unparseable posted date land mid-range (weight 1.0).
pub const DEFAULT_AGE_MONTHS: u32 = 9;

/// Map a comment's age to its score multiplier. Boundary ages fall into
/// the more-recent bucket; the weight is always strictly positive.
pub fn weight_for_age(age_months: u32) -> f64 {
    if age_months <= 2 {
        1.5
    } else if age_months <= 6 {
        1.2
    } else if age_months <= 12 {
        1.0
    } else {
        0.7
    }
}

/// Whole months between a `YYYY-MM` posted stamp and `today`. Future
/// dates clamp to zero.
pub fn age_in_months(posted: &str, today: NaiveDate) -> Option<u32> {
    let (year, month) = posted.split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    let months = (today.year() - year) * 12 + today.month() as i32 - month as i32;
    Some(months.max(0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_ages_take_the_more_recent_bucket() {
        assert_eq!(weight_for_age(2), 1.5);
        assert_eq!(weight_for_age(6), 1.2);
        assert_eq!(weight_for_age(12), 1.0);
    }

    #[test]
    fn buckets_cover_all_ages() {
        assert_eq!(weight_for_age(0), 1.5);
        assert_eq!(weight_for_age(3), 1.2);
        assert_eq!(weight_for_age(7), 1.0);
        assert_eq!(weight_for_age(13), 0.7);
        assert_eq!(weight_for_age(120), 0.7);
    }

    #[test]
    fn weight_is_always_positive() {
        for age in 0..200 {
            assert!(weight_for_age(age) > 0.0);
        }
    }

    #[test]
    fn age_from_posted_stamp() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(age_in_months("2024-11", today), Some(2));
        assert_eq!(age_in_months("2024-01", today), Some(12));
        assert_eq!(age_in_months("2023-06", today), Some(19));
        assert_eq!(age_in_months("2025-01", today), Some(0));
    }

    #[test]
    fn future_dates_clamp_to_zero() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(age_in_months("2025-06", today), Some(0));
    }

    #[test]
    fn malformed_stamps_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(age_in_months("unknown", today), None);
        assert_eq!(age_in_months("2024-13", today), None);
        assert_eq!(age_in_months("2024", today), None);
    }
}
