//! Report date-range validation.

use chrono::{NaiveDate, Utc};

use crate::errors::GoogleAdsError;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str) -> Result<NaiveDate, GoogleAdsError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| GoogleAdsError::InvalidDateRange(format!("Invalid date format: {}", value)))
}

/// Validates a reporting date range and returns the parsed dates: both
/// well-formed `YYYY-MM-DD`, start not after end, end not in the future
/// (the API reports nothing for future dates).
pub fn parse_date_range(
    start_date: &str,
    end_date: &str,
) -> Result<(NaiveDate, NaiveDate), GoogleAdsError> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    let today = Utc::now().date_naive();

    if start > end {
        return Err(GoogleAdsError::InvalidDateRange(
            "Start date must be before or equal to end date".to_string(),
        ));
    }

    if end > today {
        return Err(GoogleAdsError::InvalidDateRange(
            "End date cannot be in the future".to_string(),
        ));
    }

    Ok((start, end))
}

/// Validation-only variant of [`parse_date_range`].
pub fn validate_date_range(start_date: &str, end_date: &str) -> Result<(), GoogleAdsError> {
    parse_date_range(start_date, end_date).map(|_| ())
}
