//! Date helpers shared by the loaders and the pipeline.

use chrono::NaiveDate;

use crate::RowError;

/// Date format used in every hub CSV file: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a "YYYY-MM-DD" field, naming the field in the error.
///
/// Timestamps such as "2024-11-02 00:00:00" are accepted; only the date part
/// is kept.
pub fn parse_date(field: &'static str, s: &str) -> Result<NaiveDate, RowError> {
    let trimmed = s.trim();
    let day = trimmed.split_whitespace().next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|_| RowError::InvalidDate {
        field,
        value: s.to_string(),
    })
}

/// Parse a numeric field, naming the field in the error.
pub fn parse_number(field: &'static str, s: &str) -> Result<f64, RowError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::InvalidNumber {
            field,
            value: s.to_string(),
        })
}

/// Parse a field that must hold a whole number ("2" or "2.0").
pub fn parse_whole(field: &'static str, s: &str) -> Result<i32, RowError> {
    let value = parse_number(field, s)?;
    if value.fract() != 0.0 || value.abs() > f64::from(i32::MAX) {
        return Err(RowError::InvalidNumber {
            field,
            value: s.to_string(),
        });
    }
    Ok(value as i32)
}

/// Whole weeks from `reference` to `target`, rounded to the nearest week.
pub fn weeks_between(reference: &NaiveDate, target: &NaiveDate) -> i32 {
    let days = (*target - *reference).num_days() as f64;
    (days / 7.0).round() as i32
}
