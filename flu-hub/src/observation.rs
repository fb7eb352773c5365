use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{parse_date, parse_number};
use crate::RowError;

/// A surveillance row (`target-hospital-admissions.csv`).
///
/// Extra columns such as `location_name` and `weekly_rate` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservationRow {
    pub date: String,
    pub location: String,
    pub value: String,
}

/// Observed weekly count for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    pub location: String,
    pub date: NaiveDate,
    pub value: f64,
}

impl TryFrom<&RawObservationRow> for ObservationRecord {
    type Error = RowError;

    fn try_from(row: &RawObservationRow) -> Result<Self, Self::Error> {
        let location = row.location.trim();
        if location.is_empty() {
            return Err(RowError::EmptyField("location"));
        }
        Ok(ObservationRecord {
            location: location.to_string(),
            date: parse_date("date", &row.date)?,
            value: parse_number("value", &row.value)?,
        })
    }
}
