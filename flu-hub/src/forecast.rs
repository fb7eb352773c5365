use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{parse_date, parse_number, weeks_between};
use crate::{QuantileLevel, RowError};

/// The only `output_type` kept from forecast files.
pub const QUANTILE_OUTPUT_TYPE: &str = "quantile";

/// A forecast file row as it appears on disk.
///
/// Hub files carry more columns (`target`, `horizon`, ...); they are ignored.
/// Numeric fields are read as strings so that non-quantile rows, whose
/// `output_type_id` is a category name, can be dropped before parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastRow {
    pub reference_date: String,
    pub target_end_date: String,
    pub location: String,
    pub output_type: String,
    pub output_type_id: String,
    pub value: String,
}

/// One quantile of one model's forecast for a location and target week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub model: String,
    pub location: String,
    pub reference_date: NaiveDate,
    pub target_end_date: NaiveDate,
    /// Weeks from `reference_date` to `target_end_date`.
    pub horizon: i32,
    pub quantile_level: QuantileLevel,
    pub value: f64,
}

impl ForecastRecord {
    pub fn new(
        model: &str,
        location: &str,
        reference_date: NaiveDate,
        target_end_date: NaiveDate,
        quantile_level: QuantileLevel,
        value: f64,
    ) -> Self {
        ForecastRecord {
            model: model.to_string(),
            location: location.to_string(),
            reference_date,
            target_end_date,
            horizon: weeks_between(&reference_date, &target_end_date),
            quantile_level,
            value,
        }
    }
}

impl RawForecastRow {
    /// Normalize a raw row for `model`.
    ///
    /// Returns `Ok(None)` for non-quantile output types.
    pub fn normalize(&self, model: &str) -> Result<Option<ForecastRecord>, RowError> {
        if self.output_type.trim() != QUANTILE_OUTPUT_TYPE {
            return Ok(None);
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err(RowError::EmptyField("location"));
        }
        let reference_date = parse_date("reference_date", &self.reference_date)?;
        let target_end_date = parse_date("target_end_date", &self.target_end_date)?;
        let level = parse_number("output_type_id", &self.output_type_id)?;
        let quantile_level = QuantileLevel::from_f64(level)?;
        let value = parse_number("value", &self.value)?;
        Ok(Some(ForecastRecord::new(
            model,
            location,
            reference_date,
            target_end_date,
            quantile_level,
            value,
        )))
    }
}
