//! Chart-ready series.

use crate::{DatePoint, QuantilePivot};
use chrono::NaiveDate;
use flu_hub::{ForecastRecord, ObservationRecord, QuantileLevel, ScoreRecord};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

fn serialize_level<S: Serializer>(level: &QuantileLevel, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(level.as_f64())
}

/// A named quantile that a pivot row did not report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MissingQuantile {
    pub target_end_date: NaiveDate,
    #[serde(serialize_with = "serialize_level")]
    pub level: QuantileLevel,
}

/// Median line, 95% band and observed history for one model's forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub median: Vec<DatePoint>,
    /// Closed polygon: upper bound forward, then lower bound reversed.
    /// Empty unless every row reports both bounds.
    pub ci_band: Vec<DatePoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observed: Vec<DatePoint>,
    pub missing: Vec<MissingQuantile>,
}

/// Build the trend series of a pivot against observed history.
pub fn build_trend_series(pivot: &QuantilePivot, observed: &[ObservationRecord]) -> TrendSeries {
    let mut missing = Vec::new();
    for row in &pivot.rows {
        for level in [
            QuantileLevel::LOWER_95,
            QuantileLevel::MEDIAN,
            QuantileLevel::UPPER_95,
        ] {
            if row.get(level).is_none() {
                missing.push(MissingQuantile {
                    target_end_date: row.target_end_date,
                    level,
                });
            }
        }
    }
    if !missing.is_empty() {
        log::debug!("trend: {} named quantiles missing", missing.len());
    }

    let median = pivot
        .medians()
        .map(|(row, m)| DatePoint::new(row.target_end_date, m))
        .collect();

    let bounds: Option<Vec<(NaiveDate, f64, f64)>> = pivot
        .rows
        .iter()
        .map(|row| Some((row.target_end_date, row.lower_95()?, row.upper_95()?)))
        .collect();
    let ci_band = match bounds {
        Some(bounds) if !bounds.is_empty() => bounds
            .iter()
            .map(|(date, _, upper)| DatePoint::new(*date, *upper))
            .chain(
                bounds
                    .iter()
                    .rev()
                    .map(|(date, lower, _)| DatePoint::new(*date, *lower)),
            )
            .collect(),
        _ => Vec::new(),
    };

    let mut observed: Vec<DatePoint> = observed
        .iter()
        .map(|o| DatePoint::new(o.date, o.value))
        .collect();
    observed.sort_by_key(|p| p.date);

    TrendSeries {
        median,
        ci_band,
        observed,
        missing,
    }
}

/// 95% interval of one forecast target, drawn as a box plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalBox {
    pub target_date: NaiveDate,
    pub lower: f64,
    pub median: f64,
    pub upper: f64,
    pub reference_date: NaiveDate,
}

/// Partition forecast records by reference date.
pub fn group_by_reference_date(
    records: &[ForecastRecord],
) -> BTreeMap<NaiveDate, Vec<ForecastRecord>> {
    let mut groups: BTreeMap<NaiveDate, Vec<ForecastRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.reference_date)
            .or_default()
            .push(record.clone());
    }
    groups
}

/// One box per (reference date, target date) that reports all of 0.025, 0.5
/// and 0.975. Boxes come out ordered by reference date, then target date.
pub fn build_interval_boxes(
    records_by_reference_date: &BTreeMap<NaiveDate, Vec<ForecastRecord>>,
) -> Vec<IntervalBox> {
    let mut boxes = Vec::new();
    let mut skipped = 0usize;
    for (reference_date, records) in records_by_reference_date {
        for row in crate::pivot(records).rows {
            match (row.lower_95(), row.median(), row.upper_95()) {
                (Some(lower), Some(median), Some(upper)) => boxes.push(IntervalBox {
                    target_date: row.target_end_date,
                    lower,
                    median,
                    upper,
                    reference_date: *reference_date,
                }),
                _ => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        log::debug!("interval boxes: skipped {} incomplete targets", skipped);
    }
    boxes
}

/// Score values by target date. Records sharing a target date keep their
/// input order.
pub fn build_score_series(score_records: &[ScoreRecord]) -> Vec<DatePoint> {
    let mut points: Vec<DatePoint> = score_records
        .iter()
        .map(|s| DatePoint::new(s.target_end_date, s.value))
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// X-axis range of the evaluation chart: the first observed date through the
/// last forecast target date.
pub fn evaluation_window(
    first_observed: Option<NaiveDate>,
    records: &[ForecastRecord],
) -> Option<(NaiveDate, NaiveDate)> {
    let start = first_observed?;
    let end = records.iter().map(|r| r.target_end_date).max()?;
    Some((start, end))
}
