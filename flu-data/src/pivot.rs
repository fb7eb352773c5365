//! Quantile pivoting.
//!
//! A pivot is built from the rows of one (model, reference date) forecast and
//! exposes, for every target date, the value at each quantile level that was
//! reported. A level that was not reported is simply absent from the row.

use chrono::NaiveDate;
use flu_hub::{ForecastRecord, QuantileLevel};
use serde::Serialize;
use std::collections::BTreeMap;

/// Quantile values reported for one target date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub target_end_date: NaiveDate,
    pub values: BTreeMap<QuantileLevel, f64>,
}

impl PivotRow {
    pub fn get(&self, level: QuantileLevel) -> Option<f64> {
        self.values.get(&level).copied()
    }

    pub fn median(&self) -> Option<f64> {
        self.get(QuantileLevel::MEDIAN)
    }

    pub fn lower_95(&self) -> Option<f64> {
        self.get(QuantileLevel::LOWER_95)
    }

    pub fn upper_95(&self) -> Option<f64> {
        self.get(QuantileLevel::UPPER_95)
    }
}

/// Target-date-indexed quantile table, rows ascending by target date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuantilePivot {
    pub rows: Vec<PivotRow>,
}

impl QuantilePivot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows that carry a median, in target date order.
    pub fn medians(&self) -> impl Iterator<Item = (&PivotRow, f64)> + '_ {
        self.rows
            .iter()
            .filter_map(|row| row.median().map(|m| (row, m)))
    }
}

/// Pivot forecast rows by target date.
///
/// When the same quantile level appears twice for a target date, the first
/// value encountered is kept.
pub fn pivot(records: &[ForecastRecord]) -> QuantilePivot {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<QuantileLevel, f64>> = BTreeMap::new();
    let mut duplicates = 0usize;
    for record in records {
        let row = by_date.entry(record.target_end_date).or_default();
        if row.contains_key(&record.quantile_level) {
            duplicates += 1;
            continue;
        }
        row.insert(record.quantile_level, record.value);
    }
    if duplicates > 0 {
        log::debug!("pivot: kept first of {} repeated quantile values", duplicates);
    }

    QuantilePivot {
        rows: by_date
            .into_iter()
            .map(|(target_end_date, values)| PivotRow {
                target_end_date,
                values,
            })
            .collect(),
    }
}
