//! Forecast-to-chart data pipeline.
//!
//! This crate turns forecast, observation and score records into the
//! structures the dashboard draws:
//!
//! - [`pivot`] - quantile rows to a date-indexed table of named quantiles
//! - [`ensemble`] - per-model metrics and their unweighted ensemble mean
//! - [`series`] - ordered (date, value) sequences, CI bands and interval boxes
//! - [`context`] - the explicit view context a query pass runs against
//!
//! Everything here is a pure function of its inputs.

pub mod context;
pub mod ensemble;
pub mod error;
pub mod pivot;
pub mod series;

pub use context::{HorizonSelection, Page, ViewContext};
pub use ensemble::{summarize, ActivityLevel, EnsembleMetric, EnsembleSummary};
pub use error::PipelineError;
pub use pivot::{pivot, PivotRow, QuantilePivot};
pub use series::{
    build_interval_boxes, build_score_series, build_trend_series, evaluation_window,
    group_by_reference_date, IntervalBox, MissingQuantile, TrendSeries,
};

use chrono::NaiveDate;
use serde::Serialize;

/// A single (date, value) pair used for chart data points.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl DatePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}
