//! Ensemble summary of the selected models.

use crate::{PipelineError, QuantilePivot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Ensemble next-week mean above which activity is HIGH.
pub const HIGH_ACTIVITY_THRESHOLD: f64 = 2000.0;

/// Ensemble next-week mean above which activity is MODERATE.
pub const MODERATE_ACTIVITY_THRESHOLD: f64 = 1000.0;

/// Activity classification of the ensemble next-week forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    /// Both thresholds are exclusive: 1000 is LOW, 2000 is MODERATE.
    pub fn from_next_week(avg_next_week: f64) -> Self {
        if avg_next_week > HIGH_ACTIVITY_THRESHOLD {
            ActivityLevel::High
        } else if avg_next_week > MODERATE_ACTIVITY_THRESHOLD {
            ActivityLevel::Moderate
        } else {
            ActivityLevel::Low
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityLevel::Low => "LOW",
            ActivityLevel::Moderate => "MODERATE",
            ActivityLevel::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// Point and interval metrics of one model's forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleMetric {
    pub model: String,
    pub next_week_value: f64,
    pub four_week_avg: f64,
    pub peak_value: f64,
    /// 0.025 quantile at the first target date, 0 when not reported.
    pub ci_lower: f64,
    /// 0.975 quantile at the first target date, 0 when not reported.
    pub ci_upper: f64,
}

impl EnsembleMetric {
    /// Metrics over the rows of `pivot` that carry a median; `None` when no
    /// row does.
    pub fn from_pivot(model: &str, pivot: &QuantilePivot) -> Option<Self> {
        let mut medians = pivot.medians();
        let (first_row, next_week_value) = medians.next()?;

        let mut sum = next_week_value;
        let mut count = 1usize;
        let mut peak_value = next_week_value;
        for (_, median) in medians {
            sum += median;
            count += 1;
            peak_value = peak_value.max(median);
        }

        // A missing bound counts as 0.
        let ci_lower = first_row.lower_95().unwrap_or(0.0);
        let ci_upper = first_row.upper_95().unwrap_or(0.0);

        Some(EnsembleMetric {
            model: model.to_string(),
            next_week_value,
            four_week_avg: sum / count as f64,
            peak_value,
            ci_lower,
            ci_upper,
        })
    }
}

/// Unweighted mean of the per-model metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleSummary {
    pub model_count: usize,
    pub avg_next_week: f64,
    pub avg_four_week: f64,
    pub avg_peak: f64,
    pub avg_ci_lower: f64,
    pub avg_ci_upper: f64,
    pub activity: ActivityLevel,
    pub models: Vec<EnsembleMetric>,
}

fn mean(metrics: &[EnsembleMetric], field: impl Fn(&EnsembleMetric) -> f64) -> f64 {
    metrics.iter().map(field).sum::<f64>() / metrics.len() as f64
}

/// Summarize the pivots of the selected models.
///
/// Models whose pivot has no median contribute nothing. Fails with
/// [`PipelineError::EmptySelection`] when no model contributes.
pub fn summarize(
    pivots_by_model: &BTreeMap<String, QuantilePivot>,
) -> Result<EnsembleSummary, PipelineError> {
    if pivots_by_model.is_empty() {
        return Err(PipelineError::no_models());
    }
    let metrics: Vec<EnsembleMetric> = pivots_by_model
        .iter()
        .filter_map(|(model, pivot)| {
            let metric = EnsembleMetric::from_pivot(model, pivot);
            if metric.is_none() {
                log::debug!("ensemble: {} has no median rows", model);
            }
            metric
        })
        .collect();
    if metrics.is_empty() {
        return Err(PipelineError::no_forecasts());
    }

    let avg_next_week = mean(&metrics, |m| m.next_week_value);
    Ok(EnsembleSummary {
        model_count: metrics.len(),
        avg_next_week,
        avg_four_week: mean(&metrics, |m| m.four_week_avg),
        avg_peak: mean(&metrics, |m| m.peak_value),
        avg_ci_lower: mean(&metrics, |m| m.ci_lower),
        avg_ci_upper: mean(&metrics, |m| m.ci_upper),
        activity: ActivityLevel::from_next_week(avg_next_week),
        models: metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivot;
    use chrono::NaiveDate;
    use flu_hub::{ForecastRecord, QuantileLevel};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Pivot of median values at weekly targets after 2024-11-23.
    fn median_pivot(model: &str, medians: &[f64]) -> QuantilePivot {
        let reference = d(2024, 11, 23);
        let records: Vec<ForecastRecord> = medians
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let target = reference + chrono::Duration::weeks(i as i64 + 1);
                ForecastRecord::new(model, "US", reference, target, QuantileLevel::MEDIAN, *v)
            })
            .collect();
        pivot(&records)
    }

    fn selection(entries: &[(&str, QuantilePivot)]) -> BTreeMap<String, QuantilePivot> {
        entries
            .iter()
            .map(|(m, p)| (m.to_string(), p.clone()))
            .collect()
    }

    #[test]
    fn test_metric_from_two_weeks() {
        let pivot = median_pivot("A", &[100.0, 200.0]);
        let metric = EnsembleMetric::from_pivot("A", &pivot).unwrap();
        assert_eq!(metric.next_week_value, 100.0);
        assert_eq!(metric.four_week_avg, 150.0);
        assert_eq!(metric.peak_value, 200.0);
    }

    #[test]
    fn test_metric_ci_bounds_default_to_zero() {
        let pivot = median_pivot("A", &[100.0]);
        let metric = EnsembleMetric::from_pivot("A", &pivot).unwrap();
        assert_eq!(metric.ci_lower, 0.0);
        assert_eq!(metric.ci_upper, 0.0);
    }

    #[test]
    fn test_metric_ci_bounds_at_first_target() {
        let reference = d(2024, 11, 23);
        let first = d(2024, 11, 30);
        let second = d(2024, 12, 7);
        let records = vec![
            ForecastRecord::new("A", "US", reference, second, QuantileLevel::LOWER_95, 1.0),
            ForecastRecord::new("A", "US", reference, first, QuantileLevel::LOWER_95, 80.0),
            ForecastRecord::new("A", "US", reference, first, QuantileLevel::MEDIAN, 100.0),
            ForecastRecord::new("A", "US", reference, first, QuantileLevel::UPPER_95, 130.0),
            ForecastRecord::new("A", "US", reference, second, QuantileLevel::MEDIAN, 300.0),
        ];
        let metric = EnsembleMetric::from_pivot("A", &pivot(&records)).unwrap();
        assert_eq!(metric.ci_lower, 80.0);
        assert_eq!(metric.ci_upper, 130.0);
        assert_eq!(metric.peak_value, 300.0);
    }

    #[test]
    fn test_summarize_means_across_models() {
        let pivots = selection(&[
            ("A", median_pivot("A", &[1000.0])),
            ("B", median_pivot("B", &[2000.0])),
        ]);
        let summary = summarize(&pivots).unwrap();
        assert_eq!(summary.model_count, 2);
        assert_eq!(summary.avg_next_week, 1500.0);
        assert_eq!(summary.activity, ActivityLevel::Moderate);
    }

    #[test]
    fn test_summarize_no_models() {
        let err = summarize(&BTreeMap::new()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptySelection(_)));
    }

    #[test]
    fn test_summarize_models_without_rows() {
        let pivots = selection(&[("A", QuantilePivot::default())]);
        assert_eq!(summarize(&pivots).unwrap_err(), PipelineError::no_forecasts());
    }

    #[test]
    fn test_summarize_skips_model_without_median() {
        let pivots = selection(&[
            ("A", median_pivot("A", &[500.0, 700.0])),
            ("B", QuantilePivot::default()),
        ]);
        let summary = summarize(&pivots).unwrap();
        assert_eq!(summary.model_count, 1);
        assert_eq!(summary.avg_four_week, 600.0);
        assert_eq!(summary.activity, ActivityLevel::Low);
    }

    #[test]
    fn test_activity_thresholds_are_exclusive() {
        assert_eq!(ActivityLevel::from_next_week(1000.0), ActivityLevel::Low);
        assert_eq!(ActivityLevel::from_next_week(1000.5), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_next_week(2000.0), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_next_week(2000.01), ActivityLevel::High);
        assert_eq!(ActivityLevel::High.to_string(), "HIGH");
    }
}
